//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub flight: FlightConfig,
}

/// Simulator connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

/// Telemetry publishing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,

    #[serde(default = "default_sample_period_ms")]
    pub sample_period_ms: u64,

    /// Battery percentage reported when the simulator does not expose one.
    /// Non-authoritative; a provider-reported value always wins.
    #[serde(default = "default_battery_placeholder")]
    pub battery_placeholder: Option<u8>,
}

/// Flight sequence configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FlightConfig {
    #[serde(default = "default_hover_secs")]
    pub hover_secs: u64,
}

// Default value functions
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 41451 }
fn default_connect_timeout_ms() -> u64 { 5000 }

fn default_output_path() -> String { "data/telemetry.json".to_string() }
fn default_sample_period_ms() -> u64 { 100 }
fn default_battery_placeholder() -> Option<u8> { Some(75) }

fn default_hover_secs() -> u64 { 5 }

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            sample_period_ms: default_sample_period_ms(),
            battery_placeholder: default_battery_placeholder(),
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            hover_secs: default_hover_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            telemetry: TelemetryConfig::default(),
            flight: FlightConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sim_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to compiled
    /// defaults when the file does not exist
    ///
    /// The reference binaries take no CLI flags, so a missing config file is
    /// a normal condition rather than an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.simulator.host.is_empty() {
            return Err(crate::error::SimBridgeError::Config(
                toml::de::Error::custom("simulator host cannot be empty")
            ));
        }

        if self.simulator.port == 0 {
            return Err(crate::error::SimBridgeError::Config(
                toml::de::Error::custom("simulator port cannot be 0")
            ));
        }

        if self.simulator.connect_timeout_ms == 0 || self.simulator.connect_timeout_ms > 60000 {
            return Err(crate::error::SimBridgeError::Config(
                toml::de::Error::custom("connect_timeout_ms must be between 1 and 60000")
            ));
        }

        if self.telemetry.output_path.is_empty() {
            return Err(crate::error::SimBridgeError::Config(
                toml::de::Error::custom("telemetry output_path cannot be empty")
            ));
        }

        if self.telemetry.sample_period_ms == 0 || self.telemetry.sample_period_ms > 60000 {
            return Err(crate::error::SimBridgeError::Config(
                toml::de::Error::custom("sample_period_ms must be between 1 and 60000")
            ));
        }

        if let Some(battery) = self.telemetry.battery_placeholder {
            if battery > 100 {
                return Err(crate::error::SimBridgeError::Config(
                    toml::de::Error::custom("battery_placeholder must be between 0 and 100")
                ));
            }
        }

        if self.flight.hover_secs == 0 || self.flight.hover_secs > 3600 {
            return Err(crate::error::SimBridgeError::Config(
                toml::de::Error::custom("hover_secs must be between 1 and 3600")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.simulator.host, "127.0.0.1");
        assert_eq!(config.simulator.port, 41451);
        assert_eq!(config.simulator.connect_timeout_ms, 5000);
        assert_eq!(config.telemetry.output_path, "data/telemetry.json");
        assert_eq!(config.telemetry.sample_period_ms, 100);
        assert_eq!(config.telemetry.battery_placeholder, Some(75));
        assert_eq!(config.flight.hover_secs, 5);
    }

    #[test]
    fn test_empty_host() {
        let mut config = Config::default();
        config.simulator.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port() {
        let mut config = Config::default();
        config.simulator.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connect_timeout_zero() {
        let mut config = Config::default();
        config.simulator.connect_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connect_timeout_too_high() {
        let mut config = Config::default();
        config.simulator.connect_timeout_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_output_path() {
        let mut config = Config::default();
        config.telemetry.output_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_period_zero() {
        let mut config = Config::default();
        config.telemetry.sample_period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_period_too_high() {
        let mut config = Config::default();
        config.telemetry.sample_period_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_battery_placeholder_too_high() {
        let mut config = Config::default();
        config.telemetry.battery_placeholder = Some(101);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_battery_placeholder_none_is_valid() {
        let mut config = Config::default();
        config.telemetry.battery_placeholder = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hover_secs_zero() {
        let mut config = Config::default();
        config.flight.hover_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hover_secs_too_high() {
        let mut config = Config::default();
        config.flight.hover_secs = 3601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[simulator]
host = "192.168.1.20"
port = 41452

[telemetry]
sample_period_ms = 50

[flight]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.simulator.host, "192.168.1.20");
        assert_eq!(config.simulator.port, 41452);
        assert_eq!(config.telemetry.sample_period_ms, 50);
        // Unspecified sections fall back to defaults
        assert_eq!(config.telemetry.output_path, "data/telemetry.json");
        assert_eq!(config.flight.hover_secs, 5);
    }

    #[test]
    fn test_load_invalid_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[telemetry]
sample_period_ms = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let config = Config::load_or_default("/nonexistent/sim-bridge.toml").unwrap();
        assert_eq!(config.simulator.port, default_port());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_port(), 41451);
        assert_eq!(default_connect_timeout_ms(), 5000);
        assert_eq!(default_output_path(), "data/telemetry.json");
        assert_eq!(default_sample_period_ms(), 100);
        assert_eq!(default_battery_placeholder(), Some(75));
        assert_eq!(default_hover_secs(), 5);
    }
}
