//! # Telemetry Types
//!
//! The canonical snapshot record and its numeric building blocks.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::vehicle::VehicleState;

/// 3-component vector in the simulator's coordinate frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Unit quaternion (w, x, y, z)
///
/// Passed through exactly as the simulator reports it; no renormalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }
}

/// One immutable telemetry record, captured at a single tick
///
/// Exactly one snapshot exists per tick; it is built from a live read of the
/// vehicle state, handed to the sink, and discarded. Field order here is the
/// key order of the published JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Wall-clock seconds since the Unix epoch, set at capture time
    pub timestamp: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quaternion,
    /// Battery percentage; `None` when neither the simulator nor the
    /// configuration supplies a value
    pub battery: Option<u8>,
    /// Whether control authority is currently granted
    pub armed: bool,
}

impl TelemetrySnapshot {
    /// Build a snapshot from a live vehicle state read
    ///
    /// # Arguments
    ///
    /// * `state` - The state just read from the provider
    /// * `battery_fallback` - Placeholder battery percentage used when the
    ///   provider did not report one (non-authoritative)
    pub fn capture(state: VehicleState, battery_fallback: Option<u8>) -> Self {
        Self {
            timestamp: unix_time_secs(),
            position: state.position,
            velocity: state.velocity,
            orientation: state.orientation,
            battery: state.battery.or(battery_fallback),
            armed: state.armed,
        }
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch
pub fn unix_time_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> VehicleState {
        VehicleState {
            position: Vec3::new(1.0, 2.0, -3.5),
            velocity: Vec3::ZERO,
            orientation: Quaternion::IDENTITY,
            battery: None,
            armed: true,
        }
    }

    #[test]
    fn test_capture_applies_battery_fallback() {
        let snapshot = TelemetrySnapshot::capture(sample_state(), Some(75));
        assert_eq!(snapshot.battery, Some(75));
        assert!(snapshot.armed);
        assert_eq!(snapshot.position.z, -3.5);
    }

    #[test]
    fn test_capture_prefers_provider_battery() {
        let mut state = sample_state();
        state.battery = Some(42);
        let snapshot = TelemetrySnapshot::capture(state, Some(75));
        assert_eq!(snapshot.battery, Some(42));
    }

    #[test]
    fn test_capture_without_any_battery_source() {
        let snapshot = TelemetrySnapshot::capture(sample_state(), None);
        assert_eq!(snapshot.battery, None);
    }

    #[test]
    fn test_capture_sets_current_timestamp() {
        let before = unix_time_secs();
        let snapshot = TelemetrySnapshot::capture(sample_state(), None);
        let after = unix_time_secs();
        assert!(snapshot.timestamp >= before);
        assert!(snapshot.timestamp <= after);
    }

    #[test]
    fn test_json_field_names() {
        let snapshot = TelemetrySnapshot::capture(sample_state(), Some(75));
        let value: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

        assert!(value["timestamp"].is_f64());
        assert_eq!(value["position"]["x"], 1.0);
        assert_eq!(value["position"]["y"], 2.0);
        assert_eq!(value["position"]["z"], -3.5);
        assert_eq!(value["velocity"]["x"], 0.0);
        assert_eq!(value["orientation"]["w"], 1.0);
        assert_eq!(value["battery"], 75);
        assert_eq!(value["armed"], true);
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = TelemetrySnapshot {
            timestamp: 1_700_000_000.123456,
            position: Vec3::new(1.25, -2.5, 10.0),
            velocity: Vec3::new(0.1, 0.2, -0.3),
            orientation: Quaternion::new(0.707, 0.0, 0.707, 0.0),
            battery: Some(88),
            armed: false,
        };

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let parsed: TelemetrySnapshot = serde_json::from_str(&json).unwrap();

        assert!((parsed.timestamp - snapshot.timestamp).abs() < 1e-9);
        assert!((parsed.position.x - snapshot.position.x).abs() < 1e-9);
        assert!((parsed.position.z - snapshot.position.z).abs() < 1e-9);
        assert!((parsed.velocity.y - snapshot.velocity.y).abs() < 1e-9);
        assert!((parsed.orientation.w - snapshot.orientation.w).abs() < 1e-9);
        assert_eq!(parsed.battery, snapshot.battery);
        assert_eq!(parsed.armed, snapshot.armed);
    }

    #[test]
    fn test_orientation_not_renormalized() {
        let mut state = sample_state();
        // Deliberately non-unit; must pass through untouched
        state.orientation = Quaternion::new(2.0, 0.0, 0.0, 0.0);
        let snapshot = TelemetrySnapshot::capture(state, None);
        assert_eq!(snapshot.orientation.w, 2.0);
    }
}
