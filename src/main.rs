//! # Sim Bridge
//!
//! Stream drone telemetry from a flight simulator to disk at a fixed rate.
//!
//! This application connects to the simulator bridge, performs the
//! pre-flight sequence (enable api control, arm, takeoff), then samples
//! vehicle state at the configured rate and publishes each snapshot to a
//! JSON file, replacing it atomically on every tick.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up logging with tracing subscriber
//!    - Load configuration (compiled defaults when no file exists)
//!    - Connect to the simulator and confirm the session
//!
//! 2. **Pre-flight**
//!    - Enable api control, arm, take off
//!    - Create the output directory and sink
//!
//! 3. **Main Loop**
//!    - Publish one snapshot per tick at the configured period (10Hz default)
//!    - Tolerate sink failures; abort on simulator failures
//!    - Handle Ctrl+C for graceful shutdown
//!
//! 4. **Graceful Shutdown**
//!    - Disarm and release api control (best-effort)
//!    - Report the termination reason and exit

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber;

use sim_bridge::config::Config;
use sim_bridge::telemetry::publisher::{Publisher, ShutdownToken, TerminationReason};
use sim_bridge::telemetry::sink::JsonFileSink;
use sim_bridge::vehicle::{FlightControl, SimClient};

/// Configuration file consulted at startup; compiled defaults apply when it
/// does not exist
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Sim Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(DEFAULT_CONFIG_PATH)?;

    let mut client = SimClient::connect(
        &config.simulator.host,
        config.simulator.port,
        std::time::Duration::from_millis(config.simulator.connect_timeout_ms),
    )
    .await?;
    client.confirm_connection().await?;
    info!("Connected to simulator at {}", client.endpoint());

    client.enable_api_control(true).await?;
    info!("API control enabled");

    client.arm_disarm(true).await?;
    info!("Vehicle armed");

    client.takeoff().await?;
    info!("Takeoff complete");

    let mut sink = JsonFileSink::create(&config.telemetry.output_path)?;
    info!(
        "Publishing telemetry to {} every {}ms",
        sink.path().display(),
        config.telemetry.sample_period_ms
    );
    info!("Press Ctrl+C to exit");

    let shutdown = ShutdownToken::new();
    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            ctrl_c_token.request();
        }
    });

    let publisher = Publisher::from_config(&config.telemetry);
    match publisher.run(&mut client, &mut sink, &shutdown).await {
        TerminationReason::Cancelled => {
            info!("Telemetry publisher stopped");
            Ok(())
        }
        TerminationReason::ProviderFailed(e) => {
            error!("Simulator session lost: {}", e);
            Err(e.into())
        }
    }
}
