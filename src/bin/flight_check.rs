//! # Flight Check
//!
//! Minimal end-to-end flight sequence against the simulator: enable api
//! control, arm, take off, hover, land, disarm, release. Useful as a smoke
//! test of the simulator session before running the telemetry publisher.

use anyhow::Result;
use std::time::Duration;
use tracing::info;
use tracing_subscriber;

use sim_bridge::config::Config;
use sim_bridge::vehicle::{FlightControl, SimClient};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    let config = Config::load_or_default(DEFAULT_CONFIG_PATH)?;

    let mut client = SimClient::connect(
        &config.simulator.host,
        config.simulator.port,
        Duration::from_millis(config.simulator.connect_timeout_ms),
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

    info!("Hovering for {}s", config.flight.hover_secs);
    tokio::time::sleep(Duration::from_secs(config.flight.hover_secs)).await;

    client.land().await?;
    info!("Landing complete");

    client.arm_disarm(false).await?;
    client.enable_api_control(false).await?;
    info!("API control released");

    Ok(())
}
