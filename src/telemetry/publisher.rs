//! # Telemetry Publisher
//!
//! The fixed-rate sampling loop: read vehicle state, build one snapshot,
//! publish it, sleep, repeat until cancelled or the provider fails.
//!
//! Failure handling is deliberately asymmetric. Losing the simulator
//! session invalidates the whole run, so a provider error ends the loop. A
//! sink error is a transient I/O hiccup, so it is logged and the next tick
//! proceeds on schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::sink::SnapshotSink;
use super::types::TelemetrySnapshot;
use crate::config::TelemetryConfig;
use crate::error::ProviderError;
use crate::vehicle::VehicleLink;

/// Number of published snapshots between progress log messages
const LOG_INTERVAL_TICKS: u64 = 100;

/// Why a publisher run ended
#[derive(Debug)]
pub enum TerminationReason {
    /// External cancellation was requested; a normal termination path
    Cancelled,
    /// The provider failed and the session is no longer usable
    ProviderFailed(ProviderError),
}

/// Cooperative cancellation flag, checked once per tick boundary
///
/// Clone the token into whatever should be able to stop the loop (a Ctrl+C
/// handler in the reference binary) and call [`ShutdownToken::request`].
/// The loop observes the request at the next tick boundary; cancellation is
/// never preemptive mid-tick.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    requested: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the associated run
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Fixed-rate telemetry sampling loop
pub struct Publisher {
    period: Duration,
    battery_fallback: Option<u8>,
}

impl Publisher {
    /// Create a publisher with an explicit sampling period
    ///
    /// # Arguments
    ///
    /// * `period` - Target inter-tick delay (best-effort, sleep-based)
    /// * `battery_fallback` - Placeholder battery percentage for providers
    ///   that do not report one
    pub fn new(period: Duration, battery_fallback: Option<u8>) -> Self {
        Self {
            period,
            battery_fallback,
        }
    }

    /// Create a publisher from the telemetry configuration section
    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.sample_period_ms),
            config.battery_placeholder,
        )
    }

    /// Run the sampling loop until cancellation or provider failure
    ///
    /// Each tick checks the shutdown token, reads the vehicle state, builds
    /// one immutable snapshot, publishes it, and sleeps for the sampling
    /// period. Timestamps are clamped so the sink observes a non-decreasing
    /// sequence even if the wall clock steps backwards.
    ///
    /// Control authority is released exactly once on every termination
    /// path; release failures are logged and swallowed so termination
    /// always completes.
    pub async fn run<V, S>(
        &self,
        vehicle: &mut V,
        sink: &mut S,
        shutdown: &ShutdownToken,
    ) -> TerminationReason
    where
        V: VehicleLink,
        S: SnapshotSink,
    {
        let mut published: u64 = 0;
        let mut last_timestamp = f64::NEG_INFINITY;

        loop {
            if shutdown.is_requested() {
                info!("Shutdown requested, stopping after {} snapshots", published);
                release_control(vehicle).await;
                return TerminationReason::Cancelled;
            }

            let state = match vehicle.read_state().await {
                Ok(state) => state,
                Err(e) => {
                    error!("Vehicle state read failed: {}", e);
                    release_control(vehicle).await;
                    return TerminationReason::ProviderFailed(e);
                }
            };

            let mut snapshot = TelemetrySnapshot::capture(state, self.battery_fallback);
            if snapshot.timestamp < last_timestamp {
                snapshot.timestamp = last_timestamp;
            }
            last_timestamp = snapshot.timestamp;

            match sink.publish(&snapshot) {
                Ok(()) => {
                    published += 1;
                    if published % LOG_INTERVAL_TICKS == 0 {
                        info!("Published {} snapshots", published);
                    }
                }
                // A single bad write must not stop the sampling cadence
                Err(e) => warn!("Snapshot publish failed: {}", e),
            }

            tokio::time::sleep(self.period).await;
        }
    }
}

/// Best-effort release of control authority during shutdown
async fn release_control<V: VehicleLink>(vehicle: &mut V) {
    if let Err(e) = vehicle.release_control().await {
        warn!("Failed to release vehicle control: {}", e);
    }
}
