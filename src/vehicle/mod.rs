//! # Vehicle Module
//!
//! Capability traits for the simulated vehicle and the concrete simulator
//! client that implements them.
//!
//! This module handles:
//! - The state-query surface consumed by the telemetry publisher
//! - The control surface (api control, arm, takeoff, land) consumed by the
//!   flight sequences
//! - The line-delimited JSON session with the simulator bridge

pub mod sim_client;

pub use sim_client::SimClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::telemetry::types::{Quaternion, Vec3};

/// Live vehicle state as reported by the simulator
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quaternion,
    /// Battery percentage, when the simulator exposes one
    #[serde(default)]
    pub battery: Option<u8>,
    pub armed: bool,
}

/// State-query surface of a vehicle session
///
/// This is the only capability the telemetry publisher consumes:
/// one live state read per tick, plus a best-effort release of control
/// authority during shutdown.
#[async_trait]
pub trait VehicleLink: Send {
    /// Read the current vehicle state
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError`] when the connection is lost or the
    /// state is unavailable. A failed read invalidates the session.
    async fn read_state(&mut self) -> Result<VehicleState, ProviderError>;

    /// Release control authority (disarm and drop api control)
    ///
    /// Invoked once during shutdown. Failures are reported but the caller
    /// treats them as best-effort.
    async fn release_control(&mut self) -> Result<(), ProviderError>;
}

/// Control surface of a vehicle session
///
/// Consumed by the pre-flight and takeoff/hover/land sequences. The
/// simulator owns all of the actual flight behavior; these calls block
/// until the simulator reports the maneuver complete.
#[async_trait]
pub trait FlightControl: Send {
    /// Grant or revoke api control authority
    async fn enable_api_control(&mut self, enabled: bool) -> Result<(), ProviderError>;

    /// Arm or disarm the vehicle
    async fn arm_disarm(&mut self, arm: bool) -> Result<(), ProviderError>;

    /// Take off and climb to the default hover altitude
    async fn takeoff(&mut self) -> Result<(), ProviderError>;

    /// Land at the current position
    async fn land(&mut self) -> Result<(), ProviderError>;
}
