//! # Telemetry Module
//!
//! Fixed-rate vehicle telemetry sampling and publishing.
//!
//! This module handles:
//! - The canonical snapshot record captured once per tick
//! - Durable, atomically-replaced JSON output
//! - The sampling loop with cooperative shutdown

pub mod publisher;
pub mod sink;
pub mod types;
