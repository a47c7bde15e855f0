// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine-level error taxonomy, wrapping both actuators' errors into
//! the five kinds named at §7.

use gs_adapters::{DomainActuatorError, UnitActuatorError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unit actuator error: {0}")]
    Unit(#[from] UnitActuatorError),

    #[error("domain actuator error: {0}")]
    Domain(#[from] DomainActuatorError),

    /// Synchronous convergence did not observe the target state within
    /// `TIMEOUT`.
    #[error("{action} on {domain_name} timed out after {elapsed_secs}s")]
    ConvergenceTimeout { action: &'static str, domain_name: String, elapsed_secs: u64 },

    /// An event carried a shape the engine doesn't understand (unknown
    /// `ActiveState`, an event class that isn't lifecycle/reboot).
    #[error("protocol error: {0}")]
    Protocol(String),
}
