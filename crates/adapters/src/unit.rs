// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unit actuator: a typed façade over the host service manager.
//!
//! The source dispatches bus methods by runtime attribute lookup
//! (`getattr(iface, name)`); this implementation exposes
//! `start`/`stop`/`restart`/`active_state`/`enumerate` as distinct
//! operations and keeps the bus method names behind the trait (§9).

use async_trait::async_trait;
use gs_core::ActiveState;
use thiserror::Error;

/// Errors the unit actuator can surface, matching the five kinds in §7.
#[derive(Debug, Error)]
pub enum UnitActuatorError {
    /// The unit template was never instantiated. Callers treat this as
    /// already-at-target when stopping, and log-and-drop when starting.
    #[error("unit not found: {0}")]
    NotFound(String),

    /// Bus timeout or a transient disconnection. The caller drops the
    /// in-flight request; the next event retries naturally.
    #[error("transient bus error: {0}")]
    Transient(String),

    /// Fatal at startup, re-raised at runtime.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A bus reply carried a shape the actuator doesn't understand.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Thin façade over the host service manager: start/stop/restart a named
/// unit, read its `ActiveState`, and enumerate units under a template
/// prefix.
#[async_trait]
pub trait UnitActuator: Send + Sync {
    /// Start `unit_name` with job mode "fail". No-op if already `active`.
    async fn start(&self, unit_name: &str) -> Result<(), UnitActuatorError>;

    /// Stop `unit_name` with job mode "fail". No-op if already `inactive`.
    async fn stop(&self, unit_name: &str) -> Result<(), UnitActuatorError>;

    /// Restart `unit_name` with job mode "fail", unconditionally.
    async fn restart(&self, unit_name: &str) -> Result<(), UnitActuatorError>;

    /// Read the raw `ActiveState` property of `unit_name`.
    async fn active_state(&self, unit_name: &str) -> Result<ActiveState, UnitActuatorError>;

    /// List every loaded unit whose name starts with `prefix@`, with its
    /// current `ActiveState`.
    async fn enumerate(&self, prefix: &str) -> Result<Vec<(String, ActiveState)>, UnitActuatorError>;
}
