// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The domain actuator: a typed façade over the virtualization host.
//!
//! This is the low-level, single-call surface the synchronous convergence
//! algorithm in `gs-engine` drives in a poll loop; it does not itself know
//! about targets, timeouts, or coalescing (§4.5).

use async_trait::async_trait;
use thiserror::Error;

/// Errors the domain actuator can surface, matching the five kinds in §7.
#[derive(Debug, Error)]
pub enum DomainActuatorError {
    /// The domain is not defined on the host. Callers treat this as
    /// already-at-target when stopping, and log-and-drop when starting.
    #[error("domain not found: {0}")]
    NotFound(String),

    /// Library call failed transiently (connection hiccup). The caller
    /// drops the in-flight request; the next event retries naturally.
    #[error("transient virtualization error: {0}")]
    Transient(String),

    /// Fatal at startup, re-raised at runtime.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The library returned a shape this actuator doesn't understand.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Thin façade over the virtualization host: create/shutdown a named
/// domain, read its `active` bit, and enumerate every domain the host
/// knows about.
#[async_trait]
pub trait DomainActuator: Send + Sync {
    /// Issue the native "start" action (`create`). Does not wait for
    /// convergence; that is the synchronous actuator's job.
    async fn create(&self, domain_name: &str) -> Result<(), DomainActuatorError>;

    /// Issue the native "stop" action (`shutdown`, an ACPI request the
    /// guest may ignore — callers re-issue it on each poll iteration).
    async fn shutdown(&self, domain_name: &str) -> Result<(), DomainActuatorError>;

    /// Read whether `domain_name` is currently running.
    async fn is_active(&self, domain_name: &str) -> Result<bool, DomainActuatorError>;

    /// List every domain name the host currently knows about, with its
    /// `active` bit.
    async fn enumerate(&self) -> Result<Vec<(String, bool)>, DomainActuatorError>;
}
