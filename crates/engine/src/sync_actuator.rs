// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The idempotent synchronous actuator (§4.5): drives a single domain to
//! a target state and blocks until convergence or timeout. Shared by the
//! async worker pool and the one-shot actuator program.

use std::time::{Duration, Instant};

use gs_adapters::{DomainActuator, DomainActuatorError};
use gs_core::{ActionOp, Projection};
use gs_store::DomainStateStore;
use tracing::{info, warn};

use crate::error::EngineError;

pub const DEFAULT_CHECK_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Polling cadence and deadline for [`converge`].
#[derive(Debug, Clone, Copy)]
pub struct SyncActuatorConfig {
    pub check_delay: Duration,
    pub timeout: Duration,
}

impl Default for SyncActuatorConfig {
    fn default() -> Self {
        Self { check_delay: DEFAULT_CHECK_DELAY, timeout: DEFAULT_TIMEOUT }
    }
}

/// Drive `domain_name` toward the target state of `op`. `restart` composes
/// `stop` then `start`, each against the full timeout budget independently.
pub async fn converge(
    domain_actuator: &dyn DomainActuator,
    store: &DomainStateStore,
    op: ActionOp,
    domain_name: &str,
    config: &SyncActuatorConfig,
) -> Result<(), EngineError> {
    match op {
        ActionOp::Start | ActionOp::Stop => {
            converge_one(domain_actuator, store, op, domain_name, config).await
        }
        ActionOp::Restart => {
            info!(domain_name, "restart: stop phase");
            converge_one(domain_actuator, store, ActionOp::Stop, domain_name, config).await?;
            info!(domain_name, "restart: start phase");
            converge_one(domain_actuator, store, ActionOp::Start, domain_name, config).await
        }
    }
}

async fn converge_one(
    domain_actuator: &dyn DomainActuator,
    store: &DomainStateStore,
    op: ActionOp,
    domain_name: &str,
    config: &SyncActuatorConfig,
) -> Result<(), EngineError> {
    let target = match op.target() {
        Some(target) => target,
        None => {
            return Err(EngineError::Protocol(format!(
                "converge_one called with {op:?}, which has no single target projection"
            )))
        }
    };
    let started_at = Instant::now();

    if refresh(domain_actuator, store, domain_name, op).await?.is_none() {
        // Not-found while stopping: already at the target state.
        return Ok(());
    }
    if store.get(domain_name) == Some(target) {
        return Ok(());
    }

    issue_native_action(domain_actuator, op, domain_name).await?;

    loop {
        tokio::time::sleep(config.check_delay).await;

        if op == ActionOp::Stop {
            // The guest may not yet have processed the ACPI request; keep
            // asking while we wait for convergence.
            domain_actuator.shutdown(domain_name).await?;
        }

        if refresh(domain_actuator, store, domain_name, op).await?.is_none() {
            return Ok(());
        }
        if store.get(domain_name) == Some(target) {
            return Ok(());
        }

        if started_at.elapsed() > config.timeout {
            return Err(EngineError::ConvergenceTimeout {
                action: op.name(),
                domain_name: domain_name.to_string(),
                elapsed_secs: started_at.elapsed().as_secs(),
            });
        }
    }
}

async fn issue_native_action(
    domain_actuator: &dyn DomainActuator,
    op: ActionOp,
    domain_name: &str,
) -> Result<(), EngineError> {
    match op {
        ActionOp::Start => domain_actuator.create(domain_name).await.map_err(EngineError::from),
        ActionOp::Stop => domain_actuator.shutdown(domain_name).await.map_err(EngineError::from),
        ActionOp::Restart => unreachable!("restart is composed by the caller"),
    }
}

/// Query the domain's current `active` bit, writing it into the store.
/// Returns `Ok(None)` when the domain is undefined and `op` is `Stop`
/// (already-at-target per §7).
async fn refresh(
    domain_actuator: &dyn DomainActuator,
    store: &DomainStateStore,
    domain_name: &str,
    op: ActionOp,
) -> Result<Option<bool>, EngineError> {
    match domain_actuator.is_active(domain_name).await {
        Ok(active) => {
            store.update(domain_name, active);
            Ok(Some(active))
        }
        Err(DomainActuatorError::NotFound(_)) if op == ActionOp::Stop => {
            warn!(domain_name, "domain not found while stopping, treating as already inactive");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

trait ActionOpExt {
    fn name(self) -> &'static str;
}

impl ActionOpExt for ActionOp {
    fn name(self) -> &'static str {
        match self {
            ActionOp::Start => "start",
            ActionOp::Stop => "stop",
            ActionOp::Restart => "restart",
        }
    }
}

#[cfg(test)]
#[path = "sync_actuator_tests.rs"]
mod tests;
