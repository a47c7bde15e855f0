// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The asynchronous domain actuator (§4.5): an unbounded FIFO fronting a
//! bounded worker pool that coalesces near-duplicates via the ledger and
//! dispatches surviving requests to [`crate::sync_actuator::converge`].

use std::sync::Arc;
use std::time::Duration;

use gs_adapters::DomainActuator;
use gs_core::ActionOp;
use gs_store::{ActionLedger, DomainStateStore};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error};

use crate::action::ActionRequest;
use crate::sync_actuator::{self, SyncActuatorConfig};

pub const DEFAULT_COALESCE_THRESHOLD: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_WORKERS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct AsyncActuatorConfig {
    pub coalesce_threshold: Duration,
    pub max_workers: usize,
    pub sync: SyncActuatorConfig,
}

impl Default for AsyncActuatorConfig {
    fn default() -> Self {
        Self {
            coalesce_threshold: DEFAULT_COALESCE_THRESHOLD,
            max_workers: DEFAULT_MAX_WORKERS,
            sync: SyncActuatorConfig::default(),
        }
    }
}

/// Front end of the request intake: `start`/`stop`/`restart` place a
/// request on the FIFO and return immediately. The worker loop itself
/// runs detached on the tokio runtime.
#[derive(Clone)]
pub struct AsyncDomainActuator {
    tx: mpsc::UnboundedSender<ActionRequest>,
}

impl AsyncDomainActuator {
    /// Spawn the worker loop and return a handle for enqueuing requests.
    pub fn spawn(
        domain_actuator: Arc<dyn DomainActuator>,
        store: Arc<DomainStateStore>,
        ledger: Arc<ActionLedger>,
        config: AsyncActuatorConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker_loop(rx, domain_actuator, store, ledger, config));
        Self { tx }
    }

    pub fn start(&self, domain_name: &str) {
        self.enqueue(ActionOp::Start, domain_name);
    }

    pub fn stop(&self, domain_name: &str) {
        self.enqueue(ActionOp::Stop, domain_name);
    }

    pub fn restart(&self, domain_name: &str) {
        self.enqueue(ActionOp::Restart, domain_name);
    }

    fn enqueue(&self, op: ActionOp, domain_name: &str) {
        let request = ActionRequest::new(op, domain_name);
        // The receiver only disappears if the worker loop task died, which
        // only happens alongside the runtime shutting down.
        if self.tx.send(request).is_err() {
            error!(domain_name, %op, "domain actuator worker loop is gone, dropping request");
        }
    }
}

async fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<ActionRequest>,
    domain_actuator: Arc<dyn DomainActuator>,
    store: Arc<DomainStateStore>,
    ledger: Arc<ActionLedger>,
    config: AsyncActuatorConfig,
) {
    let semaphore = Arc::new(Semaphore::new(config.max_workers));
    while let Some(request) = rx.recv().await {
        ledger.record(&request.domain_name);
        if ledger.acted_recently(&request.domain_name, config.coalesce_threshold) {
            debug!(domain_name = %request.domain_name, op = %request.op, "coalescing duplicate request");
            continue;
        }

        let semaphore = semaphore.clone();
        let domain_actuator = domain_actuator.clone();
        let store = store.clone();
        let sync_config = config.sync;
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            let result =
                sync_actuator::converge(domain_actuator.as_ref(), &store, request.op, &request.domain_name, &sync_config)
                    .await;
            if let Err(e) = result {
                error!(domain_name = %request.domain_name, op = %request.op, error = %e, "convergence failed");
            }
        });
    }
}

#[cfg(test)]
#[path = "async_actuator_tests.rs"]
mod tests;
