// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bootstrap reconciler (§4.7): on daemon startup, enumerates both
//! subsystems and issues the minimal set of actions to bring them into
//! agreement before the steady-state event loop takes over.

use std::collections::HashSet;
use std::sync::Arc;

use gs_adapters::{DomainActuator, UnitActuator};
use gs_core::{codec, ActiveState};
use gs_store::DomainStateStore;
use tracing::{error, info, warn};

pub struct BootstrapReconciler {
    store: Arc<DomainStateStore>,
    domain_actuator: Arc<dyn DomainActuator>,
    unit_actuator: Arc<dyn UnitActuator>,
    unit_prefix: String,
    unit_suffix: String,
}

impl BootstrapReconciler {
    pub fn new(
        store: Arc<DomainStateStore>,
        domain_actuator: Arc<dyn DomainActuator>,
        unit_actuator: Arc<dyn UnitActuator>,
        unit_prefix: impl Into<String>,
        unit_suffix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            domain_actuator,
            unit_actuator,
            unit_prefix: unit_prefix.into(),
            unit_suffix: unit_suffix.into(),
        }
    }

    fn unit_name(&self, domain_name: &str) -> String {
        codec::unit_name(&self.unit_prefix, domain_name, &self.unit_suffix)
    }

    /// Run the full reconciliation pass. Errors on any single pair are
    /// logged and do not abort the remaining work.
    pub async fn run(&self) {
        let domains = match self.domain_actuator.enumerate().await {
            Ok(domains) => domains,
            Err(e) => {
                error!(error = %e, "bootstrap: failed to enumerate domains, skipping reconciliation");
                return;
            }
        };
        self.store.reload(domains.iter().map(|(name, active)| (name.clone(), *active)));

        let mut known_domains = HashSet::new();
        for (domain_name, active) in &domains {
            known_domains.insert(domain_name.clone());
            self.reconcile_domain(domain_name, *active).await;
        }

        let units = match self.unit_actuator.enumerate(&self.unit_prefix).await {
            Ok(units) => units,
            Err(e) => {
                error!(error = %e, "bootstrap: failed to enumerate units, skipping orphan sweep");
                return;
            }
        };
        for (unit_name, _) in units {
            let parsed = codec::parse(&unit_name);
            let instance = match codec::unescape(&parsed.instance) {
                Ok(instance) => instance,
                Err(e) => {
                    warn!(unit_name, error = %e, "bootstrap: failed to unescape unit instance");
                    continue;
                }
            };
            if !known_domains.contains(&instance) {
                info!(unit_name, "bootstrap: unit has no matching domain, stopping");
                if let Err(e) = self.unit_actuator.stop(&unit_name).await {
                    error!(unit_name, error = %e, "bootstrap: failed to stop orphaned unit");
                }
            }
        }
    }

    async fn reconcile_domain(&self, domain_name: &str, domain_active: bool) {
        let unit_name = self.unit_name(domain_name);
        let raw_state = match self.unit_actuator.active_state(&unit_name).await {
            Ok(state) => state,
            Err(gs_adapters::UnitActuatorError::NotFound(_)) => ActiveState::Inactive,
            Err(e) => {
                error!(domain_name, unit_name, error = %e, "bootstrap: failed to read unit state");
                return;
            }
        };
        let Some(unit_projected_active) = raw_state.project().map(|p| p.is_active()) else {
            warn!(domain_name, unit_name, state = %raw_state, "bootstrap: unprojectable unit state, skipping");
            return;
        };

        if unit_projected_active == domain_active {
            return;
        }

        let result = if domain_active { self.unit_actuator.start(&unit_name).await } else { self.unit_actuator.stop(&unit_name).await };
        if let Err(e) = result {
            error!(domain_name, unit_name, error = %e, "bootstrap: failed to reconcile unit to domain state");
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
