// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event bridge (§4.6): translates unit property-change signals and
//! domain lifecycle events into requests on the opposite side, dropping
//! echoes the daemon's own prior action produced.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gs_adapters::UnitActuator;
use gs_core::{codec, ActiveState};
use gs_store::{ActionLedger, DomainStateStore};
use tracing::{debug, warn};

use crate::async_actuator::{AsyncDomainActuator, DEFAULT_COALESCE_THRESHOLD};

const UNIT_INTERFACE: &str = "org.freedesktop.systemd1.Unit";

/// The domain lifecycle event classes named at §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainLifecycleEvent {
    Started,
    Stopped,
    Reboot,
}

pub struct EventBridge {
    store: Arc<DomainStateStore>,
    ledger: Arc<ActionLedger>,
    unit_actuator: Arc<dyn UnitActuator>,
    domain_actuator: AsyncDomainActuator,
    unit_prefix: String,
    unit_suffix: String,
    coalesce_threshold: Duration,
}

impl EventBridge {
    pub fn new(
        store: Arc<DomainStateStore>,
        ledger: Arc<ActionLedger>,
        unit_actuator: Arc<dyn UnitActuator>,
        domain_actuator: AsyncDomainActuator,
        unit_prefix: impl Into<String>,
        unit_suffix: impl Into<String>,
    ) -> Self {
        Self::with_coalesce_threshold(
            store,
            ledger,
            unit_actuator,
            domain_actuator,
            unit_prefix,
            unit_suffix,
            DEFAULT_COALESCE_THRESHOLD,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_coalesce_threshold(
        store: Arc<DomainStateStore>,
        ledger: Arc<ActionLedger>,
        unit_actuator: Arc<dyn UnitActuator>,
        domain_actuator: AsyncDomainActuator,
        unit_prefix: impl Into<String>,
        unit_suffix: impl Into<String>,
        coalesce_threshold: Duration,
    ) -> Self {
        Self {
            store,
            ledger,
            unit_actuator,
            domain_actuator,
            unit_prefix: unit_prefix.into(),
            unit_suffix: unit_suffix.into(),
            coalesce_threshold,
        }
    }

    fn unit_name(&self, domain_name: &str) -> String {
        codec::unit_name(&self.unit_prefix, domain_name, &self.unit_suffix)
    }

    /// Handle a `PropertiesChanged` signal already split into its
    /// component parts: the interface it fired on, the map of changed
    /// property name to new value, and the full unit name the signal
    /// path resolved to.
    pub async fn on_unit_properties_changed(
        &self,
        interface: &str,
        changed_properties: &HashMap<String, String>,
        unit_full_name: &str,
    ) {
        if interface != UNIT_INTERFACE {
            return;
        }
        let Some(raw_state) = changed_properties.get("ActiveState") else {
            return;
        };

        // `unit_full_name` is already the unescaped literal name (the
        // caller unescapes the D-Bus object path segment before calling
        // in); `parse` just splits it into prefix/instance/suffix.
        let parsed = codec::parse(unit_full_name);
        if parsed.prefix != self.unit_prefix {
            return;
        }
        let domain_name = parsed.instance;

        let Some(raw) = ActiveState::parse(raw_state) else {
            warn!(unit = unit_full_name, raw = raw_state, "unrecognized ActiveState on PropertiesChanged");
            return;
        };
        let Some(projection) = raw.project() else {
            debug!(unit = unit_full_name, state = %raw, "ignoring unprojectable ActiveState");
            return;
        };

        if self.store.get(&domain_name) == Some(projection) {
            debug!(domain_name, %projection, "dropping unit event, already at projected state (echo)");
            return;
        }

        self.store.update(&domain_name, projection.is_active());
        if projection.is_active() {
            self.domain_actuator.start(&domain_name);
        } else {
            self.domain_actuator.stop(&domain_name);
        }
    }

    /// Handle a domain lifecycle/reboot event. The ledger entry recorded
    /// here is what lets the unit-side handler recognize the resulting
    /// `PropertiesChanged` signal as a self-generated echo.
    pub async fn on_domain_lifecycle(&self, domain_name: &str, event: DomainLifecycleEvent) {
        let unit_name = self.unit_name(domain_name);
        match event {
            DomainLifecycleEvent::Started => {
                self.store.update(domain_name, true);
                self.ledger.record(domain_name);
                self.dispatch_unit(&unit_name, UnitOp::Start).await;
            }
            DomainLifecycleEvent::Stopped => {
                self.store.update(domain_name, false);
                self.ledger.record(domain_name);
                self.dispatch_unit(&unit_name, UnitOp::Stop).await;
            }
            DomainLifecycleEvent::Reboot => {
                // No projection change: the domain stays active through a
                // guest-initiated reboot. Unlike start/stop, restart has no
                // idempotence check at the unit actuator, so a burst of
                // reboot events needs the ledger to suppress duplicates.
                self.ledger.record(domain_name);
                if self.ledger.acted_recently(domain_name, self.coalesce_threshold) {
                    debug!(domain_name, "dropping duplicate reboot event within coalesce threshold");
                    return;
                }
                self.dispatch_unit(&unit_name, UnitOp::Restart).await;
            }
        }
    }

    async fn dispatch_unit(&self, unit_name: &str, op: UnitOp) {
        let result = match op {
            UnitOp::Start => self.unit_actuator.start(unit_name).await,
            UnitOp::Stop => self.unit_actuator.stop(unit_name).await,
            UnitOp::Restart => self.unit_actuator.restart(unit_name).await,
        };
        if let Err(e) = result {
            warn!(unit_name, ?op, error = %e, "unit actuator call failed");
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum UnitOp {
    Start,
    Stop,
    Restart,
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
