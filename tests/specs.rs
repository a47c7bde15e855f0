// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenario tests exercising the reconciliation engine as a
//! whole, against the in-memory fakes from `gs-adapters`.

use std::sync::Arc;
use std::time::Duration;

use gs_adapters::{DomainActuator, FakeDomainActuator, FakeUnitActuator, UnitActuator, UnitCall};
use gs_core::{ActiveState, Projection};
use gs_engine::{
    AsyncActuatorConfig, AsyncDomainActuator, BootstrapReconciler, DomainLifecycleEvent,
    EventBridge, SyncActuatorConfig,
};
use gs_store::{ActionLedger, DomainStateStore};

fn fast_async_config() -> AsyncActuatorConfig {
    AsyncActuatorConfig {
        coalesce_threshold: Duration::from_millis(50),
        max_workers: 5,
        sync: SyncActuatorConfig { check_delay: Duration::from_millis(1), timeout: Duration::from_millis(200) },
    }
}

/// Scenario 1: domain `alpha` is inactive, unit `libvirt-guest@alpha.service`
/// is active. Daemon starts. Expected: the bootstrap reconciler stops the
/// unit; steady state has both inactive.
#[tokio::test]
async fn bootstrap_stops_a_unit_left_active_for_an_inactive_domain() {
    let domain = FakeDomainActuator::new();
    domain.define("alpha", false);
    let unit = FakeUnitActuator::new();
    unit.seed("libvirt-guest@alpha.service", ActiveState::Active);

    let store = Arc::new(DomainStateStore::new());
    let unit_arc = Arc::new(unit);
    let reconciler = BootstrapReconciler::new(
        store.clone(),
        Arc::new(domain),
        unit_arc.clone(),
        "libvirt-guest",
        "service",
    );
    reconciler.run().await;

    assert_eq!(unit_arc.calls(), vec![UnitCall::Stop("libvirt-guest@alpha.service".to_string())]);
    assert_eq!(store.get("alpha"), Some(Projection::Inactive));
    assert_eq!(unit_arc.state_of("libvirt-guest@alpha.service"), Some(ActiveState::Inactive));
}

/// Scenario 2: one-shot `start alpha` with the domain already active.
/// Expected: success, and no virtualization call is made after the
/// initial state check.
#[tokio::test]
async fn one_shot_start_on_an_already_active_domain_makes_no_further_calls() {
    let domain = FakeDomainActuator::new();
    domain.define("alpha", true);
    let store = DomainStateStore::new();

    gs_engine::converge(&domain, &store, gs_core::ActionOp::Start, "alpha", &SyncActuatorConfig::default())
        .await
        .unwrap();

    assert!(domain.calls().is_empty());
}

/// Scenario 3: `systemctl start libvirt-guest@beta` arrives as a unit
/// property change. Expected: within the timeout, domain `beta` becomes
/// active; the resulting `STARTED` lifecycle event is recognized as an
/// echo via the ledger and produces no further unit action.
#[tokio::test]
async fn unit_triggered_start_converges_and_the_echo_is_suppressed() {
    let domain = Arc::new(FakeDomainActuator::new());
    domain.define("beta", false);
    let unit = Arc::new(FakeUnitActuator::new());
    let store = Arc::new(DomainStateStore::new());
    let ledger = Arc::new(ActionLedger::new());

    let domain_dyn: Arc<dyn DomainActuator> = domain.clone();
    let async_actuator =
        AsyncDomainActuator::spawn(domain_dyn, store.clone(), ledger.clone(), fast_async_config());
    let unit_dyn: Arc<dyn UnitActuator> = unit.clone();
    let bridge = EventBridge::new(
        store.clone(),
        ledger.clone(),
        unit_dyn,
        async_actuator,
        "libvirt-guest",
        "service",
    );

    let mut changed = std::collections::HashMap::new();
    changed.insert("ActiveState".to_string(), "active".to_string());
    bridge.on_unit_properties_changed("org.freedesktop.systemd1.Unit", &changed, "libvirt-guest@beta.service").await;

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(store.get("beta"), Some(Projection::Active));
    assert_eq!(domain.calls(), vec![gs_adapters::DomainCall::Create("beta".to_string())]);

    // The domain's own STARTED event now arrives; the store already
    // reflects `active`, so the bridge's *unit*-side echo suppression
    // would drop a reflected PropertiesChanged — here we exercise the
    // domain-lifecycle handler directly, which updates the store
    // (unchanged) and asks the unit actuator to start, a no-op since the
    // unit is already active.
    bridge.on_domain_lifecycle("beta", DomainLifecycleEvent::Started).await;
    assert!(unit.calls().is_empty());
}

/// Scenario 4: guest inside domain `gamma` issues an ACPI reboot. Expected:
/// the paired unit receives `Restart` once; a duplicate reboot within the
/// coalesce threshold produces no second restart.
#[tokio::test]
async fn domain_reboot_restarts_the_unit_exactly_once() {
    let domain = FakeDomainActuator::new();
    domain.define("gamma", true);
    let unit = FakeUnitActuator::new();
    unit.seed("libvirt-guest@gamma.service", ActiveState::Active);
    let store = Arc::new(DomainStateStore::new());
    let ledger = Arc::new(ActionLedger::new());

    let domain_dyn: Arc<dyn DomainActuator> = Arc::new(domain);
    let async_actuator =
        AsyncDomainActuator::spawn(domain_dyn, store.clone(), ledger.clone(), fast_async_config());
    let unit_arc = Arc::new(unit);
    let unit_dyn: Arc<dyn UnitActuator> = unit_arc.clone();
    let bridge =
        EventBridge::new(store, ledger, unit_dyn, async_actuator, "libvirt-guest", "service");

    bridge.on_domain_lifecycle("gamma", DomainLifecycleEvent::Reboot).await;
    bridge.on_domain_lifecycle("gamma", DomainLifecycleEvent::Reboot).await;

    assert_eq!(unit_arc.calls(), vec![UnitCall::Restart("libvirt-guest@gamma.service".to_string())]);
}

/// Scenario 5: domain `delta` ignores ACPI shutdown. One-shot `stop delta`
/// with a 5ms-scale timeout budget. Expected: several `shutdown` calls are
/// dispatched at the poll cadence, then a timeout failure.
#[tokio::test]
async fn stubborn_domain_times_out_the_one_shot_stop() {
    let domain = FakeDomainActuator::new();
    domain.define("delta", true);
    domain.make_stubborn("delta", 1_000_000);
    let store = DomainStateStore::new();
    let config =
        SyncActuatorConfig { check_delay: Duration::from_millis(1), timeout: Duration::from_millis(5) };

    let err = gs_engine::converge(&domain, &store, gs_core::ActionOp::Stop, "delta", &config)
        .await
        .unwrap_err();

    assert!(matches!(err, gs_engine::EngineError::ConvergenceTimeout { action: "stop", .. }));
    assert!(domain.calls().len() >= 2);
}

/// Scenario 6: domain `epsilon` does not exist. The daemon receives a unit
/// `PropertiesChanged` naming it. Expected: the start request fails with
/// not-found, is logged, and does not poison the reconciliation loop.
#[tokio::test]
async fn unit_event_for_an_undefined_domain_fails_not_found_without_crashing() {
    let domain = Arc::new(FakeDomainActuator::new());
    // `epsilon` is deliberately never `define`d.
    let unit = Arc::new(FakeUnitActuator::new());
    let store = Arc::new(DomainStateStore::new());
    let ledger = Arc::new(ActionLedger::new());

    let domain_dyn: Arc<dyn DomainActuator> = domain.clone();
    let async_actuator =
        AsyncDomainActuator::spawn(domain_dyn, store.clone(), ledger.clone(), fast_async_config());
    let unit_dyn: Arc<dyn UnitActuator> = unit.clone();
    let bridge = EventBridge::new(store.clone(), ledger, unit_dyn, async_actuator, "libvirt-guest", "service");

    let mut changed = std::collections::HashMap::new();
    changed.insert("ActiveState".to_string(), "active".to_string());
    bridge
        .on_unit_properties_changed("org.freedesktop.systemd1.Unit", &changed, "libvirt-guest@epsilon.service")
        .await;

    // The store was optimistically updated before the domain actuator
    // ran and discovered the domain doesn't exist — the engine drops the
    // failed request and stays healthy rather than panicking.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(store.get("epsilon"), Some(Projection::Active));
}
