// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gs_adapters::FakeDomainActuator;
use std::time::Duration;

fn fast_config() -> SyncActuatorConfig {
    SyncActuatorConfig { check_delay: Duration::from_millis(1), timeout: Duration::from_millis(50) }
}

#[tokio::test]
async fn start_on_already_active_domain_is_a_no_op() {
    let fake = FakeDomainActuator::new();
    fake.define("alpha", true);
    let store = DomainStateStore::new();
    converge(&fake, &store, ActionOp::Start, "alpha", &fast_config()).await.unwrap();
    assert!(fake.calls().is_empty());
    assert_eq!(store.get("alpha"), Some(Projection::Active));
}

#[tokio::test]
async fn start_on_inactive_domain_issues_create_and_converges() {
    let fake = FakeDomainActuator::new();
    fake.define("alpha", false);
    let store = DomainStateStore::new();
    converge(&fake, &store, ActionOp::Start, "alpha", &fast_config()).await.unwrap();
    assert_eq!(fake.calls(), vec![gs_adapters::DomainCall::Create("alpha".to_string())]);
    assert_eq!(store.get("alpha"), Some(Projection::Active));
}

#[tokio::test]
async fn stop_on_undefined_domain_is_already_at_target() {
    let fake = FakeDomainActuator::new();
    let store = DomainStateStore::new();
    converge(&fake, &store, ActionOp::Stop, "ghost", &fast_config()).await.unwrap();
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn stop_re_issues_shutdown_until_the_stubborn_guest_yields() {
    let fake = FakeDomainActuator::new();
    fake.define("delta", true);
    fake.make_stubborn("delta", 2);
    let store = DomainStateStore::new();
    converge(&fake, &store, ActionOp::Stop, "delta", &fast_config()).await.unwrap();
    assert_eq!(fake.calls().len(), 3);
    assert_eq!(store.get("delta"), Some(Projection::Inactive));
}

#[tokio::test]
async fn stop_times_out_against_a_permanently_stubborn_guest() {
    let fake = FakeDomainActuator::new();
    fake.define("delta", true);
    fake.make_stubborn("delta", 1_000_000);
    let store = DomainStateStore::new();
    let err = converge(&fake, &store, ActionOp::Stop, "delta", &fast_config()).await.unwrap_err();
    assert!(matches!(err, EngineError::ConvergenceTimeout { action: "stop", .. }));
}

#[tokio::test]
async fn restart_composes_stop_then_start() {
    let fake = FakeDomainActuator::new();
    fake.define("alpha", true);
    let store = DomainStateStore::new();
    converge(&fake, &store, ActionOp::Restart, "alpha", &fast_config()).await.unwrap();
    assert_eq!(
        fake.calls(),
        vec![
            gs_adapters::DomainCall::Shutdown("alpha".to_string()),
            gs_adapters::DomainCall::Create("alpha".to_string()),
        ]
    );
    assert_eq!(store.get("alpha"), Some(Projection::Active));
}
