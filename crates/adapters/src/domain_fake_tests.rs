// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn create_on_undefined_domain_is_not_found() {
    let fake = FakeDomainActuator::new();
    let err = fake.create("alpha").await.unwrap_err();
    assert!(matches!(err, DomainActuatorError::NotFound(_)));
}

#[tokio::test]
async fn create_transitions_to_active_and_records_a_call() {
    let fake = FakeDomainActuator::new();
    fake.define("alpha", false);
    fake.create("alpha").await.unwrap();
    assert_eq!(fake.is_active("alpha").await.unwrap(), true);
    assert_eq!(fake.calls(), vec![DomainCall::Create("alpha".to_string())]);
}

#[tokio::test]
async fn shutdown_transitions_to_inactive() {
    let fake = FakeDomainActuator::new();
    fake.define("alpha", true);
    fake.shutdown("alpha").await.unwrap();
    assert_eq!(fake.is_active("alpha").await.unwrap(), false);
}

#[tokio::test]
async fn stubborn_domain_ignores_shutdown_until_the_budget_is_spent() {
    let fake = FakeDomainActuator::new();
    fake.define("delta", true);
    fake.make_stubborn("delta", 2);
    fake.shutdown("delta").await.unwrap();
    assert_eq!(fake.is_active("delta").await.unwrap(), true);
    fake.shutdown("delta").await.unwrap();
    assert_eq!(fake.is_active("delta").await.unwrap(), true);
    fake.shutdown("delta").await.unwrap();
    assert_eq!(fake.is_active("delta").await.unwrap(), false);
    assert_eq!(fake.calls().len(), 3);
}

#[tokio::test]
async fn enumerate_lists_every_defined_domain() {
    let fake = FakeDomainActuator::new();
    fake.define("alpha", true);
    fake.define("beta", false);
    let mut domains = fake.enumerate().await.unwrap();
    domains.sort();
    assert_eq!(domains, vec![("alpha".to_string(), true), ("beta".to_string(), false)]);
}
