// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unknown_domain_is_absent() {
    let store = DomainStateStore::new();
    assert_eq!(store.get("alpha"), None);
}

#[test]
fn update_inserts_and_overwrites() {
    let store = DomainStateStore::new();
    store.update("alpha", true);
    assert_eq!(store.get("alpha"), Some(Projection::Active));
    store.update("alpha", false);
    assert_eq!(store.get("alpha"), Some(Projection::Inactive));
}

#[test]
fn reload_replaces_all_entries() {
    let store = DomainStateStore::new();
    store.update("stale", true);
    store.reload([("alpha".to_string(), true), ("beta".to_string(), false)]);
    assert_eq!(store.get("stale"), None);
    assert_eq!(store.get("alpha"), Some(Projection::Active));
    assert_eq!(store.get("beta"), Some(Projection::Inactive));
}

#[test]
fn snapshot_is_an_independent_copy() {
    let store = DomainStateStore::new();
    store.update("alpha", true);
    let snap = store.snapshot();
    store.update("alpha", false);
    assert_eq!(snap.get("alpha"), Some(&Projection::Active));
    assert_eq!(store.get("alpha"), Some(Projection::Inactive));
}

#[test]
fn len_and_is_empty_track_contents() {
    let store = DomainStateStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    store.update("alpha", true);
    assert!(!store.is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn reload_with_empty_enumerator_clears_store() {
    let store = DomainStateStore::new();
    store.update("alpha", true);
    store.reload(std::iter::empty());
    assert!(store.is_empty());
}
