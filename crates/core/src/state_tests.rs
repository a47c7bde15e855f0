// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    active       = { "active", Some(ActiveState::Active) },
    activating   = { "activating", Some(ActiveState::Activating) },
    inactive     = { "inactive", Some(ActiveState::Inactive) },
    deactivating = { "deactivating", Some(ActiveState::Deactivating) },
    failed       = { "failed", Some(ActiveState::Failed) },
    reloading    = { "reloading", Some(ActiveState::Reloading) },
    unknown      = { "bogus", None },
)]
fn active_state_parse_cases(raw: &str, expected: Option<ActiveState>) {
    assert_eq!(ActiveState::parse(raw), expected);
}

#[yare::parameterized(
    active       = { ActiveState::Active, Some(Projection::Active) },
    activating   = { ActiveState::Activating, Some(Projection::Active) },
    inactive     = { ActiveState::Inactive, Some(Projection::Inactive) },
    deactivating = { ActiveState::Deactivating, None },
    failed       = { ActiveState::Failed, None },
    reloading    = { ActiveState::Reloading, None },
)]
fn project_cases(state: ActiveState, expected: Option<Projection>) {
    assert_eq!(state.project(), expected);
}

#[test]
fn active_state_display_roundtrips_parse() {
    for state in [
        ActiveState::Active,
        ActiveState::Activating,
        ActiveState::Inactive,
        ActiveState::Deactivating,
        ActiveState::Failed,
        ActiveState::Reloading,
    ] {
        assert_eq!(ActiveState::parse(&state.to_string()), Some(state));
    }
}

#[test]
fn projection_from_active_bool() {
    assert_eq!(Projection::from_active_bool(true), Projection::Active);
    assert_eq!(Projection::from_active_bool(false), Projection::Inactive);
}

#[test]
fn projection_is_active() {
    assert!(Projection::Active.is_active());
    assert!(!Projection::Inactive.is_active());
}

#[yare::parameterized(
    start   = { ActionOp::Start, Some(Projection::Active) },
    stop    = { ActionOp::Stop, Some(Projection::Inactive) },
    restart = { ActionOp::Restart, None },
)]
fn action_op_target_cases(op: ActionOp, expected: Option<Projection>) {
    assert_eq!(op.target(), expected);
}

#[test]
fn action_op_display() {
    assert_eq!(ActionOp::Start.to_string(), "start");
    assert_eq!(ActionOp::Stop.to_string(), "stop");
    assert_eq!(ActionOp::Restart.to_string(), "restart");
}
