// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! gs-engine: the cross-subsystem reconciliation engine.
//!
//! Ties the domain-state store, the action ledger, and the two actuator
//! façades from `gs-adapters` into the event bridge, bootstrap
//! reconciler, and the synchronous/asynchronous domain actuators.

mod action;
mod async_actuator;
mod bridge;
mod error;
mod reconcile;
mod sync_actuator;

pub use action::ActionRequest;
pub use async_actuator::{AsyncActuatorConfig, AsyncDomainActuator, DEFAULT_COALESCE_THRESHOLD, DEFAULT_MAX_WORKERS};
pub use bridge::{DomainLifecycleEvent, EventBridge};
pub use error::EngineError;
pub use reconcile::BootstrapReconciler;
pub use sync_actuator::{converge, SyncActuatorConfig, DEFAULT_CHECK_DELAY, DEFAULT_TIMEOUT};
