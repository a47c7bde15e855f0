// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal-startup error taxonomy (§7 kind 5): anything here exits the
//! process non-zero before the steady-state loop is ever entered.

use gs_adapters::{DomainActuatorError, UnitActuatorError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to open virtualization connection: {0}")]
    VirtConnect(#[source] DomainActuatorError),

    #[error("failed to connect to the service manager bus: {0}")]
    BusConnect(#[source] UnitActuatorError),

    #[error("failed to claim the well-known bus name")]
    ClaimBusName,
}
