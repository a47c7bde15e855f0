// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-valued domain/unit state projection and the action vocabulary shared
//! by the ledger, the actuators, and the event bridge.

use crate::simple_display;

/// Raw `ActiveState` as reported by the host service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveState {
    Active,
    Activating,
    Inactive,
    Deactivating,
    Failed,
    Reloading,
}

simple_display! {
    ActiveState {
        Active => "active",
        Activating => "activating",
        Inactive => "inactive",
        Deactivating => "deactivating",
        Failed => "failed",
        Reloading => "reloading",
    }
}

impl ActiveState {
    /// Parse the string reported on the bus. Unknown values are not an
    /// error here — the caller logs and drops them per the "other" row.
    pub fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "active" => Self::Active,
            "activating" => Self::Activating,
            "inactive" => Self::Inactive,
            "deactivating" => Self::Deactivating,
            "failed" => Self::Failed,
            "reloading" => Self::Reloading,
            _ => return None,
        })
    }

    /// Project the raw five/six-valued state into the two-valued
    /// `{active, inactive}` comparison used across subsystems.
    ///
    /// `active` and `activating` project to `Active`; `inactive` projects to
    /// `Inactive`; everything else (deactivating, failed, reloading) is
    /// deliberately left unprojected — the event bridge logs and drops it
    /// rather than guessing.
    pub fn project(self) -> Option<Projection> {
        match self {
            Self::Active | Self::Activating => Some(Projection::Active),
            Self::Inactive => Some(Projection::Inactive),
            Self::Deactivating | Self::Failed | Self::Reloading => None,
        }
    }
}

/// The two-valued simplification used for cross-subsystem comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    Active,
    Inactive,
}

simple_display! {
    Projection {
        Active => "active",
        Inactive => "inactive",
    }
}

impl Projection {
    pub fn from_active_bool(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// An action requested against a domain/unit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionOp {
    Start,
    Stop,
    Restart,
}

simple_display! {
    ActionOp {
        Start => "start",
        Stop => "stop",
        Restart => "restart",
    }
}

impl ActionOp {
    /// The projection this op converges a domain/unit toward.
    ///
    /// `Restart` has no single target; it composes `Stop` then `Start`
    /// and is handled specially by the synchronous actuator.
    pub fn target(self) -> Option<Projection> {
        match self {
            Self::Start => Some(Projection::Active),
            Self::Stop => Some(Projection::Inactive),
            Self::Restart => None,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
