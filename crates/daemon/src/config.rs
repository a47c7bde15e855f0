// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

use gs_engine::{AsyncActuatorConfig, SyncActuatorConfig};

const DEFAULT_UNIT_PREFIX: &str = "libvirt-guest";
const DEFAULT_UNIT_SUFFIX: &str = "service";

/// Resolved configuration for a daemon run, built once at startup from
/// the environment (§4.9).
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub unit_prefix: String,
    pub unit_suffix: String,
    pub coalesce_threshold: Duration,
    pub convergence_timeout: Duration,
    pub check_delay: Duration,
    pub ledger_window: Duration,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self {
            unit_prefix: env_string("GUESTSYNC_UNIT_PREFIX", DEFAULT_UNIT_PREFIX),
            unit_suffix: env_string("GUESTSYNC_UNIT_SUFFIX", DEFAULT_UNIT_SUFFIX),
            coalesce_threshold: env_secs("GUESTSYNC_COALESCE_SECS", 3),
            convergence_timeout: env_secs("GUESTSYNC_TIMEOUT_SECS", 120),
            check_delay: env_secs("GUESTSYNC_CHECK_DELAY_SECS", 1),
            ledger_window: env_secs("GUESTSYNC_LEDGER_WINDOW_SECS", 60),
        }
    }

    pub fn sync_actuator_config(&self) -> SyncActuatorConfig {
        SyncActuatorConfig { check_delay: self.check_delay, timeout: self.convergence_timeout }
    }

    pub fn async_actuator_config(&self) -> AsyncActuatorConfig {
        AsyncActuatorConfig {
            coalesce_threshold: self.coalesce_threshold,
            max_workers: gs_engine::DEFAULT_MAX_WORKERS,
            sync: self.sync_actuator_config(),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
}

fn env_secs(key: &str, default: u64) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
