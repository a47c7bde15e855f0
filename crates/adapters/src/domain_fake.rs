// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`DomainActuator`] for engine- and daemon-level tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::domain::{DomainActuator, DomainActuatorError};

/// One observed call, recorded in the order the actuator received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainCall {
    Create(String),
    Shutdown(String),
}

#[derive(Default)]
struct Inner {
    defined: HashMap<String, bool>,
    calls: Vec<DomainCall>,
    /// Domains listed here ignore `shutdown()` until this many calls have
    /// accumulated against them — simulates a guest that stalls ACPI.
    stubborn: HashMap<String, u32>,
}

/// Tracks a fixed set of domains against an in-memory `active` bit.
pub struct FakeDomainActuator {
    inner: Mutex<Inner>,
}

impl FakeDomainActuator {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    /// Define `domain_name` as known to the host, with a starting `active`
    /// bit.
    pub fn define(&self, domain_name: impl Into<String>, active: bool) {
        self.inner.lock().defined.insert(domain_name.into(), active);
    }

    /// Make `domain_name` ignore its first `ignored_shutdowns` `shutdown()`
    /// calls before actually transitioning to inactive.
    pub fn make_stubborn(&self, domain_name: impl Into<String>, ignored_shutdowns: u32) {
        self.inner.lock().stubborn.insert(domain_name.into(), ignored_shutdowns);
    }

    pub fn calls(&self) -> Vec<DomainCall> {
        self.inner.lock().calls.clone()
    }

    pub fn is_defined(&self, domain_name: &str) -> bool {
        self.inner.lock().defined.contains_key(domain_name)
    }
}

impl Default for FakeDomainActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainActuator for FakeDomainActuator {
    async fn create(&self, domain_name: &str) -> Result<(), DomainActuatorError> {
        let mut inner = self.inner.lock();
        if !inner.defined.contains_key(domain_name) {
            return Err(DomainActuatorError::NotFound(domain_name.to_string()));
        }
        inner.calls.push(DomainCall::Create(domain_name.to_string()));
        inner.defined.insert(domain_name.to_string(), true);
        Ok(())
    }

    async fn shutdown(&self, domain_name: &str) -> Result<(), DomainActuatorError> {
        let mut inner = self.inner.lock();
        if !inner.defined.contains_key(domain_name) {
            return Err(DomainActuatorError::NotFound(domain_name.to_string()));
        }
        inner.calls.push(DomainCall::Shutdown(domain_name.to_string()));
        let remaining = inner.stubborn.get_mut(domain_name);
        match remaining {
            Some(n) if *n > 0 => {
                *n -= 1;
            }
            _ => {
                inner.defined.insert(domain_name.to_string(), false);
            }
        }
        Ok(())
    }

    async fn is_active(&self, domain_name: &str) -> Result<bool, DomainActuatorError> {
        self.inner
            .lock()
            .defined
            .get(domain_name)
            .copied()
            .ok_or_else(|| DomainActuatorError::NotFound(domain_name.to_string()))
    }

    async fn enumerate(&self) -> Result<Vec<(String, bool)>, DomainActuatorError> {
        Ok(self.inner.lock().defined.iter().map(|(name, active)| (name.clone(), *active)).collect())
    }
}

#[cfg(test)]
#[path = "domain_fake_tests.rs"]
mod tests;
