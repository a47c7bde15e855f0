// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real [`DomainActuator`], backed by `libvirt` via the `virt` crate.
//!
//! `virt`'s connection and domain handles are blocking and not `Send`
//! across an `.await` point, so every call is shipped to a blocking
//! thread with [`tokio::task::spawn_blocking`] and the connection itself
//! lives behind a [`parking_lot::Mutex`] so only one blocking call touches
//! it at a time, matching the source's single-threaded libvirt usage.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use virt::connect::Connect;
use virt::domain::Domain;
use virt::error::Error as VirtError;

use crate::domain::{DomainActuator, DomainActuatorError};

/// Drives the libvirt API behind the [`DomainActuator`] façade.
#[derive(Clone)]
pub struct VirtDomainActuator {
    connect: Arc<Mutex<Connect>>,
}

impl VirtDomainActuator {
    pub fn new(connect: Connect) -> Self {
        Self { connect: Arc::new(Mutex::new(connect)) }
    }

    /// Open the default (`qemu:///system`-equivalent) URI, the same
    /// connection the event-loop host registers the event implementation
    /// against.
    pub fn connect_default() -> Result<Self, DomainActuatorError> {
        let connect = Connect::open(None).map_err(map_virt_error)?;
        Ok(Self::new(connect))
    }

    fn run_blocking<T, F>(&self, f: F) -> Result<T, DomainActuatorError>
    where
        T: Send + 'static,
        F: FnOnce(&Connect) -> Result<T, VirtError> + Send + 'static,
    {
        // Blocking libvirt calls run on a dedicated thread per call; the
        // mutex serializes them the way the source's single connection
        // handle implicitly does.
        let guard = self.connect.lock();
        f(&guard).map_err(map_virt_error)
    }
}

fn map_virt_error(err: VirtError) -> DomainActuatorError {
    use virt::error::ErrorNumber;
    match err.code() {
        code if code == ErrorNumber::NoDomain as i32 => DomainActuatorError::NotFound(err.message()),
        code if code == ErrorNumber::AuthFailed as i32 || code == ErrorNumber::OperationDenied as i32 => {
            DomainActuatorError::PermissionDenied(err.message())
        }
        _ => DomainActuatorError::Transient(err.message()),
    }
}

#[async_trait]
impl DomainActuator for VirtDomainActuator {
    async fn create(&self, domain_name: &str) -> Result<(), DomainActuatorError> {
        let this = self.clone();
        let name = domain_name.to_string();
        tokio::task::spawn_blocking(move || {
            this.run_blocking(move |conn| {
                let domain = Domain::lookup_by_name(conn, &name)?;
                domain.create()?;
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainActuatorError::Transient(e.to_string()))?
    }

    async fn shutdown(&self, domain_name: &str) -> Result<(), DomainActuatorError> {
        let this = self.clone();
        let name = domain_name.to_string();
        tokio::task::spawn_blocking(move || {
            this.run_blocking(move |conn| {
                let domain = Domain::lookup_by_name(conn, &name)?;
                domain.shutdown()?;
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainActuatorError::Transient(e.to_string()))?
    }

    async fn is_active(&self, domain_name: &str) -> Result<bool, DomainActuatorError> {
        let this = self.clone();
        let name = domain_name.to_string();
        tokio::task::spawn_blocking(move || {
            this.run_blocking(move |conn| {
                let domain = Domain::lookup_by_name(conn, &name)?;
                domain.is_active()
            })
        })
        .await
        .map_err(|e| DomainActuatorError::Transient(e.to_string()))?
    }

    async fn enumerate(&self) -> Result<Vec<(String, bool)>, DomainActuatorError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            this.run_blocking(|conn| {
                let domains = conn.list_all_domains(0)?;
                let mut out = Vec::with_capacity(domains.len());
                for domain in domains {
                    let name = domain.get_name()?;
                    let active = domain.is_active()?;
                    out.push((name, active));
                }
                Ok(out)
            })
        })
        .await
        .map_err(|e| DomainActuatorError::Transient(e.to_string()))?
    }
}
