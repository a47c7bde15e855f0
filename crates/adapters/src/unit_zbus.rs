// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real [`UnitActuator`], backed by a `zbus` connection to
//! `org.freedesktop.systemd1`.

use async_trait::async_trait;
use gs_core::ActiveState;
use tracing::{debug, warn};
use zbus::Connection;

use crate::unit::{UnitActuator, UnitActuatorError};
use crate::unit_proxy::{SystemdManagerProxy, SystemdUnitProxy};

const JOB_MODE: &str = "fail";

/// Drives the systemd1 bus API behind the [`UnitActuator`] façade.
pub struct ZbusUnitActuator {
    connection: Connection,
}

impl ZbusUnitActuator {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Connect to the system bus, the same one the daemon's event pump
    /// subscribes signals on.
    pub async fn connect_system() -> Result<Self, UnitActuatorError> {
        let connection = Connection::system()
            .await
            .map_err(|e| UnitActuatorError::Transient(e.to_string()))?;
        Ok(Self::new(connection))
    }

    async fn manager(&self) -> Result<SystemdManagerProxy<'_>, UnitActuatorError> {
        SystemdManagerProxy::new(&self.connection)
            .await
            .map_err(|e| UnitActuatorError::Transient(e.to_string()))
    }

    async fn unit_proxy(&self, unit_name: &str) -> Result<SystemdUnitProxy<'_>, UnitActuatorError> {
        let manager = self.manager().await?;
        let path = manager.get_unit(unit_name).await.map_err(map_manager_error(unit_name))?;
        SystemdUnitProxy::builder(&self.connection)
            .path(path)
            .map_err(|e| UnitActuatorError::Protocol(e.to_string()))?
            .build()
            .await
            .map_err(|e| UnitActuatorError::Transient(e.to_string()))
    }
}

fn map_manager_error(unit_name: &str) -> impl FnOnce(zbus::Error) -> UnitActuatorError + '_ {
    move |err: zbus::Error| {
        if let zbus::Error::MethodError(name, _, _) = &err {
            if name.as_str().ends_with(".NoSuchUnit") {
                return UnitActuatorError::NotFound(unit_name.to_string());
            }
            if name.as_str().ends_with(".AccessDenied") {
                return UnitActuatorError::PermissionDenied(unit_name.to_string());
            }
        }
        UnitActuatorError::Transient(err.to_string())
    }
}

#[async_trait]
impl UnitActuator for ZbusUnitActuator {
    async fn start(&self, unit_name: &str) -> Result<(), UnitActuatorError> {
        if matches!(self.active_state(unit_name).await, Ok(ActiveState::Active)) {
            debug!(unit_name, "start is a no-op, unit already active");
            return Ok(());
        }
        let manager = self.manager().await?;
        manager
            .start_unit(unit_name, JOB_MODE)
            .await
            .map_err(map_manager_error(unit_name))?;
        Ok(())
    }

    async fn stop(&self, unit_name: &str) -> Result<(), UnitActuatorError> {
        match self.active_state(unit_name).await {
            Ok(ActiveState::Inactive) => {
                debug!(unit_name, "stop is a no-op, unit already inactive");
                return Ok(());
            }
            Err(UnitActuatorError::NotFound(_)) => {
                debug!(unit_name, "stop is a no-op, unit was never instantiated");
                return Ok(());
            }
            _ => {}
        }
        let manager = self.manager().await?;
        manager
            .stop_unit(unit_name, JOB_MODE)
            .await
            .map_err(map_manager_error(unit_name))?;
        Ok(())
    }

    async fn restart(&self, unit_name: &str) -> Result<(), UnitActuatorError> {
        let manager = self.manager().await?;
        manager
            .restart_unit(unit_name, JOB_MODE)
            .await
            .map_err(map_manager_error(unit_name))?;
        Ok(())
    }

    async fn active_state(&self, unit_name: &str) -> Result<ActiveState, UnitActuatorError> {
        let unit = self.unit_proxy(unit_name).await?;
        let raw = unit.active_state().await.map_err(|e| UnitActuatorError::Transient(e.to_string()))?;
        ActiveState::parse(&raw).ok_or_else(|| UnitActuatorError::Protocol(raw))
    }

    async fn enumerate(&self, prefix: &str) -> Result<Vec<(String, ActiveState)>, UnitActuatorError> {
        let manager = self.manager().await?;
        let units = manager.list_units().await.map_err(|e| UnitActuatorError::Transient(e.to_string()))?;
        let template = format!("{prefix}@");
        let mut out = Vec::new();
        for (name, _, _, active_state, ..) in units {
            if !name.starts_with(&template) {
                continue;
            }
            match ActiveState::parse(&active_state) {
                Some(state) => out.push((name, state)),
                None => warn!(unit = %name, raw = %active_state, "unrecognized ActiveState, skipping"),
            }
        }
        Ok(out)
    }
}
