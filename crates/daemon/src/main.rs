// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `guestsyncd`: the cross-subsystem reconciliation daemon.

mod config;
mod error;
mod event_loop;

use std::sync::Arc;

use config::DaemonConfig;
use error::DaemonError;
use gs_adapters::{VirtDomainActuator, ZbusUnitActuator};
use gs_engine::{AsyncDomainActuator, BootstrapReconciler, EventBridge};
use gs_store::{ActionLedger, DomainStateStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "fatal startup error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DaemonError> {
    let config = DaemonConfig::from_env();
    info!(?config, "starting guestsyncd");

    let virt_connect = virt::connect::Connect::open(None).map_err(|e| {
        DaemonError::VirtConnect(gs_adapters::DomainActuatorError::Transient(e.to_string()))
    })?;
    let bus = zbus::Connection::system()
        .await
        .map_err(|e| DaemonError::BusConnect(gs_adapters::UnitActuatorError::Transient(e.to_string())))?;

    let domain_actuator = Arc::new(VirtDomainActuator::new(virt_connect.clone()));
    let unit_actuator = Arc::new(ZbusUnitActuator::new(bus.clone()));

    let store = Arc::new(DomainStateStore::new());
    let ledger = Arc::new(ActionLedger::with_clock_and_window(
        gs_core::SystemClock,
        config.ledger_window,
    ));

    let async_domain_actuator = AsyncDomainActuator::spawn(
        domain_actuator.clone(),
        store.clone(),
        ledger.clone(),
        config.async_actuator_config(),
    );

    let bridge = Arc::new(EventBridge::with_coalesce_threshold(
        store.clone(),
        ledger.clone(),
        unit_actuator.clone(),
        async_domain_actuator,
        config.unit_prefix.clone(),
        config.unit_suffix.clone(),
        config.coalesce_threshold,
    ));

    let reconciler = BootstrapReconciler::new(
        store.clone(),
        domain_actuator.clone(),
        unit_actuator.clone(),
        config.unit_prefix.clone(),
        config.unit_suffix.clone(),
    );
    reconciler.run().await;
    info!("bootstrap reconciliation complete, entering steady state");

    event_loop::run(virt_connect, bus, config.unit_prefix.clone(), bridge).await?;

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, terminating");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
                unreachable!()
            }
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
