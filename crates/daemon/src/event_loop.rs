// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event-loop host (§4.8): runs the libvirt event pump on a dedicated
//! background thread and the systemd1 `PropertiesChanged` signal stream
//! as a tokio task, translating both into calls on the shared
//! [`EventBridge`].

use std::sync::Arc;

use gs_adapters::DomainActuatorError;
use gs_engine::{DomainLifecycleEvent, EventBridge};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use virt::connect::Connect;
use zbus::Connection;

use crate::error::DaemonError;

enum DomainRawEvent {
    Lifecycle { domain_name: String, event: DomainLifecycleEvent },
}

/// Registers the libvirt event callbacks, starts the dedicated pump
/// thread, and starts the unit-side signal stream. Returns once both
/// loops are running; they are daemonic and terminate with the process.
pub async fn run(
    connect: Connect,
    bus: Connection,
    unit_prefix: String,
    bridge: Arc<EventBridge>,
) -> Result<(), DaemonError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DomainRawEvent>();

    register_domain_callbacks(&connect, tx)?;
    spawn_virt_event_pump()?;

    let bridge_for_domain_events = bridge.clone();
    tokio::spawn(async move {
        while let Some(raw) = rx.recv().await {
            match raw {
                DomainRawEvent::Lifecycle { domain_name, event } => {
                    bridge_for_domain_events.on_domain_lifecycle(&domain_name, event).await;
                }
            }
        }
    });

    tokio::spawn(run_unit_signal_loop(bus, unit_prefix, bridge));

    Ok(())
}

/// Start the libvirt default event implementation on its own thread, the
/// way the source's `libvirt_eventloop_start` worker does: register once,
/// then run the dispatcher forever. Failing to spawn the thread is a fatal
/// startup error — without it no domain event ever reaches the bridge.
fn spawn_virt_event_pump() -> Result<(), DaemonError> {
    std::thread::Builder::new()
        .name("virt-event-pump".to_string())
        .spawn(|| {
            if let Err(e) = Connect::event_register_default_impl() {
                error!(error = %e, "failed to register libvirt default event implementation");
                return;
            }
            loop {
                if let Err(e) = Connect::event_run_default_impl() {
                    warn!(error = %e, "libvirt event pump iteration failed, retrying");
                }
            }
        })
        .map(|_handle| ())
        .map_err(|e| DaemonError::VirtConnect(DomainActuatorError::Transient(e.to_string())))
}

fn register_domain_callbacks(
    connect: &Connect,
    tx: mpsc::UnboundedSender<DomainRawEvent>,
) -> Result<(), DaemonError> {
    const VIR_DOMAIN_EVENT_ID_LIFECYCLE: i32 = 0;
    const VIR_DOMAIN_EVENT_ID_REBOOT: i32 = 2;
    const VIR_DOMAIN_EVENT_STARTED: i32 = 1;
    const VIR_DOMAIN_EVENT_STOPPED: i32 = 2;

    let lifecycle_tx = tx.clone();
    connect
        .domain_event_register_any(
            None,
            VIR_DOMAIN_EVENT_ID_LIFECYCLE,
            Box::new(move |_conn, domain, event, _detail| {
                let Ok(domain_name) = domain.get_name() else {
                    return;
                };
                let translated = match event {
                    VIR_DOMAIN_EVENT_STARTED => Some(DomainLifecycleEvent::Started),
                    VIR_DOMAIN_EVENT_STOPPED => Some(DomainLifecycleEvent::Stopped),
                    _ => None,
                };
                if let Some(event) = translated {
                    let _ = lifecycle_tx.send(DomainRawEvent::Lifecycle { domain_name, event });
                }
            }),
        )
        .map_err(|e| DaemonError::VirtConnect(DomainActuatorError::Transient(e.to_string())))?;

    let reboot_tx = tx;
    connect
        .domain_event_register_any(
            None,
            VIR_DOMAIN_EVENT_ID_REBOOT,
            Box::new(move |_conn, domain, _event, _detail| {
                if let Ok(domain_name) = domain.get_name() {
                    let _ = reboot_tx.send(DomainRawEvent::Lifecycle {
                        domain_name,
                        event: DomainLifecycleEvent::Reboot,
                    });
                }
            }),
        )
        .map_err(|e| DaemonError::VirtConnect(DomainActuatorError::Transient(e.to_string())))?;

    Ok(())
}

/// Subscribe to `PropertiesChanged` on the properties interface and feed
/// every signal into the bridge; path filtering happens in the bridge
/// itself (§6).
async fn run_unit_signal_loop(bus: Connection, _unit_prefix: String, bridge: Arc<EventBridge>) {
    let proxy = match zbus::fdo::PropertiesProxy::builder(&bus).destination("org.freedesktop.systemd1") {
        Ok(builder) => builder,
        Err(e) => {
            error!(error = %e, "failed to build systemd1 properties proxy, signal loop not started");
            return;
        }
    };
    let proxy = match proxy.build().await {
        Ok(proxy) => proxy,
        Err(e) => {
            error!(error = %e, "failed to connect systemd1 properties proxy, signal loop not started");
            return;
        }
    };

    let mut changes = match proxy.receive_properties_changed().await {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "failed to subscribe to PropertiesChanged, signal loop not started");
            return;
        }
    };

    info!("unit PropertiesChanged signal loop started");
    use futures_util::StreamExt;
    while let Some(signal) = changes.next().await {
        let args = match signal.args() {
            Ok(args) => args,
            Err(e) => {
                warn!(error = %e, "failed to decode PropertiesChanged signal body");
                continue;
            }
        };
        let Some(path) = signal.message().header().path().map(|p| p.to_string()) else {
            continue;
        };
        // The object path's last segment is the unit name escaped with the
        // same hex-pair convention our codec uses for unit-name instances,
        // so unescaping it recovers the literal `prefix@instance.suffix`.
        let Some(escaped) = path.rsplit('/').next() else {
            continue;
        };
        let unit_name = match gs_core::codec::unescape(escaped) {
            Ok(name) => name,
            Err(e) => {
                warn!(path, error = %e, "failed to unescape unit object path");
                continue;
            }
        };
        let changed: std::collections::HashMap<String, String> = args
            .changed_properties()
            .iter()
            .filter_map(|(name, value)| {
                value.downcast_ref::<&str>().ok().map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        bridge.on_unit_properties_changed(args.interface_name().as_str(), &changed, &unit_name).await;
    }
}
