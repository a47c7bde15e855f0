// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gs-actuate`: the one-shot synchronous actuator program (§6). Drives
//! a single domain to `start` or `stop` and blocks until convergence or
//! timeout, using the same algorithm the daemon's worker pool uses.

mod exit_error;

use std::time::Duration;

use clap::Parser;
use exit_error::ExitError;
use gs_adapters::VirtDomainActuator;
use gs_core::ActionOp;
use gs_engine::SyncActuatorConfig;
use gs_store::DomainStateStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gs-actuate", about = "Drive a single libvirt domain to a target power state")]
struct Cli {
    /// Action to perform against the domain.
    action: Action,

    /// Name of the domain to act on.
    domain_name: String,

    /// How long to wait for convergence before failing.
    #[arg(long, env = "WAIT_ACTION_SECONDS", default_value_t = 120)]
    timeout: u64,

    /// Polling cadence while waiting for convergence.
    #[arg(long, env = "WAIT_CHECK_DELAY", default_value_t = 1)]
    delay: u64,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Action {
    Start,
    Stop,
}

impl From<Action> for ActionOp {
    fn from(action: Action) -> Self {
        match action {
            Action::Start => ActionOp::Start,
            Action::Stop => ActionOp::Stop,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(e.code);
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let op: ActionOp = cli.action.into();

    let domain_actuator = VirtDomainActuator::connect_default().map_err(|e| {
        ExitError::new(1, format!("{op} {}: cannot open virtualization connection: {e}", cli.domain_name))
    })?;
    let store = DomainStateStore::new();
    let config = SyncActuatorConfig {
        check_delay: Duration::from_secs(cli.delay),
        timeout: Duration::from_secs(cli.timeout),
    };

    gs_engine::converge(&domain_actuator, &store, op, &cli.domain_name, &config).await.map_err(
        |e| ExitError::new(1, format!("{op} {}: {e}", cli.domain_name)),
    )?;

    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
