// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed façades over the two subsystems being reconciled: the host
//! service manager (`unit`) and the virtualization host (`domain`).

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

mod domain;
mod domain_virt;
mod unit;
mod unit_proxy;
mod unit_zbus;

#[cfg(any(test, feature = "test-support"))]
mod domain_fake;
#[cfg(any(test, feature = "test-support"))]
mod unit_fake;

pub use domain::{DomainActuator, DomainActuatorError};
pub use domain_virt::VirtDomainActuator;
pub use unit::{UnitActuator, UnitActuatorError};
pub use unit_zbus::ZbusUnitActuator;

#[cfg(any(test, feature = "test-support"))]
pub use domain_fake::{DomainCall, FakeDomainActuator};
#[cfg(any(test, feature = "test-support"))]
pub use unit_fake::{FakeUnitActuator, UnitCall};
