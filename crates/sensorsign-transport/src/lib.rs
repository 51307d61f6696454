// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! sensorsign-transport — the link to the external SHA-256 accelerator.
//!
//! Defines the duplex [`Transport`] trait, the bit-exact request/response
//! framing the accelerator expects, an in-process emulation of the
//! accelerator, and the dispatcher that turns a [`TransportConfig`] into a
//! driver.

pub mod emulated;
pub mod frame;
pub mod stub;
pub mod traits;

pub use emulated::EmulatedAccelerator;
pub use traits::Transport;

use sensorsign_core::config::{TransportConfig, TransportKind};
use sensorsign_core::error::Result;

/// Open the transport described by `config`.
///
/// RETURNS: a boxed driver. The caller sets the bus clock and owns the
/// driver until it calls [`Transport::close`].
pub fn open(config: &TransportConfig) -> Result<Box<dyn Transport>> {
    match config.kind {
        TransportKind::Emulated => {
            tracing::info!("opening emulated accelerator");
            Ok(Box::new(EmulatedAccelerator::new()))
        }
        TransportKind::Device => {
            // No bus driver is compiled in; the stub refuses to clock bytes.
            tracing::info!(device = %config.device, "opening device transport");
            Ok(Box::new(stub::StubDevice::new(config.device.clone())))
        }
    }
}
