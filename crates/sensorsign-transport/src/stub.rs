// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub device transport for builds without a bus driver.
//
// Every operation returns `PlatformUnavailable`. Boards with a real bus plug
// their driver in through `CryptoContext::with_transport`.

use sensorsign_core::error::{Result, SensorsignError};

use crate::traits::Transport;

/// Placeholder for a device node this build cannot drive.
#[derive(Debug)]
pub struct StubDevice {
    path: String,
}

impl StubDevice {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Transport for StubDevice {
    fn name(&self) -> &str {
        &self.path
    }

    fn set_frequency(&mut self, _hz: u32) -> Result<()> {
        tracing::warn!(device = %self.path, "Transport::set_frequency called on stub device");
        Err(SensorsignError::PlatformUnavailable)
    }

    fn transfer(&mut self, _tx: &[u8], _rx: &mut [u8]) -> Result<()> {
        tracing::warn!(device = %self.path, "Transport::transfer called on stub device");
        Err(SensorsignError::PlatformUnavailable)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
