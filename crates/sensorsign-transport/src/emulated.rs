// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process model of the SHA-256 accelerator.
//
// Answers every full frame exactly the way the FPGA does, which lets the
// hardware digest path run on machines with nothing on the bus.

use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use sensorsign_core::error::{Result, SensorsignError};

use crate::frame::{DIGEST_OFFSET, FRAME_LEN, PAYLOAD_LEN};
use crate::traits::Transport;

/// Emulated accelerator endpoint.
#[derive(Debug, Default)]
pub struct EmulatedAccelerator {
    frequency_hz: Option<u32>,
    closed: bool,
    transfers: u64,
}

impl EmulatedAccelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock most recently requested via `set_frequency`.
    pub fn frequency_hz(&self) -> Option<u32> {
        self.frequency_hz
    }

    /// Number of completed transfers.
    pub fn transfers(&self) -> u64 {
        self.transfers
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for EmulatedAccelerator {
    fn name(&self) -> &str {
        "emulated"
    }

    fn set_frequency(&mut self, hz: u32) -> Result<()> {
        if self.closed {
            return Err(SensorsignError::Transfer("emulated transport is closed".into()));
        }
        if hz == 0 {
            return Err(SensorsignError::Transfer("bus frequency must be non-zero".into()));
        }
        debug!(hz, "emulated accelerator clock set");
        self.frequency_hz = Some(hz);
        Ok(())
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        if self.closed {
            return Err(SensorsignError::Transfer("emulated transport is closed".into()));
        }
        if tx.len() != rx.len() {
            return Err(SensorsignError::Transfer(format!(
                "duplex length mismatch: tx {} bytes, rx {} bytes",
                tx.len(),
                rx.len()
            )));
        }

        rx.fill(0);
        // Anything other than a whole frame leaves the accelerator idle.
        if tx.len() == FRAME_LEN {
            let digest = Sha256::digest(&tx[..PAYLOAD_LEN]);
            rx[DIGEST_OFFSET..].copy_from_slice(&digest);
        }

        self.transfers += 1;
        trace!(len = tx.len(), transfers = self.transfers, "emulated transfer");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(SensorsignError::Transfer("emulated transport already closed".into()));
        }
        self.closed = true;
        debug!(transfers = self.transfers, "emulated accelerator closed");
        Ok(())
    }
}
