// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for the accelerator link.
//
// The accelerator sits on a full-duplex serial bus: every byte clocked out is
// matched by a byte clocked in. Drivers only have to move bytes; framing lives
// in `crate::frame`.

use sensorsign_core::error::Result;

/// Full-duplex byte exchange with an external device.
///
/// Implementations are owned by exactly one crypto context and are never
/// shared between threads, but must be `Send` so a context can be moved.
pub trait Transport: Send {
    /// Human-readable driver name (e.g. "emulated", "/dev/spidev0.0").
    fn name(&self) -> &str;

    /// Set the bus clock. Called once, right after the transport is opened.
    fn set_frequency(&mut self, hz: u32) -> Result<()>;

    /// Clock out `tx` while clocking in the same number of bytes into `rx`.
    ///
    /// `tx.len()` must equal `rx.len()`; implementations reject mismatches
    /// with `SensorsignError::Transfer`.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()>;

    /// Release the underlying device. Further transfers fail.
    fn close(&mut self) -> Result<()>;
}
