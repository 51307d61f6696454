// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Digest engine — SHA-256 in software, or offloaded to the accelerator.
//
// Both paths write exactly 32 bytes and are interchangeable for the caller.
// Which one runs was decided when the context was built.

use sha2::{Digest as _, Sha256};
use tracing::{instrument, trace};

use sensorsign_core::error::{Result, SensorsignError};
use sensorsign_core::types::Digest;
use sensorsign_transport::frame::{self, FRAME_LEN, PAYLOAD_LEN};
use sensorsign_transport::Transport;

use crate::context::{CryptoContext, DigestBackend};

/// Compute the 256-bit digest of `input` with the context's backend.
///
/// The hardware path hashes only the first 32 bytes of `input`, because the
/// accelerator frame is fixed size. For a 32-byte sample both paths agree.
#[instrument(skip_all, fields(input_len = input.len(), mode = ?ctx.digest_mode()))]
pub fn digest(ctx: &mut CryptoContext, input: &[u8]) -> Result<Digest> {
    ctx.require_key("digest")?;
    match &mut ctx.backend {
        DigestBackend::Software => Ok(software_digest(input)),
        DigestBackend::Hardware(transport) => hardware_digest(transport.as_mut(), input),
    }
}

/// Plain SHA-256, no framing.
pub fn software_digest(input: &[u8]) -> Digest {
    Digest::from_bytes(Sha256::digest(input).into())
}

/// One full-duplex exchange with the accelerator.
pub(crate) fn hardware_digest(transport: &mut dyn Transport, input: &[u8]) -> Result<Digest> {
    if input.len() > PAYLOAD_LEN {
        trace!(
            dropped = input.len() - PAYLOAD_LEN,
            "input longer than accelerator payload"
        );
    }
    let request = frame::build_request(input);
    let mut response = [0u8; FRAME_LEN];
    transport
        .transfer(&request, &mut response)
        .map_err(|e| match e {
            SensorsignError::Transfer(_) => e,
            other => SensorsignError::Transfer(other.to_string()),
        })?;
    Ok(Digest::from_bytes(frame::extract_digest(&response)))
}

impl CryptoContext {
    /// See [`digest`].
    pub fn digest(&mut self, input: &[u8]) -> Result<Digest> {
        digest(self, input)
    }
}
