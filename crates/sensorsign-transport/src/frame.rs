// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire framing for the SHA-256 accelerator.
//
// Layout (request and response are both FRAME_LEN bytes, exchanged in one
// full-duplex transfer):
//
//   request  [0, 32)   payload (the bytes to hash)
//   request  [32, 69)  padding; the accelerator ignores it
//   response [0, 37)   don't-care (payload shift-in plus pipeline latency)
//   response [37, 69)  SHA-256 of the payload
//
// These offsets are fixed by the accelerator bitstream. Nothing on the wire
// checksums them, so a mismatch silently yields the wrong digest.

use sensorsign_core::types::DIGEST_LEN;

/// Payload bytes carried per request.
pub const PAYLOAD_LEN: usize = 32;
/// Bytes of slack the accelerator needs between payload and digest.
pub const LATENCY_LEN: usize = 5;
/// Offset of the digest in the response frame.
pub const DIGEST_OFFSET: usize = PAYLOAD_LEN + LATENCY_LEN;
/// Total frame size in both directions.
pub const FRAME_LEN: usize = DIGEST_OFFSET + DIGEST_LEN;

const _: () = assert!(FRAME_LEN == 69);
const _: () = assert!(DIGEST_OFFSET == 37);

/// Build a request frame. Input beyond `PAYLOAD_LEN` is dropped; shorter
/// input is zero-filled.
pub fn build_request(input: &[u8]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    let n = input.len().min(PAYLOAD_LEN);
    frame[..n].copy_from_slice(&input[..n]);
    frame
}

/// Slice the digest out of a response frame.
pub fn extract_digest(response: &[u8; FRAME_LEN]) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&response[DIGEST_OFFSET..]);
    digest
}
