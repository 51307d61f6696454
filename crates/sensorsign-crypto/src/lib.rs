// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! sensorsign-crypto — the cryptographic core of the signing pipeline.
//!
//! A [`CryptoContext`] owns the key and the digest backend. Digests are
//! SHA-256, either computed in process or offloaded to the external
//! accelerator; sealing is AES-256-CBC with a caller-supplied IV and no
//! padding.

pub mod cipher;
pub mod context;
pub mod digest;
pub mod library;

// PUBLIC API: Re-export the context and the fixed-size helpers
pub use cipher::{decrypt_ciphertext, encrypt_digest};
pub use context::{CryptoContext, DigestBackend};
pub use digest::software_digest;
