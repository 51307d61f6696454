// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide crypto setup — power-on self-tests, run once per process.
//
// Contexts come and go; the primitives underneath them are checked exactly
// once, the first time any context is initialised. The outcome is cached, so
// a failed self-test keeps failing every later initialise.

use std::sync::OnceLock;

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};
use tracing::{error, info};

use sensorsign_core::error::{Result, SensorsignError};

static SELF_TEST: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// SHA-256("abc"), FIPS 180-2 appendix B.1.
const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

/// CBC-AES256.Encrypt, NIST SP 800-38A F.2.5 (first two blocks).
const CBC_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
const CBC_IV: &str = "000102030405060708090a0b0c0d0e0f";
const CBC_PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51";
const CBC_CIPHERTEXT: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d";

/// Make sure the process-wide self-tests have run and passed.
pub fn ensure_initialized() -> Result<()> {
    SELF_TEST
        .get_or_init(|| {
            let outcome = run_self_tests();
            match &outcome {
                Ok(()) => info!("crypto self-tests passed"),
                Err(reason) => error!(%reason, "crypto self-tests failed"),
            }
            outcome
        })
        .clone()
        .map_err(SensorsignError::Init)
}

fn run_self_tests() -> std::result::Result<(), String> {
    if hex::encode(Sha256::digest(b"abc")) != SHA256_ABC {
        return Err("SHA-256 known-answer test mismatch".into());
    }

    let key = unhex(CBC_KEY)?;
    let iv = unhex(CBC_IV)?;
    let plaintext = unhex(CBC_PLAINTEXT)?;

    let mut buf = plaintext.clone();
    cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
        .map_err(|e| format!("AES-256-CBC key setup: {e}"))?
        .encrypt_padded_mut::<NoPadding>(&mut buf, plaintext.len())
        .map_err(|_| "AES-256-CBC encrypt rejected aligned input".to_string())?;
    if hex::encode(&buf) != CBC_CIPHERTEXT {
        return Err("AES-256-CBC encrypt known-answer test mismatch".into());
    }

    cbc::Decryptor::<Aes256>::new_from_slices(&key, &iv)
        .map_err(|e| format!("AES-256-CBC key setup: {e}"))?
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| "AES-256-CBC decrypt rejected aligned input".to_string())?;
    if buf != plaintext {
        return Err("AES-256-CBC decrypt known-answer test mismatch".into());
    }

    Ok(())
}

fn unhex(text: &str) -> std::result::Result<Vec<u8>, String> {
    hex::decode(text).map_err(|e| format!("bad test vector: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_tests_pass() {
        assert_eq!(run_self_tests(), Ok(()));
    }

    #[test]
    fn ensure_initialized_is_repeatable() {
        ensure_initialized().expect("first");
        ensure_initialized().expect("second");
    }
}
