// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cipher engine — AES-256 in CBC mode, no padding.
//
// Each call builds a fresh cipher instance from the context key and the
// supplied IV, so no chaining state survives between calls. The instance is a
// plain value: it is dropped (and its key schedule zeroised) on every return
// path, success or failure.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use tracing::{debug, instrument};

use sensorsign_core::error::{Result, SensorsignError};
use sensorsign_core::types::{BLOCK_LEN, Ciphertext, Digest, Iv, SecretKey};

use crate::context::CryptoContext;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const ALGORITHM: &str = "aes-256-cbc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    fn op(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

/// Encrypt a block-aligned buffer. Output length equals input length.
#[instrument(skip_all, fields(len = input.len()))]
pub fn encrypt(ctx: &CryptoContext, input: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    transform(ctx, Direction::Encrypt, input, iv)
}

/// Decrypt a block-aligned buffer. Output length equals input length.
#[instrument(skip_all, fields(len = input.len()))]
pub fn decrypt(ctx: &CryptoContext, input: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    transform(ctx, Direction::Decrypt, input, iv)
}

fn transform(ctx: &CryptoContext, direction: Direction, input: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let key = ctx.require_key(direction.op())?;
    let iv = Iv::from_slice(iv)?;
    check_aligned(input)?;

    let mut buf = input.to_vec();
    match direction {
        Direction::Encrypt => {
            open_encryptor(key, &iv)?
                .encrypt_padded_mut::<NoPadding>(&mut buf, input.len())
                .map_err(|_| SensorsignError::cipher(ALGORITHM, "encrypt rejected buffer"))?;
        }
        Direction::Decrypt => {
            open_decryptor(key, &iv)?
                .decrypt_padded_mut::<NoPadding>(&mut buf)
                .map_err(|_| SensorsignError::cipher(ALGORITHM, "decrypt rejected buffer"))?;
        }
    }
    debug!(op = direction.op(), blocks = buf.len() / BLOCK_LEN, "cipher pass complete");
    Ok(buf)
}

fn check_aligned(input: &[u8]) -> Result<()> {
    if input.is_empty() || input.len() % BLOCK_LEN != 0 {
        return Err(SensorsignError::InvalidArgument(format!(
            "buffer length {} is not a non-zero multiple of {BLOCK_LEN}",
            input.len()
        )));
    }
    Ok(())
}

fn open_encryptor(key: &SecretKey, iv: &Iv) -> Result<Aes256CbcEnc> {
    Aes256CbcEnc::new_from_slices(key.expose(), iv.as_bytes())
        .map_err(|e| SensorsignError::cipher(ALGORITHM, format!("key setup: {e}")))
}

fn open_decryptor(key: &SecretKey, iv: &Iv) -> Result<Aes256CbcDec> {
    Aes256CbcDec::new_from_slices(key.expose(), iv.as_bytes())
        .map_err(|e| SensorsignError::cipher(ALGORITHM, format!("key setup: {e}")))
}

/// Seal a digest (exactly two blocks).
pub fn encrypt_digest(ctx: &CryptoContext, digest: &Digest, iv: &Iv) -> Result<Ciphertext> {
    let out = encrypt(ctx, digest.as_bytes(), iv.as_bytes())?;
    Ciphertext::from_slice(&out)
}

/// Recover a digest from its sealed form.
pub fn decrypt_ciphertext(ctx: &CryptoContext, ciphertext: &Ciphertext, iv: &Iv) -> Result<Digest> {
    let out = decrypt(ctx, ciphertext.as_bytes(), iv.as_bytes())?;
    Digest::from_slice(&out)
}

impl CryptoContext {
    /// See [`encrypt`].
    pub fn encrypt(&self, input: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        encrypt(self, input, iv)
    }

    /// See [`decrypt`].
    pub fn decrypt(&self, input: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        decrypt(self, input, iv)
    }
}
