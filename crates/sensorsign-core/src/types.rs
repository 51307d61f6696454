// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-size domain types for the measurement-signing pipeline.
//
// Every buffer that crosses a crate boundary has its length fixed in the type,
// so the 32-byte and 16-byte contracts are checked once at construction and
// never again.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, SensorsignError};

/// Number of 16-bit words acquired per sample.
pub const SAMPLE_WORDS: usize = 8;
/// Length of a rendered sample (4 hex characters per word).
pub const SAMPLE_LEN: usize = SAMPLE_WORDS * 4;
/// SHA-256 output length.
pub const DIGEST_LEN: usize = 32;
/// AES-256 key length.
pub const KEY_LEN: usize = 32;
/// AES block length, which is also the CBC IV length.
pub const BLOCK_LEN: usize = 16;
/// CBC initialisation vector length.
pub const IV_LEN: usize = BLOCK_LEN;
/// A sealed digest is exactly two cipher blocks.
pub const CIPHERTEXT_LEN: usize = DIGEST_LEN;

fn exact<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        SensorsignError::InvalidArgument(format!(
            "{what} must be {N} bytes, got {}",
            bytes.len()
        ))
    })
}

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One acquisition: eight 16-bit readings rendered as 32 lowercase hex
/// characters, no separators.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sample([u8; SAMPLE_LEN]);

impl Sample {
    /// Render eight raw readings as `%04x` groups.
    pub fn from_words(words: &[u16; SAMPLE_WORDS]) -> Self {
        let mut out = [0u8; SAMPLE_LEN];
        for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(hex::encode(word.to_be_bytes()).as_bytes());
        }
        Self(out)
    }

    /// Accept an already-rendered sample. Must be exactly 32 ASCII hex digits.
    pub fn from_ascii(text: &[u8]) -> Result<Self> {
        let bytes: [u8; SAMPLE_LEN] = exact(text, "sample")?;
        if let Some(bad) = bytes.iter().find(|b| !b.is_ascii_hexdigit()) {
            return Err(SensorsignError::InvalidArgument(format!(
                "sample contains non-hex byte 0x{bad:02x}"
            )));
        }
        Ok(Self(bytes))
    }

    /// The raw ASCII bytes, which are what gets digested.
    pub fn as_bytes(&self) -> &[u8; SAMPLE_LEN] {
        &self.0
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|&b| write!(f, "{}", b as char))
    }
}

impl fmt::Debug for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample({self})")
    }
}

// ---------------------------------------------------------------------------
// Digest / Ciphertext
// ---------------------------------------------------------------------------

macro_rules! hex_block {
    ($(#[$meta:meta])* $name:ident, $len:expr, $what:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                exact(bytes, $what).map(Self)
            }

            /// Decode from lowercase or uppercase hex, no separators.
            pub fn from_hex(text: &str) -> Result<Self> {
                let mut out = [0u8; $len];
                hex::decode_to_slice(text, &mut out).map_err(|e| {
                    SensorsignError::InvalidArgument(format!(concat!($what, " hex: {}"), e))
                })?;
                Ok(Self(out))
            }

            /// Lowercase hex rendering as stored on disk.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }
    };
}

hex_block!(
    /// A 256-bit digest of a sample.
    Digest,
    DIGEST_LEN,
    "digest"
);

hex_block!(
    /// A digest sealed with AES-256-CBC.
    Ciphertext,
    CIPHERTEXT_LEN,
    "ciphertext"
);

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Raw 32-byte AES-256 key. Wiped from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Copy the raw key bytes. No stretching: these bytes are the cipher key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        exact(bytes, "key").map(Self)
    }

    pub fn expose(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// CBC initialisation vector.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Iv([u8; IV_LEN]);

impl Iv {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        exact(bytes, "IV").map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One persisted measurement: the sample, its digest, and the sealed digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub sample: Sample,
    pub digest: Digest,
    pub ciphertext: Ciphertext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_renders_words_as_hex_groups() {
        let sample = Sample::from_words(&[0x0000, 0x0001, 0x00ff, 0x1234, 0xabcd, 0xffff, 0x03ff, 0x8000]);
        assert_eq!(sample.to_string(), "0000000100ff1234abcdffff03ff8000");
        assert_eq!(sample.as_bytes().len(), SAMPLE_LEN);
    }

    #[test]
    fn sample_groups_match_zero_padded_format() {
        for w in [0u16, 1, 0x0f0f, 0xabcd, 0xffff] {
            let sample = Sample::from_words(&[w; SAMPLE_WORDS]);
            assert_eq!(sample.to_string(), format!("{w:04x}").repeat(SAMPLE_WORDS));
        }
    }

    #[test]
    fn sample_rejects_wrong_length_and_non_hex() {
        assert!(Sample::from_ascii(b"0000").is_err());
        assert!(Sample::from_ascii(b"0000000000000000000000000000000g").is_err());
        assert!(Sample::from_ascii(b"00000000000000000000000000000000").is_ok());
    }

    #[test]
    fn digest_hex_is_lowercase() {
        let digest = Digest::from_bytes([0xAB; DIGEST_LEN]);
        assert_eq!(digest.to_hex(), "ab".repeat(DIGEST_LEN));
        assert_eq!(Digest::from_hex(&"AB".repeat(DIGEST_LEN)).expect("upper hex"), digest);
    }

    #[test]
    fn digest_hex_rejects_short_input() {
        let err = Digest::from_hex("abcd").expect_err("short hex");
        assert!(matches!(err, SensorsignError::InvalidArgument(_)));
    }

    #[test]
    fn key_and_iv_lengths_are_enforced() {
        assert!(SecretKey::from_slice(&[0u8; 31]).is_err());
        assert!(SecretKey::from_slice(b"abcdefghijklmnopqrstuvwxyz012345").is_ok());
        assert!(Iv::from_slice(b"0123456789abcdef").is_ok());
        assert!(Iv::from_slice(b"0123456789abcde").is_err());
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = SecretKey::from_slice(b"abcdefghijklmnopqrstuvwxyz012345").expect("key");
        assert_eq!(format!("{key:?}"), "SecretKey(<redacted>)");
    }
}
