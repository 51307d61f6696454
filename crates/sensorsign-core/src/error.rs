// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for sensorsign.

use thiserror::Error;

/// Top-level error type for all sensorsign operations.
#[derive(Debug, Error)]
pub enum SensorsignError {
    // -- Context lifecycle --
    #[error("initialisation failed: {0}")]
    Init(String),

    #[error("{0}: context is not initialised")]
    NotInitialized(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Crypto primitives --
    #[error("cipher failure: {origin}: {reason}")]
    Cipher { origin: String, reason: String },

    #[error("transport transfer failed: {0}")]
    Transfer(String),

    // -- Acquisition --
    #[error("sample acquisition failed: {0}")]
    Acquisition(String),

    // -- Records / persistence --
    #[error("malformed record #{record}: {reason}")]
    RecordFormat { record: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform --
    #[error("transport driver not available on this platform")]
    PlatformUnavailable,
}

impl SensorsignError {
    /// Build a `Cipher` error from the failing component and its message.
    pub fn cipher(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Cipher {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SensorsignError>;
