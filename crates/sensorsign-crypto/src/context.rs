// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crypto context — key material plus the digest backend, under one lifecycle.
//
//   initialize ──► set_key ──► digest / encrypt / decrypt ...  ──► terminate
//
// Every operation checks the lifecycle first: a context that was terminated,
// or never given a key, refuses with `NotInitialized` instead of producing
// output.

use std::fmt;

use tracing::{debug, info, instrument, warn};

use sensorsign_core::config::{DigestMode, TransportConfig};
use sensorsign_core::error::{Result, SensorsignError};
use sensorsign_core::types::SecretKey;
use sensorsign_transport::Transport;

use crate::library;

/// Digest path, fixed when the context is built.
pub enum DigestBackend {
    /// SHA-256 in process.
    Software,
    /// SHA-256 on the external accelerator, reached through this transport.
    Hardware(Box<dyn Transport>),
}

impl DigestBackend {
    pub fn mode(&self) -> DigestMode {
        match self {
            Self::Software => DigestMode::Software,
            Self::Hardware(_) => DigestMode::Hardware,
        }
    }
}

/// Stateful handle required by every cryptographic operation.
///
/// Owned by a single caller for the lifetime of one producer or consumer run.
pub struct CryptoContext {
    initialized: bool,
    secret_key: Option<SecretKey>,
    pub(crate) backend: DigestBackend,
}

impl CryptoContext {
    /// Build a context for `mode`, opening the transport when the digest is
    /// offloaded.
    ///
    /// Fails with `Init` when the process-wide self-tests fail or the
    /// transport cannot be opened or clocked.
    #[instrument(skip_all, fields(?mode))]
    pub fn initialize(mode: DigestMode, transport: &TransportConfig) -> Result<Self> {
        match mode {
            DigestMode::Software => Self::software(),
            DigestMode::Hardware => {
                let driver = sensorsign_transport::open(transport)
                    .map_err(|e| SensorsignError::Init(format!("opening transport: {e}")))?;
                Self::with_transport(driver, transport.frequency_hz)
            }
        }
    }

    /// Context that digests in software.
    pub fn software() -> Result<Self> {
        library::ensure_initialized()?;
        info!("crypto context initialised (software digest)");
        Ok(Self {
            initialized: true,
            secret_key: None,
            backend: DigestBackend::Software,
        })
    }

    /// Context that digests on the accelerator behind `transport`.
    ///
    /// This is the seam for board-specific bus drivers.
    pub fn with_transport(mut transport: Box<dyn Transport>, frequency_hz: u32) -> Result<Self> {
        library::ensure_initialized()?;
        if let Err(e) = transport.set_frequency(frequency_hz) {
            // Don't leak the device on the failure path.
            if let Err(close_err) = transport.close() {
                debug!(error = %close_err, "closing transport after failed clock setup");
            }
            return Err(SensorsignError::Init(format!(
                "setting {} clock to {frequency_hz} Hz: {e}",
                transport.name()
            )));
        }
        info!(
            transport = transport.name(),
            frequency_hz, "crypto context initialised (hardware digest)"
        );
        Ok(Self {
            initialized: true,
            secret_key: None,
            backend: DigestBackend::Hardware(transport),
        })
    }

    /// Install the 32-byte cipher key. Replaces any previous key.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        if !self.initialized {
            return Err(SensorsignError::NotInitialized("set_key"));
        }
        let key = SecretKey::from_slice(key)?;
        if self.secret_key.replace(key).is_some() {
            debug!("secret key replaced");
        } else {
            debug!("secret key set");
        }
        Ok(())
    }

    /// Release the transport and retire the context.
    ///
    /// Calling this twice is an error, not a no-op. The key is dropped
    /// unconditionally; if closing the transport fails the context stays
    /// initialised (but unkeyed) so `terminate` can be retried, and `Drop`
    /// still gets a chance to release it.
    pub fn terminate(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(SensorsignError::NotInitialized("terminate"));
        }
        self.secret_key = None;

        if let DigestBackend::Hardware(transport) = &mut self.backend {
            transport
                .close()
                .inspect_err(|e| warn!(error = %e, "transport close failed during terminate"))?;
        }
        self.initialized = false;
        info!("crypto context terminated");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn has_key(&self) -> bool {
        self.secret_key.is_some()
    }

    pub fn digest_mode(&self) -> DigestMode {
        self.backend.mode()
    }

    /// The key, provided the context is live and keyed.
    pub(crate) fn require_key(&self, op: &'static str) -> Result<&SecretKey> {
        match (&self.secret_key, self.initialized) {
            (Some(key), true) => Ok(key),
            _ => Err(SensorsignError::NotInitialized(op)),
        }
    }
}

impl fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoContext")
            .field("initialized", &self.initialized)
            .field("has_key", &self.secret_key.is_some())
            .field("digest", &self.backend.mode())
            .finish()
    }
}

impl Drop for CryptoContext {
    fn drop(&mut self) {
        if !self.initialized {
            return;
        }
        if let DigestBackend::Hardware(transport) = &mut self.backend {
            if let Err(e) = transport.close() {
                debug!(error = %e, "closing transport on drop");
            }
        }
    }
}
