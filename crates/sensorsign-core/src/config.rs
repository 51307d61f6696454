// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SensorsignError};
use crate::types::{IV_LEN, Iv, KEY_LEN, SecretKey};

/// Key used by the reference runs. Not a secret in any meaningful sense.
pub const DEFAULT_KEY: &str = "abcdefghijklmnopqrstuvwxyz012345";
/// IV used by the reference runs.
pub const DEFAULT_IV: &str = "0123456789abcdef";
/// Clock the accelerator link is driven at.
pub const DEFAULT_FREQUENCY_HZ: u32 = 24_000_000;

/// Which digest path a context is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMode {
    /// SHA-256 computed in process.
    Software,
    /// SHA-256 offloaded to the external accelerator over the transport.
    Hardware,
}

/// How the accelerator transport is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// In-process model of the accelerator (development, CI).
    Emulated,
    /// A platform device node, e.g. `/dev/spidev0.0`.
    Device,
}

/// Transport settings, only consulted in [`DigestMode::Hardware`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub kind: TransportKind,
    /// Device path for [`TransportKind::Device`].
    pub device: String,
    pub frequency_hz: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Emulated,
            device: "/dev/spidev0.0".into(),
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }
}

/// Where samples come from when the producer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Random readings (no sensor attached).
    Random,
    /// Every reading is zero; reproducible output.
    Zero,
}

/// Persistent pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pre-shared AES-256 key, 32 ASCII bytes.
    pub key: String,
    /// Fixed CBC IV, 16 ASCII bytes, shared by producer and consumer.
    pub iv: String,
    pub digest: DigestMode,
    pub transport: TransportConfig,
    pub source: SourceKind,
    /// Records written per producer run.
    pub produce_cycles: usize,
    /// Records read per consumer run.
    pub consume_records: usize,
    pub record_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.into(),
            iv: DEFAULT_IV.into(),
            digest: DigestMode::Software,
            transport: TransportConfig::default(),
            source: SourceKind::Random,
            produce_cycles: 128,
            consume_records: 128,
            record_path: PathBuf::from("data.out"),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.len() != KEY_LEN {
            return Err(SensorsignError::Config(format!(
                "key must be {KEY_LEN} bytes, got {}",
                self.key.len()
            )));
        }
        if self.iv.len() != IV_LEN {
            return Err(SensorsignError::Config(format!(
                "iv must be {IV_LEN} bytes, got {}",
                self.iv.len()
            )));
        }
        if self.produce_cycles == 0 || self.consume_records == 0 {
            return Err(SensorsignError::Config(
                "record counts must be non-zero".into(),
            ));
        }
        if self.digest == DigestMode::Hardware && self.transport.frequency_hz == 0 {
            return Err(SensorsignError::Config(
                "transport frequency must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(self.key.as_bytes())
    }

    pub fn iv(&self) -> Result<Iv> {
        Iv::from_slice(self.iv.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().expect("default config");
        assert_eq!(config.secret_key().expect("key").expose(), DEFAULT_KEY.as_bytes());
        assert_eq!(config.iv().expect("iv").as_bytes(), DEFAULT_IV.as_bytes());
    }

    #[test]
    fn short_key_is_rejected() {
        let config = PipelineConfig {
            key: "too-short".into(),
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(SensorsignError::Config(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "digest": "hardware", "produce_cycles": 4 }"#).expect("parse");
        assert_eq!(config.digest, DigestMode::Hardware);
        assert_eq!(config.produce_cycles, 4);
        assert_eq!(config.consume_records, 128);
        assert_eq!(config.transport.kind, TransportKind::Emulated);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sensorsign.json");
        let config = PipelineConfig {
            source: SourceKind::Zero,
            consume_records: 7,
            ..PipelineConfig::default()
        };
        config.save(&path).expect("save");

        let loaded = PipelineConfig::load(&path).expect("load");
        assert_eq!(loaded.source, SourceKind::Zero);
        assert_eq!(loaded.consume_records, 7);
    }
}
