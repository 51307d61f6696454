// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file resolution.

use std::path::{Path, PathBuf};

use sensorsign_core::PipelineConfig;
use sensorsign_core::error::Result;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

/// Conventional per-user config location: `$XDG_CONFIG_HOME/sensorsign/config.json`,
/// falling back to `~/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("sensorsign").join(CONFIG_FILE))
}

/// Load the config named on the command line, else the per-user file if one
/// exists, else the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading config");
        return PipelineConfig::load(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            info!(path = %path.display(), "loading config");
            PipelineConfig::load(path)
        }
        _ => {
            debug!("no config file, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}
