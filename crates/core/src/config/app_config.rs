// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App-level TOML configuration, `~/.config/<app>/config.toml` (§6).

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ArgoError;

/// Recognised keys in the app config TOML (§6).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// e.g. `"apps"` or `"cluster <name>"`.
    pub default_view: Option<String>,
    /// Duration string, e.g. `"5s"`.
    pub request_timeout: Option<String>,
    pub theme: Option<String>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ArgoError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ArgoError::config(format!("reading {}: {e}", path.display())))?;
        toml::from_str(&raw).map_err(|e| ArgoError::config(format!("parsing {}: {e}", path.display())))
    }

    /// Load the config if it exists, defaulting otherwise — a missing
    /// app config is not an error (§6: keys are all optional).
    pub fn load_or_default(path: &Path) -> Result<Self, ArgoError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn request_timeout_duration(&self) -> Result<Option<Duration>, ArgoError> {
        self.request_timeout.as_deref().map(parse_duration_string).transpose()
    }
}

/// Parse a simple duration string (`"5s"`, `"500ms"`, `"2m"`, `"1h"`).
fn parse_duration_string(raw: &str) -> Result<Duration, ArgoError> {
    let raw = raw.trim();
    let (number_part, unit) = if let Some(n) = raw.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = raw.strip_suffix('m') {
        (n, "m")
    } else if let Some(n) = raw.strip_suffix('h') {
        (n, "h")
    } else {
        return Err(ArgoError::config(format!("invalid duration `{raw}` (expected e.g. 5s, 500ms, 2m, 1h)")));
    };

    let value: f64 = number_part
        .parse()
        .map_err(|_| ArgoError::config(format!("invalid duration `{raw}`")))?;

    let seconds = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => unreachable!(),
    };
    Ok(Duration::from_secs_f64(seconds))
}

#[cfg(test)]
#[path = "app_config_tests.rs"]
mod tests;
