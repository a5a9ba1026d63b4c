// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration: the app's own TOML settings plus the read-only ArgoCD
//! CLI config it resolves contexts from (§6).

pub mod app_config;
pub mod argocd_config;

pub use app_config::AppConfig;
pub use argocd_config::{ArgoCdConfig, TlsOverrides};

/// Default search path for the ArgoCD CLI config, honoring `ARGOCD_CONFIG`.
pub fn default_argocd_config_path() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("ARGOCD_CONFIG") {
        return std::path::PathBuf::from(path);
    }
    dirs::home_dir().unwrap_or_default().join(".config/argocd/config")
}

/// Default search path for the app's own TOML config, honoring
/// `ARGONAUT_CONFIG`.
pub fn default_app_config_path(app_name: &str) -> std::path::PathBuf {
    if let Ok(path) = std::env::var("ARGONAUT_CONFIG") {
        return std::path::PathBuf::from(path);
    }
    dirs::config_dir().unwrap_or_default().join(app_name).join("config.toml")
}
