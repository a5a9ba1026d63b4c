// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface (§6): flags, their environment-variable aliases, and
//! post-parse validation of the TLS override combination.

use std::path::PathBuf;

use clap::Parser;

/// Interactive terminal client for an ArgoCD deployment.
#[derive(Debug, Parser)]
#[command(name = "argonaut", version, about)]
pub struct Config {
    /// Path to the ArgoCD CLI config file (contexts/servers/users).
    #[arg(long, env = "ARGOCD_CONFIG")]
    pub argocd_config: Option<PathBuf>,

    /// Path to this app's own config file (theme, default view, timeout).
    #[arg(long, env = "ARGONAUT_CONFIG")]
    pub app_config: Option<PathBuf>,

    /// CA certificate file for server TLS verification.
    #[arg(long, env = "ARGOCD_CACERT")]
    pub cacert: Option<PathBuf>,

    /// Directory of CA certificates for server TLS verification.
    #[arg(long, env = "ARGOCD_CAPATH")]
    pub capath: Option<PathBuf>,

    /// Client certificate for mutual TLS.
    #[arg(long, env = "ARGOCD_CLIENT_CERT")]
    pub client_cert: Option<PathBuf>,

    /// Client certificate private key for mutual TLS.
    #[arg(long, env = "ARGOCD_CLIENT_CERT_KEY")]
    pub client_cert_key: Option<PathBuf>,

    /// Context name to activate on startup; defaults to the ArgoCD
    /// config's `current-context`.
    #[arg(long)]
    pub context: Option<String>,

    /// External K8s resource viewer command, e.g. `k9s`.
    #[arg(long, env = "ARGONAUT_K9S_COMMAND", default_value = "k9s")]
    pub k9s_command: String,

    /// External diff pager/formatter command.
    #[arg(long, env = "ARGONAUT_DIFF_FORMATTER", default_value = "less")]
    pub diff_formatter: String,
}

impl Config {
    /// §6: a client cert requires its key and vice versa; `--cacert`
    /// and `--capath` are independent and may combine freely.
    pub fn validate(&self) -> anyhow::Result<()> {
        match (&self.client_cert, &self.client_cert_key) {
            (Some(_), None) => anyhow::bail!("--client-cert requires --client-cert-key"),
            (None, Some(_)) => anyhow::bail!("--client-cert-key requires --client-cert"),
            _ => {}
        }
        Ok(())
    }

    /// TLS overrides carried from the CLI into [`argonaut_core::config::ArgoCdConfig::resolve`].
    pub fn tls_overrides(&self) -> argonaut_core::config::TlsOverrides {
        argonaut_core::config::TlsOverrides {
            ca_cert_path: self.cacert.as_ref().map(|p| p.display().to_string()),
            ca_path: self.capath.as_ref().map(|p| p.display().to_string()),
            client_cert_path: self.client_cert.as_ref().map(|p| p.display().to_string()),
            client_key_path: self.client_cert_key.as_ref().map(|p| p.display().to_string()),
            insecure: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
