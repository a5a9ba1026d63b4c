// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps a server-facing [`ArgoError`] to the view the user should see
//! (§7 "C9 maps error kinds to user-visible views").

use argonaut_core::{ArgoError, ErrorKind};

/// A user-visible rendering of an [`ArgoError`]: the view name, its
/// message, and zero or more actionable hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub title: &'static str,
    pub message: String,
    pub hints: Vec<String>,
}

/// Translate an error into the view C9 should render (§7).
pub fn view_for_error(err: &ArgoError, server: &str, config_path: &str) -> ErrorView {
    match err.kind {
        ErrorKind::Auth => ErrorView {
            title: "Authentication Required",
            message: err.message.clone(),
            hints: vec![format!("argocd login {server}")],
        },
        ErrorKind::Network => ErrorView {
            title: "Connection Error",
            message: err.message.clone(),
            hints: vec![
                "Tip: Ensure you are using the correct Argo CD context".to_string(),
                format!("argocd login {server}"),
            ],
        },
        ErrorKind::Timeout => ErrorView {
            title: "Connection Error",
            message: format!("Request timed out after {}", err.message),
            hints: vec![format!("increase timeout in {config_path}")],
        },
        ErrorKind::Tls => ErrorView {
            title: "Connection Error",
            message: "TLS configuration failed".to_string(),
            hints: vec![
                "pass --cacert to trust a custom CA certificate".to_string(),
                "pass --capath to trust a directory of CA certificates".to_string(),
            ],
        },
        ErrorKind::Http(code) => ErrorView {
            title: "Operation Failed",
            message: format!("HTTP {code}: {}", err.message),
            hints: Vec::new(),
        },
        ErrorKind::Permission => {
            ErrorView { title: "Operation Restricted", message: err.message.clone(), hints: Vec::new() }
        }
        ErrorKind::Unavailable => {
            ErrorView { title: "Degraded", message: err.message.clone(), hints: Vec::new() }
        }
        ErrorKind::Validation | ErrorKind::Config | ErrorKind::Parse | ErrorKind::Internal => {
            ErrorView { title: "Error", message: err.message.clone(), hints: Vec::new() }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
