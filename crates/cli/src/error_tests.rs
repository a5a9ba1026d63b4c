// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use argonaut_core::ArgoError;

use super::*;

#[test]
fn auth_error_shows_login_hint() {
    let err = ArgoError::auth("token expired");
    let view = view_for_error(&err, "https://argocd.example.com", "~/.config/argonaut/config.toml");
    assert_eq!(view.title, "Authentication Required");
    assert_eq!(view.hints, vec!["argocd login https://argocd.example.com".to_string()]);
}

#[test]
fn network_error_includes_context_tip() {
    let err = ArgoError::network("connection refused");
    let view = view_for_error(&err, "https://argocd.example.com", "cfg");
    assert!(view.hints.iter().any(|h| h.contains("correct Argo CD context")));
}

#[test]
fn timeout_error_names_the_config_path() {
    let err = ArgoError::timeout("5s");
    let view = view_for_error(&err, "server", "~/.config/argonaut/config.toml");
    assert_eq!(view.message, "Request timed out after 5s");
    assert!(view.hints[0].contains("~/.config/argonaut/config.toml"));
}

#[test]
fn tls_error_mentions_cacert_and_capath() {
    let err = ArgoError::tls("certificate verify failed");
    let view = view_for_error(&err, "server", "cfg");
    assert!(view.hints.iter().any(|h| h.contains("--cacert")));
    assert!(view.hints.iter().any(|h| h.contains("--capath")));
}

#[test]
fn http_error_surfaces_server_message() {
    let err = ArgoError::http(404, "application not found");
    let view = view_for_error(&err, "server", "cfg");
    assert!(view.message.contains("application not found"));
}
