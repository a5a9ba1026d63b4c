// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn server(insecure: bool) -> Server {
    Server {
        base_url: "https://argocd.example.com".to_string(),
        auth_token: "token".to_string(),
        insecure,
        grpc_web: false,
        ca_cert_path: None,
        ca_path: None,
        client_cert_path: None,
        client_key_path: None,
        context_name: "default".to_string(),
        request_timeout: std::time::Duration::from_secs(10),
    }
}

#[test]
fn insecure_skips_verification_and_warns_once() {
    let trust = build_trust(&server(true)).expect("insecure config always builds");
    assert!(trust.insecure_warning.is_some());
}

#[test]
fn missing_cacert_file_fails_with_tls_config_failed_hint() {
    let mut s = server(false);
    s.ca_cert_path = Some("/nonexistent/ca.pem".to_string());
    let err = build_trust(&s).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Tls);
    assert!(err.user_action.unwrap().contains("--cacert"));
}

#[test]
fn missing_capath_dir_fails() {
    let mut s = server(false);
    s.ca_path = Some("/nonexistent/ca-dir".to_string());
    let err = build_trust(&s).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Tls);
}

#[test]
fn client_cert_without_key_is_rejected_before_io() {
    let mut s = server(false);
    s.client_cert_path = Some("/nonexistent/cert.pem".to_string());
    let err = build_trust(&s).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Tls);
    assert!(err.message.contains("together"));
}

#[test]
fn default_trust_with_no_explicit_ca_builds() {
    let trust = build_trust(&server(false)).expect("default roots path builds");
    assert!(trust.insecure_warning.is_none());
}
