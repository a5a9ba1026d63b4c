// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use super::*;

fn base() -> Config {
    Config {
        argocd_config: None,
        app_config: None,
        cacert: None,
        capath: None,
        client_cert: None,
        client_cert_key: None,
        context: None,
        k9s_command: "k9s".to_string(),
        diff_formatter: "less".to_string(),
    }
}

#[test]
fn validate_accepts_no_tls_overrides() {
    assert!(base().validate().is_ok());
}

#[test]
fn validate_rejects_client_cert_without_key() {
    let mut cfg = base();
    cfg.client_cert = Some(PathBuf::from("/tmp/client.crt"));
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_client_cert_key_without_cert() {
    let mut cfg = base();
    cfg.client_cert_key = Some(PathBuf::from("/tmp/client.key"));
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_accepts_matched_client_cert_pair() {
    let mut cfg = base();
    cfg.client_cert = Some(PathBuf::from("/tmp/client.crt"));
    cfg.client_cert_key = Some(PathBuf::from("/tmp/client.key"));
    assert!(cfg.validate().is_ok());
}

#[test]
fn tls_overrides_carries_paths_through() {
    let mut cfg = base();
    cfg.cacert = Some(PathBuf::from("/tmp/ca.pem"));
    let overrides = cfg.tls_overrides();
    assert_eq!(overrides.ca_cert_path.as_deref(), Some("/tmp/ca.pem"));
    assert!(!overrides.insecure);
}
