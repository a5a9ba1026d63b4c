// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

const SAMPLE: &str = r#"
contexts:
  - name: prod
    server: https://argocd.prod.example.com
    user: prod-user
  - name: staging
    server: https://argocd.staging.example.com
    user: staging-user
servers:
  - server: https://argocd.prod.example.com
    insecure: false
    grpc-web: true
  - server: https://argocd.staging.example.com
    insecure: true
users:
  - name: prod-user
    auth-token: prod-token-abc
  - name: staging-user
    auth-token: staging-token-xyz
current-context: prod
"#;

fn write_sample() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, SAMPLE).unwrap();
    (dir, path)
}

#[test]
fn resolves_named_context_with_token_and_grpc_web() {
    let (_dir, path) = write_sample();
    let config = ArgoCdConfig::load(&path).unwrap();

    let ctx = config.resolve("prod", &TlsOverrides::default(), Duration::from_secs(5)).unwrap();
    assert_eq!(ctx.server.base_url, "https://argocd.prod.example.com");
    assert_eq!(ctx.server.auth_token, "prod-token-abc");
    assert!(ctx.server.grpc_web);
    assert!(!ctx.server.insecure);
}

#[test]
fn server_level_insecure_flag_is_honored() {
    let (_dir, path) = write_sample();
    let config = ArgoCdConfig::load(&path).unwrap();

    let ctx = config.resolve("staging", &TlsOverrides::default(), Duration::from_secs(5)).unwrap();
    assert!(ctx.server.insecure);
}

#[test]
fn cli_override_forces_insecure_even_when_server_entry_does_not() {
    let (_dir, path) = write_sample();
    let config = ArgoCdConfig::load(&path).unwrap();
    let overrides = TlsOverrides { insecure: true, ..Default::default() };

    let ctx = config.resolve("prod", &overrides, Duration::from_secs(5)).unwrap();
    assert!(ctx.server.insecure);
}

#[test]
fn unknown_context_name_is_a_config_error() {
    let (_dir, path) = write_sample();
    let config = ArgoCdConfig::load(&path).unwrap();

    let result = config.resolve("does-not-exist", &TlsOverrides::default(), Duration::from_secs(5));
    assert!(result.is_err());
}

#[test]
fn current_context_and_names_are_exposed() {
    let (_dir, path) = write_sample();
    let config = ArgoCdConfig::load(&path).unwrap();

    assert_eq!(config.current_context_name(), Some("prod"));
    assert_eq!(config.context_names(), vec!["prod", "staging"]);
}
