// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use argonaut_core::Server;

use super::*;

fn context(name: &str) -> Context {
    Context {
        name: name.to_string(),
        server: Server {
            base_url: "https://argocd.example.com".to_string(),
            auth_token: "token".to_string(),
            insecure: false,
            grpc_web: false,
            ca_cert_path: None,
            ca_path: None,
            client_cert_path: None,
            client_key_path: None,
            context_name: name.to_string(),
            request_timeout: Duration::from_secs(10),
        },
    }
}

#[test]
fn switch_context_bumps_generation_and_replaces_current() {
    let mut state = ServerState::default();
    assert_eq!(state.generation(), 0);

    let gen1 = state.switch_context(context("prod"));
    assert_eq!(gen1, 1);
    assert_eq!(state.current_context_name(), Some("prod"));

    let gen2 = state.switch_context(context("staging"));
    assert_eq!(gen2, 2);
    assert_eq!(state.current_context_name(), Some("staging"));
}

#[test]
fn accepts_only_current_generation() {
    let mut state = ServerState::default();
    state.switch_context(context("prod"));
    assert!(state.accepts(1));
    assert!(!state.accepts(0));

    state.bump_generation();
    assert!(!state.accepts(1));
    assert!(state.accepts(2));
}

#[test]
fn bump_generation_does_not_touch_current_context() {
    let mut state = ServerState::default();
    state.switch_context(context("prod"));
    state.bump_generation();
    assert_eq!(state.current_context_name(), Some("prod"));
}
