// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn auth_and_config_are_never_retryable() {
    assert!(!ErrorKind::Auth.is_retryable_category());
    assert!(!ErrorKind::Permission.is_retryable_category());
    assert!(!ErrorKind::Config.is_retryable_category());
    assert!(!ErrorKind::Validation.is_retryable_category());
}

#[test]
fn network_timeout_http_unavailable_are_retryable() {
    assert!(ErrorKind::Network.is_retryable_category());
    assert!(ErrorKind::Timeout.is_retryable_category());
    assert!(ErrorKind::Http(503).is_retryable_category());
    assert!(ErrorKind::Unavailable.is_retryable_category());
}

#[test]
fn display_includes_context() {
    let err = ArgoError::new(ErrorKind::Http(404), "not found")
        .with_context(ErrorContext::new("GetApplication").with_app("demo"));
    let rendered = err.to_string();
    assert!(rendered.contains("HTTP_404"));
    assert!(rendered.contains("operation=GetApplication"));
    assert!(rendered.contains("app=demo"));
}

#[test]
fn auth_error_defaults_unrecoverable_but_overridable() {
    let err = ArgoError::auth("token expired");
    assert!(!err.recoverable);
    let err = err.recoverable(true);
    assert!(err.recoverable);
}

#[test]
fn stream_recovery_trigger_matches_spec_kinds() {
    assert!(ArgoError::network("refused").triggers_stream_recovery());
    assert!(ArgoError::timeout("deadline").triggers_stream_recovery());
    assert!(ArgoError::http(500, "boom").triggers_stream_recovery());
    assert!(ArgoError::unavailable("down").triggers_stream_recovery());
    assert!(!ArgoError::auth("expired").triggers_stream_recovery());
    assert!(!ArgoError::config("bad").triggers_stream_recovery());
}
