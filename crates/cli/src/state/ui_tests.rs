// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn enter_command_then_escape_restores_prior_mode_and_buffers() {
    let mut ui = UiState::default();
    ui.search_buffer = "guestbook".to_string();
    ui.mode = Mode::Search;

    ui.enter_command();
    assert_eq!(ui.mode, Mode::Command);
    ui.command_buffer.push_str("sync");

    assert!(ui.escape());
    assert_eq!(ui.mode, Mode::Search);
    assert_eq!(ui.search_buffer, "guestbook");
}

#[test]
fn escape_with_nothing_saved_is_a_no_op() {
    let mut ui = UiState::default();
    assert!(!ui.escape());
    assert_eq!(ui.mode, Mode::Normal);
}

#[test]
fn commit_command_clears_buffer_and_returns_to_normal() {
    let mut ui = UiState::default();
    ui.enter_command();
    ui.command_buffer.push_str("refresh");
    let cmd = ui.commit_command();
    assert_eq!(cmd, "refresh");
    assert_eq!(ui.mode, Mode::Normal);
    assert!(ui.command_buffer.is_empty());
}

#[test]
fn commit_search_preserves_buffer_for_highlighting() {
    let mut ui = UiState::default();
    ui.enter_search();
    ui.search_buffer.push_str("prod");
    let query = ui.commit_search();
    assert_eq!(query, "prod");
    assert_eq!(ui.mode, Mode::Normal);
    assert_eq!(ui.search_buffer, "prod");
}

#[test]
fn set_and_clear_status() {
    let mut ui = UiState::default();
    ui.set_status("sync started", StatusKind::Info);
    assert!(ui.status.is_some());
    ui.clear_status();
    assert!(ui.status.is_none());
}
