// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::state::AppState;

#[test]
fn cluster_command_jumps_to_namespaces_with_cluster_scoped() {
    let mut state = AppState::default();
    dispatch(&mut state, "cluster us-east-1");
    assert_eq!(state.nav.view, View::Namespaces);
    assert_eq!(state.nav.scope.cluster_id.as_deref(), Some("us-east-1"));
}

#[test]
fn ns_requires_an_argument() {
    let mut state = AppState::default();
    dispatch(&mut state, "ns");
    assert_eq!(state.ui.mode, Mode::Command);
    assert_eq!(state.ui.command_buffer, "ns");
}

#[test]
fn project_jumps_to_apps_and_emits_watch_restart() {
    let mut state = AppState::default();
    let intents = dispatch(&mut state, "project team-a");
    assert_eq!(state.nav.view, View::Apps);
    assert_eq!(state.nav.scope.project.as_deref(), Some("team-a"));
    assert_eq!(intents.len(), 1);
}

#[test]
fn unknown_command_preserves_buffer_and_sets_status() {
    let mut state = AppState::default();
    dispatch(&mut state, "frobnicate now");
    assert_eq!(state.ui.command_buffer, "frobnicate now");
    assert_eq!(state.ui.mode, Mode::Command);
    assert!(state.ui.status.is_some());
}

#[test]
fn sort_without_direction_is_rejected_and_does_not_change_status_to_sorted() {
    let mut state = AppState::default();
    dispatch(&mut state, "sort name");
    let (message, _) = state.ui.status.clone().unwrap();
    assert!(!message.starts_with("sorted"));
}

#[test]
fn sort_with_both_arguments_succeeds() {
    let mut state = AppState::default();
    dispatch(&mut state, "sort name desc");
    let (message, kind) = state.ui.status.clone().unwrap();
    assert_eq!(message, "sorted by name desc");
    assert_eq!(kind, StatusKind::Info);
}

#[test]
fn refresh_bang_requests_hard_refresh() {
    let mut state = AppState::default();
    state.nav.current_app = Some("guestbook".to_string());
    let intents = dispatch(&mut state, "refresh!");
    match intents.as_slice() {
        [Intent::Refresh { hard, app_name, .. }] => {
            assert!(*hard);
            assert_eq!(app_name, "guestbook");
        }
        other => panic!("unexpected intents: {other:?}"),
    }
}

#[test]
fn bare_context_opens_picker() {
    let mut state = AppState::default();
    state.server.context_names = vec!["prod".to_string(), "staging".to_string()];
    dispatch(&mut state, "context");
    assert!(state.modal.is_open());
}

#[test]
fn sort_with_one_argument_offers_direction_autocomplete() {
    let mut state = AppState::default();
    dispatch(&mut state, "sort name");
    assert_eq!(state.ui.autocomplete, vec!["sort name asc", "sort name desc"]);
}

#[test]
fn bare_sort_offers_field_autocomplete() {
    let mut state = AppState::default();
    dispatch(&mut state, "sort");
    assert_eq!(state.ui.autocomplete, vec!["sort name", "sort sync", "sort health"]);
}

#[test]
fn sort_with_both_arguments_clears_autocomplete() {
    let mut state = AppState::default();
    state.ui.autocomplete = vec!["sort name asc".to_string()];
    dispatch(&mut state, "sort name desc");
    assert!(state.ui.autocomplete.is_empty());
}

#[test]
fn theme_opens_picker_with_the_finite_theme_list() {
    let mut state = AppState::default();
    let intents = dispatch(&mut state, "theme");
    assert!(intents.is_empty());
    match state.modal.active {
        Some(Modal::ThemePicker { themes, .. }) => assert_eq!(themes, THEMES),
        other => panic!("unexpected modal: {other:?}"),
    }
}

#[test]
fn logs_emits_open_log_viewer_intent() {
    let mut state = AppState::default();
    let intents = dispatch(&mut state, "logs");
    assert!(matches!(intents.as_slice(), [Intent::OpenLogViewer]));
}

#[test]
fn rollback_with_no_current_app_emits_no_intent() {
    let mut state = AppState::default();
    let intents = dispatch(&mut state, "rollback");
    assert!(intents.is_empty());
}
