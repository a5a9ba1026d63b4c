// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::message::Message;

fn ctx(derived_len: usize, highlighted_id: Option<&str>) -> ReduceContext {
    ReduceContext {
        derived_len,
        viewport_height: 10,
        highlighted_id: highlighted_id.map(|s| s.to_string()),
    }
}

#[test]
fn stale_generation_event_is_dropped() {
    let mut state = AppState::default();
    state.server.switch_context(test_context("prod"));
    let before = state.ui.mode;
    reduce(
        &mut state,
        Message::StreamAuthError { generation: 0 },
        &ctx(0, None),
    );
    assert_eq!(state.ui.mode, before);
    assert!(state.ui.status.is_none());
}

#[test]
fn current_generation_event_is_applied() {
    let mut state = AppState::default();
    let generation = state.server.switch_context(test_context("prod"));
    reduce(&mut state, Message::StreamAuthError { generation }, &ctx(0, None));
    assert!(state.ui.status.is_some());
}

#[test]
fn enter_in_clusters_view_descends_and_resets_selection() {
    let mut state = AppState::default();
    state.selection.toggle(View::Namespaces, "stale");
    reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, Some("cluster-a")));
    assert_eq!(state.nav.view, View::Namespaces);
    assert!(!state.selection.is_selected(View::Namespaces, "stale"));
}

#[test]
fn enter_in_apps_view_opens_resource_tree() {
    let mut state = AppState::default();
    state.nav.view = View::Apps;
    reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, Some("guestbook")));
    assert_eq!(state.nav.view, View::ResourceTree);
    assert_eq!(state.nav.current_app.as_deref(), Some("guestbook"));
}

#[test]
fn escape_in_command_mode_restores_prior_buffer() {
    let mut state = AppState::default();
    state.ui.search_buffer = "prod".to_string();
    state.ui.mode = Mode::Search;
    state.ui.enter_command();
    reduce(&mut state, Message::Key(KeyCode::Char('x')), &ctx(0, None));
    reduce(&mut state, Message::Key(KeyCode::Escape), &ctx(0, None));
    assert_eq!(state.ui.mode, Mode::Search);
    assert_eq!(state.ui.search_buffer, "prod");
}

#[test]
fn space_toggles_selection_in_apps_view() {
    let mut state = AppState::default();
    state.nav.view = View::Apps;
    reduce(&mut state, Message::Key(KeyCode::Char(' ')), &ctx(1, Some("guestbook")));
    assert!(state.selection.is_selected(View::Apps, "guestbook"));
}

#[test]
fn sync_with_multi_selection_names_all_targets() {
    let mut state = AppState::default();
    state.nav.view = View::Apps;
    state.selection.toggle(View::Apps, "a");
    state.selection.toggle(View::Apps, "b");
    reduce(&mut state, Message::Key(KeyCode::Char('s')), &ctx(2, Some("a")));
    match state.modal.active.as_ref() {
        Some(Modal::ConfirmSync { targets: crate::state::modal::SyncTargets::Many(names) }) => {
            assert_eq!(names.len(), 2);
        }
        other => panic!("unexpected modal: {other:?}"),
    }
}

#[test]
fn ctrl_d_opens_delete_confirmation_and_requires_typed_name() {
    let mut state = AppState::default();
    state.nav.view = View::Apps;
    reduce(&mut state, Message::Key(KeyCode::Ctrl('d')), &ctx(1, Some("demo")));
    assert!(state.modal.is_open());

    reduce(&mut state, Message::Key(KeyCode::Char('n')), &ctx(1, None));
    assert!(!state.modal.is_open());
}

#[test]
fn delete_confirm_app_name_containing_n_or_q_types_verbatim() {
    let mut state = AppState::default();
    state.nav.view = View::Apps;
    reduce(&mut state, Message::Key(KeyCode::Ctrl('d')), &ctx(1, Some("nginx-queue")));
    for c in "nginx-queue".chars() {
        reduce(&mut state, Message::Key(KeyCode::Char(c)), &ctx(1, None));
    }
    assert!(state.modal.is_open(), "'n'/'q' mid-name must not cancel the modal");
    let intents = reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, None));
    assert!(matches!(intents.as_slice(), [Intent::Delete { app_name, .. }] if app_name == "nginx-queue"));
}

#[test]
fn delete_confirm_requires_exact_typed_name_before_enter_fires_intent() {
    let mut state = AppState::default();
    state.nav.view = View::Apps;
    reduce(&mut state, Message::Key(KeyCode::Ctrl('d')), &ctx(1, Some("demo")));
    reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, None));
    assert!(state.modal.is_open(), "enter without typed match must not confirm");

    for c in "demo".chars() {
        reduce(&mut state, Message::Key(KeyCode::Char(c)), &ctx(1, None));
    }
    let intents = reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, None));
    assert!(!state.modal.is_open());
    assert!(matches!(intents.as_slice(), [Intent::Delete { app_name, .. }] if app_name == "demo"));
}

#[test]
fn app_deleted_clears_selection_referencing_it() {
    let mut state = AppState::default();
    let generation = state.server.switch_context(test_context("prod"));
    state.selection.toggle(View::Apps, "guestbook");
    reduce(
        &mut state,
        Message::AppDeleted { generation, namespace: "argocd".to_string(), name: "guestbook".to_string() },
        &ctx(0, None),
    );
    assert!(!state.selection.is_selected(View::Apps, "guestbook"));
}

#[test]
fn context_switched_bumps_generation_and_starts_fresh_watch() {
    let mut state = AppState::default();
    let context = test_context("staging");
    let intents = reduce(&mut state, Message::ContextSwitched { context: context.clone() }, &ctx(0, None));
    assert_eq!(state.server.current_context_name(), Some("staging"));
    assert!(matches!(intents.as_slice(), [Intent::StartAppsWatch(spec)] if spec.generation == state.server.generation()));
}

#[test]
fn descending_into_project_scope_restarts_the_apps_watch() {
    let mut state = AppState::default();
    state.nav.view = View::Projects;
    let intents = reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, Some("team-a")));
    assert_eq!(state.nav.view, View::Apps);
    assert!(matches!(
        intents.as_slice(),
        [Intent::RestartScopedWatch(spec)] if spec.scope.project.as_deref() == Some("team-a")
    ));
}

#[test]
fn descending_above_project_depth_emits_no_watch_restart() {
    let mut state = AppState::default();
    state.nav.view = View::Clusters;
    let intents = reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, Some("cluster-a")));
    assert_eq!(state.nav.view, View::Namespaces);
    assert!(intents.is_empty());
}

#[test]
fn leaving_project_scope_also_restarts_the_apps_watch() {
    let mut state = AppState::default();
    state.nav.view = View::Projects;
    reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(1, Some("team-a")));
    assert_eq!(state.nav.view, View::Apps);

    let intents = reduce(&mut state, Message::Key(KeyCode::Escape), &ctx(1, None));
    assert_eq!(state.nav.view, View::Projects);
    assert!(matches!(
        intents.as_slice(),
        [Intent::RestartScopedWatch(spec)] if spec.scope.project.is_none()
    ));
}

#[test]
fn cursor_is_contained_after_every_reduce_step() {
    let mut state = AppState::default();
    state.nav.cursor = 50;
    reduce(&mut state, Message::Tick, &ctx(3, None));
    assert!(state.nav.cursor < 3);
}

#[test]
fn rollback_history_loaded_opens_picker_sorted_newest_first() {
    let mut state = AppState::default();
    let generation = state.server.switch_context(test_context("prod"));
    let history = vec![
        argonaut_core::RevisionHistoryEntry {
            id: 1,
            revision: "abc123".to_string(),
            deployed_at: Some("2026-07-01T00:00:00Z".to_string()),
        },
        argonaut_core::RevisionHistoryEntry { id: 2, revision: "def456".to_string(), deployed_at: None },
    ];
    reduce(
        &mut state,
        Message::RollbackHistoryLoaded { generation, app_name: "guestbook".to_string(), history },
        &ctx(0, None),
    );
    match state.modal.active {
        Some(Modal::RollbackPicker { app_name, history, cursor }) => {
            assert_eq!(app_name, "guestbook");
            assert_eq!(cursor, 0);
            assert_eq!(history[1].deployed_at, "unknown");
        }
        other => panic!("unexpected modal: {other:?}"),
    }
}

#[test]
fn diff_loaded_with_no_diffs_opens_no_diff_modal() {
    let mut state = AppState::default();
    let generation = state.server.switch_context(test_context("prod"));
    let intents = reduce(
        &mut state,
        Message::DiffLoaded { generation, app_name: "guestbook".to_string(), diffs: Vec::new() },
        &ctx(0, None),
    );
    assert!(intents.is_empty());
    assert!(matches!(state.modal.active, Some(Modal::NoDiff { .. })));
}

#[test]
fn diff_loaded_with_diffs_spawns_the_pager() {
    let mut state = AppState::default();
    let generation = state.server.switch_context(test_context("prod"));
    let diffs = vec![argonaut_core::ResourceDiff {
        kind: "Deployment".to_string(),
        group: "apps".to_string(),
        namespace: "default".to_string(),
        name: "guestbook-ui".to_string(),
        live_state: Some(serde_json::json!({"replicas": 1})),
        desired_state: Some(serde_json::json!({"replicas": 2})),
    }];
    let intents = reduce(
        &mut state,
        Message::DiffLoaded { generation, app_name: "guestbook".to_string(), diffs },
        &ctx(0, None),
    );
    match intents.as_slice() {
        [Intent::SpawnDiffPager { app_name, diff_text }] => {
            assert_eq!(app_name, "guestbook");
            assert!(diff_text.contains("guestbook-ui"));
        }
        other => panic!("unexpected intents: {other:?}"),
    }
}

#[test]
fn session_log_loaded_opens_log_viewer() {
    let mut state = AppState::default();
    reduce(
        &mut state,
        Message::SessionLogLoaded { lines: vec!["[Info] startup: session started".to_string()] },
        &ctx(0, None),
    );
    assert_eq!(state.ui.mode, Mode::LogViewer);
    assert_eq!(state.ui.log_lines.len(), 1);
}

#[test]
fn q_dismisses_the_log_viewer() {
    let mut state = AppState::default();
    state.ui.mode = Mode::LogViewer;
    reduce(&mut state, Message::Key(KeyCode::Char('q')), &ctx(0, None));
    assert_eq!(state.ui.mode, Mode::Normal);
}

#[test]
fn rollback_picker_enter_fires_rollback_with_selected_revision() {
    let mut state = AppState::default();
    let generation = state.server.switch_context(test_context("prod"));
    state.modal.open(Modal::RollbackPicker {
        app_name: "guestbook".to_string(),
        history: vec![
            crate::state::modal::RollbackEntry {
                id: 7,
                revision: "abc123".to_string(),
                deployed_at: "2026-07-01".to_string(),
            },
            crate::state::modal::RollbackEntry {
                id: 8,
                revision: "def456".to_string(),
                deployed_at: "2026-07-02".to_string(),
            },
        ],
        cursor: 1,
    });
    let intents = reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(0, None));
    assert!(!state.modal.is_open());
    match intents.as_slice() {
        [Intent::Rollback { generation: g, app_name, revision_id }] => {
            assert_eq!(*g, generation);
            assert_eq!(app_name, "guestbook");
            assert_eq!(*revision_id, 8);
        }
        other => panic!("unexpected intents: {other:?}"),
    }
}

#[test]
fn theme_picker_enter_sets_the_active_theme() {
    let mut state = AppState::default();
    state.modal.open(Modal::ThemePicker {
        themes: vec!["default".to_string(), "dark".to_string()],
        cursor: 1,
    });
    reduce(&mut state, Message::Key(KeyCode::Enter), &ctx(0, None));
    assert!(!state.modal.is_open());
    assert_eq!(state.ui.theme.as_deref(), Some("dark"));
}

fn test_context(name: &str) -> argonaut_core::Context {
    argonaut_core::Context {
        name: name.to_string(),
        server: argonaut_core::Server {
            base_url: "https://argocd.example.com".to_string(),
            auth_token: "token".to_string(),
            insecure: false,
            grpc_web: false,
            ca_cert_path: None,
            ca_path: None,
            client_cert_path: None,
            client_key_path: None,
            context_name: name.to_string(),
            request_timeout: std::time::Duration::from_secs(10),
        },
    }
}
