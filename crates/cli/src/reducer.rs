// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level reducer (§4.9, §5). Pure: given the current [`AppState`]
//! and an incoming [`Message`], mutates the state in place and returns
//! the [`Intent`]s a dispatcher should act on. Never performs I/O.

use argonaut_core::ResourceDiff;

use crate::intent::Intent;
use crate::message::{KeyCode, Message, OpResult};
use crate::state::modal::SyncTargets;
use crate::state::ui::StatusKind;
use crate::state::{AppState, Mode, Modal, View};

/// Facts about the currently rendered list that the reducer needs but
/// does not itself own (§4.9 rule 2, rule 4) — they come from applying
/// C8's scope/sort/filter to the current store snapshot.
#[derive(Debug, Clone, Default)]
pub struct ReduceContext {
    pub derived_len: usize,
    pub viewport_height: usize,
    /// The id under the cursor in the current view, if any.
    pub highlighted_id: Option<String>,
}

/// Entry point: apply `msg` to `state`, returning the intents to act on.
pub fn reduce(state: &mut AppState, msg: Message, ctx: &ReduceContext) -> Vec<Intent> {
    let intents = match msg {
        Message::Key(key) => reduce_key(state, key, ctx),
        Message::AppsLoaded { generation, .. } => {
            if state.server.accepts(generation) {
                state.ui.mode = Mode::Normal;
            }
            Vec::new()
        }
        Message::AppUpdated { generation, .. } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            Vec::new()
        }
        Message::AppDeleted { generation, name, .. } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            state.forget_app(&name);
            Vec::new()
        }
        Message::StreamAuthError { generation } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            state.ui.set_status("authentication required", StatusKind::Error);
            Vec::new()
        }
        Message::StreamHttpError { generation, code, body } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            state.ui.set_status(format!("server error {code}: {body}"), StatusKind::Error);
            Vec::new()
        }
        Message::StreamStatusChanged { generation, .. } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            Vec::new()
        }
        Message::ResourceTreeLoaded { generation, .. } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            state.ui.mode = Mode::ResourceTree;
            Vec::new()
        }
        Message::RollbackHistoryLoaded { generation, app_name, history } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            let history = history
                .into_iter()
                .map(|entry| crate::state::modal::RollbackEntry {
                    id: entry.id,
                    revision: entry.revision,
                    deployed_at: entry.deployed_at.unwrap_or_else(|| "unknown".to_string()),
                })
                .collect();
            state.modal.open(Modal::RollbackPicker { app_name, history, cursor: 0 });
            Vec::new()
        }
        Message::DiffLoaded { generation, app_name, diffs } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            if diffs.is_empty() {
                state.modal.open(Modal::NoDiff { app_name });
                Vec::new()
            } else {
                vec![Intent::SpawnDiffPager { app_name, diff_text: format_diffs(&diffs) }]
            }
        }
        Message::SessionLogLoaded { lines } => {
            state.ui.log_lines = lines;
            state.ui.mode = Mode::LogViewer;
            Vec::new()
        }
        Message::OpCompleted { generation, result } => {
            if !state.server.accepts(generation) {
                return Vec::new();
            }
            apply_op_result(state, result);
            Vec::new()
        }
        Message::ExternalExited { .. } => {
            state.ui.mode = Mode::Normal;
            Vec::new()
        }
        Message::ContextSwitched { context } => {
            let generation = state.server.switch_context(context);
            state.nav = crate::state::NavigationState::default();
            state.selection = crate::state::SelectionState::default();
            state.ui.mode = Mode::Normal;
            vec![Intent::StartAppsWatch(crate::intent::WatchSpec {
                generation,
                scope: state.nav.scope.clone(),
            })]
        }
        Message::ContextSwitchFailed { message } => {
            state.ui.set_status(format!("context switch failed: {message}"), StatusKind::Error);
            Vec::new()
        }
        Message::DegradationModeChanged | Message::Tick => Vec::new(),
    };

    state.nav.contain_cursor(ctx.derived_len, ctx.viewport_height);
    intents
}

/// Render fetched resource diffs as plain text for the external pager
/// (§4.10 `diff`, §4.11 handoff) — one unified-ish block per resource.
fn format_diffs(diffs: &[ResourceDiff]) -> String {
    let mut out = String::new();
    for diff in diffs {
        out.push_str(&format!("--- {} {}/{} ({})\n", diff.kind, diff.namespace, diff.name, diff.group));
        let live = diff.live_state.as_ref().map(|v| serde_json::to_string_pretty(v).unwrap_or_default());
        let desired =
            diff.desired_state.as_ref().map(|v| serde_json::to_string_pretty(v).unwrap_or_default());
        match (live, desired) {
            (Some(live), Some(desired)) => {
                out.push_str("live:\n");
                out.push_str(&live);
                out.push_str("\ndesired:\n");
                out.push_str(&desired);
            }
            (Some(live), None) => {
                out.push_str("live only (no desired state):\n");
                out.push_str(&live);
            }
            (None, Some(desired)) => {
                out.push_str("desired only (not yet live):\n");
                out.push_str(&desired);
            }
            (None, None) => out.push_str("(no state reported)"),
        }
        out.push_str("\n\n");
    }
    out
}

fn apply_op_result(state: &mut AppState, result: OpResult) {
    let (label, app_name, ok, error) = match result {
        OpResult::Sync { app_name, ok, error } => ("sync", app_name, ok, error),
        OpResult::Refresh { app_name, ok, error } => ("refresh", app_name, ok, error),
        OpResult::Rollback { app_name, ok, error } => ("rollback", app_name, ok, error),
        OpResult::Delete { app_name, ok, error } => ("delete", app_name, ok, error),
    };
    if ok {
        state.ui.set_status(format!("{label} {app_name} succeeded"), StatusKind::Info);
    } else {
        let detail = error.unwrap_or_else(|| "unknown error".to_string());
        state.ui.set_status(format!("{label} {app_name} failed: {detail}"), StatusKind::Error);
    }
}

fn reduce_key(state: &mut AppState, key: KeyCode, ctx: &ReduceContext) -> Vec<Intent> {
    if state.modal.is_open() {
        return reduce_modal_key(state, key);
    }
    match state.ui.mode {
        Mode::Command => reduce_command_key(state, key),
        Mode::Search => reduce_search_key(state, key),
        Mode::Help | Mode::LogViewer => reduce_overlay_key(state, key),
        _ => reduce_normal_key(state, key, ctx),
    }
}

fn reduce_overlay_key(state: &mut AppState, key: KeyCode) -> Vec<Intent> {
    if matches!(key, KeyCode::Char('q') | KeyCode::Escape) {
        state.ui.mode = Mode::Normal;
    }
    Vec::new()
}

fn reduce_command_key(state: &mut AppState, key: KeyCode) -> Vec<Intent> {
    match key {
        KeyCode::Escape => {
            state.ui.escape();
            Vec::new()
        }
        KeyCode::Backspace => {
            state.ui.command_buffer.pop();
            Vec::new()
        }
        KeyCode::Char(c) => {
            state.ui.command_buffer.push(c);
            Vec::new()
        }
        KeyCode::Enter => {
            let line = state.ui.commit_command();
            crate::command::dispatch(state, &line)
        }
        _ => Vec::new(),
    }
}

fn reduce_search_key(state: &mut AppState, key: KeyCode) -> Vec<Intent> {
    match key {
        KeyCode::Escape => {
            state.ui.escape();
        }
        KeyCode::Backspace => {
            state.ui.search_buffer.pop();
        }
        KeyCode::Char(c) => {
            state.ui.search_buffer.push(c);
        }
        KeyCode::Enter => {
            state.ui.commit_search();
        }
        _ => {}
    }
    Vec::new()
}

fn reduce_modal_key(state: &mut AppState, key: KeyCode) -> Vec<Intent> {
    let Some(modal) = state.modal.active.clone() else { return Vec::new() };
    match (&modal, key) {
        (_, KeyCode::Escape) => {
            state.modal.close();
            Vec::new()
        }
        (Modal::ConfirmDelete { typed, .. }, KeyCode::Char('n')) if typed.is_empty() => {
            state.modal.close();
            Vec::new()
        }
        (Modal::ConfirmDelete { .. }, KeyCode::Backspace) => {
            if let Some(m) = &mut state.modal.active {
                m.backspace_delete_char();
            }
            Vec::new()
        }
        (Modal::ConfirmDelete { .. }, KeyCode::Char(c)) => {
            if let Some(m) = &mut state.modal.active {
                m.push_delete_char(c);
            }
            Vec::new()
        }
        (Modal::ConfirmDelete { app_name, .. }, KeyCode::Enter) => {
            let confirmed = state.modal.active.as_ref().is_some_and(Modal::delete_confirmed);
            let app_name = app_name.clone();
            if confirmed {
                state.modal.close();
                vec![Intent::Delete {
                    generation: state.server.generation(),
                    app_name,
                    cascade: true,
                    propagation_policy: "foreground".to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        (Modal::ConfirmSync { targets }, KeyCode::Enter) => {
            let targets = targets.clone();
            state.modal.close();
            vec![Intent::Sync { generation: state.server.generation(), targets, prune: false }]
        }
        (Modal::ContextPicker { contexts, .. }, KeyCode::Down) => {
            if let Some(Modal::ContextPicker { cursor, .. }) = &mut state.modal.active {
                *cursor = (*cursor + 1).min(contexts.len().saturating_sub(1));
            }
            Vec::new()
        }
        (Modal::ContextPicker { .. }, KeyCode::Up) => {
            if let Some(Modal::ContextPicker { cursor, .. }) = &mut state.modal.active {
                *cursor = cursor.saturating_sub(1);
            }
            Vec::new()
        }
        (Modal::ContextPicker { contexts, cursor }, KeyCode::Enter) => {
            let context_name = contexts.get(*cursor).cloned();
            state.modal.close();
            match context_name {
                Some(context_name) => vec![Intent::SwitchContext { context_name }],
                None => Vec::new(),
            }
        }
        (Modal::RollbackPicker { history, .. }, KeyCode::Down) => {
            if let Some(Modal::RollbackPicker { cursor, .. }) = &mut state.modal.active {
                *cursor = (*cursor + 1).min(history.len().saturating_sub(1));
            }
            Vec::new()
        }
        (Modal::RollbackPicker { .. }, KeyCode::Up) => {
            if let Some(Modal::RollbackPicker { cursor, .. }) = &mut state.modal.active {
                *cursor = cursor.saturating_sub(1);
            }
            Vec::new()
        }
        (Modal::RollbackPicker { app_name, history, cursor }, KeyCode::Enter) => {
            let revision_id = history.get(*cursor).map(|entry| entry.id);
            let app_name = app_name.clone();
            state.modal.close();
            match revision_id {
                Some(revision_id) => {
                    vec![Intent::Rollback { generation: state.server.generation(), app_name, revision_id }]
                }
                None => Vec::new(),
            }
        }
        (Modal::ThemePicker { themes, .. }, KeyCode::Down) => {
            if let Some(Modal::ThemePicker { cursor, .. }) = &mut state.modal.active {
                *cursor = (*cursor + 1).min(themes.len().saturating_sub(1));
            }
            Vec::new()
        }
        (Modal::ThemePicker { .. }, KeyCode::Up) => {
            if let Some(Modal::ThemePicker { cursor, .. }) = &mut state.modal.active {
                *cursor = cursor.saturating_sub(1);
            }
            Vec::new()
        }
        (Modal::ThemePicker { themes, cursor }, KeyCode::Enter) => {
            let theme = themes.get(*cursor).cloned();
            state.modal.close();
            if let Some(theme) = theme {
                state.ui.set_status(format!("theme set to {theme}"), StatusKind::Info);
                state.ui.theme = Some(theme);
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn reduce_normal_key(state: &mut AppState, key: KeyCode, ctx: &ReduceContext) -> Vec<Intent> {
    match key {
        KeyCode::Char('j') | KeyCode::Down => {
            state.nav.move_cursor(1);
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.nav.move_cursor(-1);
            Vec::new()
        }
        KeyCode::PageDown => {
            state.nav.move_cursor(10);
            Vec::new()
        }
        KeyCode::PageUp => {
            state.nav.move_cursor(-10);
            Vec::new()
        }
        KeyCode::Char('g') => {
            state.nav.move_to_top();
            Vec::new()
        }
        KeyCode::Char('G') => {
            state.nav.move_to_bottom(ctx.derived_len);
            Vec::new()
        }
        KeyCode::Char(':') => {
            state.ui.enter_command();
            Vec::new()
        }
        KeyCode::Char('/') => {
            state.ui.enter_search();
            Vec::new()
        }
        KeyCode::Char('?') => {
            state.ui.mode = Mode::Help;
            Vec::new()
        }
        KeyCode::Char('q') => {
            if state.nav.view == View::ResourceTree {
                let had_project = state.nav.scope.has_project();
                state.ui.mode = Mode::Normal;
                state.nav.ascend();
                return scope_watch_restart(state, had_project);
            }
            Vec::new()
        }
        KeyCode::Escape => {
            let had_project = state.nav.scope.has_project();
            state.nav.ascend();
            scope_watch_restart(state, had_project)
        }
        KeyCode::Enter => reduce_enter(state, ctx),
        KeyCode::Char(' ') if state.nav.view == View::Apps => {
            if let Some(id) = &ctx.highlighted_id {
                state.selection.toggle(View::Apps, id);
            }
            Vec::new()
        }
        KeyCode::Char('s') => reduce_sync_request(state, ctx),
        KeyCode::Ctrl('d') => {
            if state.nav.view == View::Apps {
                if let Some(id) = &ctx.highlighted_id {
                    state.modal.open(Modal::confirm_delete(id.clone()));
                }
            }
            Vec::new()
        }
        KeyCode::Char('K') => {
            if let Some(app_name) = current_app_for_external(state, ctx) {
                state.ui.mode = Mode::External;
                return vec![Intent::SpawnExternalViewer { app_name }];
            }
            Vec::new()
        }
        KeyCode::Ctrl('c') => vec![Intent::Quit],
        _ => Vec::new(),
    }
}

/// `Space`-selected apps take priority (§4.9 rule 5); otherwise the
/// highlighted row alone is the target.
fn reduce_sync_request(state: &mut AppState, ctx: &ReduceContext) -> Vec<Intent> {
    if state.nav.view != View::Apps {
        return Vec::new();
    }
    let selected = state.selection.selected(View::Apps);
    let targets = if selected.len() >= 2 {
        SyncTargets::Many(selected)
    } else if let Some(id) = &ctx.highlighted_id {
        SyncTargets::Single(id.clone())
    } else {
        return Vec::new();
    };
    state.modal.open(Modal::ConfirmSync { targets });
    Vec::new()
}

fn current_app_for_external(state: &AppState, ctx: &ReduceContext) -> Option<String> {
    match state.nav.view {
        View::ResourceTree => state.nav.current_app.clone(),
        View::Apps => ctx.highlighted_id.clone(),
        _ => None,
    }
}

fn reduce_enter(state: &mut AppState, ctx: &ReduceContext) -> Vec<Intent> {
    match state.nav.view {
        View::Clusters | View::Namespaces | View::Projects => {
            if let Some(id) = &ctx.highlighted_id {
                let had_project = state.nav.scope.has_project();
                state.nav.descend(id);
                let view = state.nav.view;
                state.enter_view(view);
                return scope_watch_restart(state, had_project);
            }
            Vec::new()
        }
        View::Apps => {
            if let Some(id) = &ctx.highlighted_id {
                state.nav.open_resource_tree(id);
                state.ui.mode = Mode::ResourceTree;
            }
            Vec::new()
        }
        View::ResourceTree => Vec::new(),
    }
}

/// Drilling to at least project depth (or back out of it) restarts the
/// apps watch scoped to the new project filter, debounced so rapid
/// `Enter`/`Esc` flipping between projects coalesces into one restart
/// (§4.8 scoped-watch rule). A no-op when the drill stayed within or
/// outside project depth (e.g. Clusters→Namespaces, Apps→ResourceTree).
fn scope_watch_restart(state: &AppState, had_project: bool) -> Vec<Intent> {
    if state.nav.scope.has_project() == had_project {
        return Vec::new();
    }
    vec![Intent::RestartScopedWatch(crate::intent::WatchSpec {
        generation: state.server.generation(),
        scope: state.nav.scope.clone(),
    })]
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
