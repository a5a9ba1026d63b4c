// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command Dispatcher (C10, §4.10). Tokenises a `:`-buffer into
//! `cmd arg*`, validates argument cardinality against the table in
//! §4.10, and turns a recognised command into [`Intent`]s or direct
//! state transitions (view jumps, modal opens).

use argonaut_core::scope::{SortDirection, SortField, SortSpec};
use argonaut_core::Scope;

use crate::intent::Intent;
use crate::state::ui::StatusKind;
use crate::state::{AppState, Mode, Modal, View};

const UNKNOWN_COMMAND: &str = "unknown command — see :help";

/// Finite theme palette the picker offers (§6 `theme` config key); the
/// rendering each name drives belongs to the terminal layer.
const THEMES: &[&str] = &["default", "dark", "light", "solarized", "nord"];

/// Dispatch one committed command line. `line` has already been taken
/// out of the UI command buffer by the caller.
pub fn dispatch(state: &mut AppState, line: &str) -> Vec<Intent> {
    let mut tokens = line.split_whitespace();
    let Some(cmd) = tokens.next() else {
        return Vec::new();
    };
    let args: Vec<&str> = tokens.collect();
    if cmd != "sort" {
        state.ui.autocomplete.clear();
    }

    match cmd {
        "cluster" | "ctx" => jump_cluster(state, args.first().copied()),
        "ns" => required_arg(state, line, &args, |state, name| {
            state.nav.jump_to(
                View::Namespaces,
                Scope { namespace: Some(name.to_string()), ..state.nav.scope.clone() },
            );
            Vec::new()
        }),
        "project" | "proj" => required_arg(state, line, &args, |state, name| {
            state.nav.jump_to(
                View::Apps,
                Scope { project: Some(name.to_string()), ..state.nav.scope.clone() },
            );
            vec![Intent::StartAppsWatch(crate::intent::WatchSpec {
                generation: state.server.bump_generation(),
                scope: state.nav.scope.clone(),
            })]
        }),
        "appsets" | "appset" => {
            state.nav.jump_to(
                View::Projects,
                Scope { app_set: args.first().map(|s| s.to_string()), ..state.nav.scope.clone() },
            );
            Vec::new()
        }
        "app" | "apps" => {
            state.nav.jump_to(View::Apps, state.nav.scope.clone());
            Vec::new()
        }
        "resources" => required_arg(state, line, &args, |state, name| {
            state.nav.open_resource_tree(name);
            state.ui.mode = Mode::ResourceTree;
            Vec::new()
        }),
        "sync" => {
            let targets = crate::state::modal::SyncTargets::Many(state.selection.selected(View::Apps));
            state.modal.open(Modal::ConfirmSync { targets });
            Vec::new()
        }
        "refresh" => refresh(state, false),
        "refresh!" => refresh(state, true),
        "rollback" => {
            if let Some(app_name) = state.nav.current_app.clone() {
                vec![Intent::FetchRollbackHistory { generation: state.server.generation(), app_name }]
            } else {
                Vec::new()
            }
        }
        "diff" => {
            let app_name = args.first().map(|s| s.to_string()).or_else(|| state.nav.current_app.clone());
            match app_name {
                Some(app_name) => vec![Intent::FetchDiff { generation: state.server.generation(), app_name }],
                None => unrecognised(state, line),
            }
        }
        "logs" => vec![Intent::OpenLogViewer],
        "context" => match args.first() {
            Some(name) => vec![Intent::SwitchContext { context_name: name.to_string() }],
            None => {
                state.modal.open(Modal::ContextPicker {
                    contexts: state.server.context_names.clone(),
                    cursor: 0,
                });
                Vec::new()
            }
        },
        "theme" => {
            state.modal.open(Modal::ThemePicker {
                themes: THEMES.iter().map(|s| s.to_string()).collect(),
                cursor: 0,
            });
            Vec::new()
        }
        "sort" => sort(state, line, &args),
        _ => unrecognised(state, line),
    }
}

fn jump_cluster(state: &mut AppState, cluster_id: Option<&str>) -> Vec<Intent> {
    state.nav.jump_to(
        View::Namespaces,
        Scope { cluster_id: cluster_id.map(|s| s.to_string()), ..Default::default() },
    );
    Vec::new()
}

fn refresh(state: &mut AppState, hard: bool) -> Vec<Intent> {
    let Some(app_name) = state.nav.current_app.clone() else { return Vec::new() };
    vec![Intent::Refresh { generation: state.server.generation(), app_name, hard }]
}

const SORT_FIELDS: &[&str] = &["name", "sync", "health"];
const SORT_DIRECTIONS: &[&str] = &["asc", "desc"];

/// `sort <field> <dir>`: both arguments are required; a half-complete
/// command offers autocomplete for the missing half instead of changing
/// the active sort (§4.10).
fn sort(state: &mut AppState, line: &str, args: &[&str]) -> Vec<Intent> {
    match args {
        [field, dir] => {
            let parsed_field_opt = match *field {
                "name" => Some(SortField::Name),
                "sync" => Some(SortField::Sync),
                "health" => Some(SortField::Health),
                _ => None,
            };
            let parsed_direction_opt = match *dir {
                "asc" => Some(SortDirection::Asc),
                "desc" => Some(SortDirection::Desc),
                _ => None,
            };
            match (parsed_field_opt, parsed_direction_opt) {
                (Some(parsed_field), Some(direction)) => {
                    state.nav.sort = SortSpec { field: parsed_field, direction };
                    state.ui.autocomplete.clear();
                    state.ui.set_status(format!("sorted by {field} {dir}"), StatusKind::Info);
                }
                _ => {
                    unrecognised(state, line);
                }
            }
            Vec::new()
        }
        [field] => {
            state.ui.autocomplete = SORT_DIRECTIONS
                .iter()
                .map(|dir| format!("sort {field} {dir}"))
                .collect();
            state.ui.set_status("usage: sort <name|sync|health> <asc|desc>", StatusKind::Warn);
            Vec::new()
        }
        _ => {
            state.ui.autocomplete =
                SORT_FIELDS.iter().map(|field| format!("sort {field}")).collect();
            state.ui.set_status("usage: sort <name|sync|health> <asc|desc>", StatusKind::Warn);
            Vec::new()
        }
    }
}

fn required_arg(
    state: &mut AppState,
    line: &str,
    args: &[&str],
    handler: impl FnOnce(&mut AppState, &str) -> Vec<Intent>,
) -> Vec<Intent> {
    match args.first().copied() {
        Some(arg) => handler(state, arg),
        None => unrecognised(state, line),
    }
}

/// §4.10: unknown/invalid commands leave the buffer intact for
/// correction and change no state outside the UI.
fn unrecognised(state: &mut AppState, line: &str) -> Vec<Intent> {
    state.ui.command_buffer = line.to_string();
    state.ui.mode = Mode::Command;
    state.ui.set_status(UNKNOWN_COMMAND, StatusKind::Warn);
    Vec::new()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
