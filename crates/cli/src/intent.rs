// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side-effect intents the reducer emits (§4.9, §5, §9 "cyclic
//! UI↔IO coupling is resolved by messages"). The reducer never calls
//! the API directly; a dispatcher translates intents into cancellable
//! tasks whose results come back as [`crate::message::Message`]s.

use argonaut_core::Scope;

use crate::state::modal::SyncTargets;

/// A scoped watch request, tagged with the generation it was started
/// under (§4.9 rule 1, §5 WatchApps).
#[derive(Debug, Clone)]
pub struct WatchSpec {
    pub generation: u64,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub enum Intent {
    /// Start (or restart) the apps watch for the current context and
    /// scope (§4.8 scoped-watch rule, §5 WatchApps).
    StartAppsWatch(WatchSpec),
    /// Restart the apps watch in response to a scope change (drilling
    /// into or out of a project) rather than a context switch. Debounced
    /// 500 ms so flipping through projects quickly coalesces into a
    /// single restart (§4.8).
    RestartScopedWatch(WatchSpec),
    /// Cancel all tasks tagged with a generation below the current one
    /// (§4.9 rule 1, §5 Cancellation & timeouts).
    CancelStaleTasks { below_generation: u64 },
    /// Open the resource tree watch for `app_name` (§5 WatchTree).
    StartTreeWatch { generation: u64, app_name: String },
    StopTreeWatch,
    /// One-shot operations (§4.4, §5 OneShot).
    Sync { generation: u64, targets: SyncTargets, prune: bool },
    Refresh { generation: u64, app_name: String, hard: bool },
    Rollback { generation: u64, app_name: String, revision_id: i64 },
    Delete { generation: u64, app_name: String, cascade: bool, propagation_policy: String },
    FetchDiff { generation: u64, app_name: String },
    FetchRollbackHistory { generation: u64, app_name: String },
    /// Hand the terminal to the configured diff pager with `diff_text`
    /// on its stdin (§4.10 `diff`, §4.11 handoff).
    SpawnDiffPager { app_name: String, diff_text: String },
    /// Open the session log viewer overlay, reading back the current
    /// session's own log (§4.10 `logs`, §4.12).
    OpenLogViewer,
    /// Switch to a named context (§4.10 `context [name]`). Resolving the
    /// name against the loaded ArgoCD config and allocating the fresh
    /// generation both happen in the dispatcher, since the reducer has
    /// no access to config and no other intent needs a name lookup.
    SwitchContext { context_name: String },
    /// Spawn the external viewer on a controlled TTY (§4.11, C12).
    SpawnExternalViewer { app_name: String },
    /// Render a status line message without contacting the server.
    ShowStatus { message: String },
    /// `Ctrl-C` outside any overlay: exit the event loop (§6 exit codes).
    Quit,
}
