// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reducer inputs (§4.9, §5): key events and the generation-tagged
//! results of asynchronous tasks. The UI reducer only ever consumes
//! values of this type from the single bounded message queue.

use argonaut_core::{App, Context, ResourceDiff, ResourceTree, RevisionHistoryEntry};

/// A terminal key event, decoupled from any particular terminal crate
/// so the reducer can be driven by tests without a real TTY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Ctrl(char),
}

/// The outcome of a one-shot operation (sync/refresh/rollback/delete),
/// tagged with the generation it was issued under (§5 OneShot).
#[derive(Debug, Clone)]
pub enum OpResult {
    Sync { app_name: String, ok: bool, error: Option<String> },
    Refresh { app_name: String, ok: bool, error: Option<String> },
    Rollback { app_name: String, ok: bool, error: Option<String> },
    Delete { app_name: String, ok: bool, error: Option<String> },
}

#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyCode),

    /// Initial snapshot from a freshly (re)started apps watch
    /// (§5 WatchApps).
    AppsLoaded { generation: u64, apps: Vec<App> },
    AppUpdated { generation: u64, app: App },
    AppDeleted { generation: u64, namespace: String, name: String },

    /// A watch stream reported it cannot authenticate (§4.3, §7).
    StreamAuthError { generation: u64 },
    /// A watch stream reported a non-auth HTTP error (§4.3, §7).
    StreamHttpError { generation: u64, code: u16, body: String },
    /// Stream connection status changed (§4.5 StreamConnection).
    StreamStatusChanged { generation: u64, stream_id: String },

    ResourceTreeLoaded { generation: u64, app_name: String, tree: ResourceTree },

    /// `:rollback`'s history fetch finished (§4.10, §4.4 GetApplication).
    RollbackHistoryLoaded { generation: u64, app_name: String, history: Vec<RevisionHistoryEntry> },
    /// `:diff`'s managed-resources fetch finished; `diffs` empty means
    /// no differences to show (§4.10, §4.4 GetManagedResources).
    DiffLoaded { generation: u64, app_name: String, diffs: Vec<ResourceDiff> },

    /// The session log viewer's records finished loading (§4.10 `logs`).
    SessionLogLoaded { lines: Vec<String> },

    /// A named context finished resolving and is ready to become current
    /// (§4.10 `context [name]`). Carries no generation of its own — the
    /// switch itself mints the next one.
    ContextSwitched { context: Context },
    ContextSwitchFailed { message: String },

    OpCompleted { generation: u64, result: OpResult },

    /// The external viewer child process exited (§4.11, C12).
    ExternalExited { exit_code: i32 },

    /// Degradation mode changed (§4.6).
    DegradationModeChanged,

    Tick,
}
