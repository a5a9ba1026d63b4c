// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI sub-state (§3, §4.9): the interaction mode, the command/search
//! capture buffers, and the status line.

/// Interaction mode (§3 UI state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Loading,
    Search,
    Command,
    Help,
    ConfirmSync,
    Rollback,
    RollbackConfirm,
    RollbackProgress,
    External,
    ResourceTree,
    LogViewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub command_buffer: String,
    pub search_buffer: String,
    pub status: Option<(String, StatusKind)>,
    pub autocomplete: Vec<String>,
    /// The active theme name, set by `:theme` (§6 persisted state `theme`
    /// key); rendering it is an external collaborator's concern.
    pub theme: Option<String>,
    /// Lines of the session log viewer overlay (§4.10 `logs`, §4.12).
    pub log_lines: Vec<String>,
    /// Saved mode/buffers so `Escape` restores the prior state verbatim
    /// (§8 round-trip property) instead of always falling back to Normal.
    saved: Option<(Mode, String, String)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
            search_buffer: String::new(),
            status: None,
            autocomplete: Vec::new(),
            theme: None,
            log_lines: Vec::new(),
            saved: None,
        }
    }
}

impl UiState {
    pub fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Some((message.into(), kind));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Enter Command mode, remembering prior state for `Escape` (§4.10).
    pub fn enter_command(&mut self) {
        self.saved = Some((self.mode, self.command_buffer.clone(), self.search_buffer.clone()));
        self.mode = Mode::Command;
        self.command_buffer.clear();
    }

    /// Enter Search mode (`/`), remembering prior state (§4.10).
    pub fn enter_search(&mut self) {
        self.saved = Some((self.mode, self.command_buffer.clone(), self.search_buffer.clone()));
        self.mode = Mode::Search;
        self.search_buffer.clear();
    }

    /// `Escape` cancels Search/Command without executing, restoring the
    /// prior state verbatim (§4.9 rule 3, §8).
    pub fn escape(&mut self) -> bool {
        match self.saved.take() {
            Some((mode, command_buffer, search_buffer)) => {
                self.mode = mode;
                self.command_buffer = command_buffer;
                self.search_buffer = search_buffer;
                true
            }
            None => false,
        }
    }

    pub fn commit_command(&mut self) -> String {
        self.saved = None;
        let cmd = std::mem::take(&mut self.command_buffer);
        self.mode = Mode::Normal;
        cmd
    }

    pub fn commit_search(&mut self) -> String {
        self.saved = None;
        self.mode = Mode::Normal;
        self.search_buffer.clone()
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
