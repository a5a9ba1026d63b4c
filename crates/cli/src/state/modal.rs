// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Modal sub-state (§3): the active modal variant and its payload.

/// A sync target is either the highlighted app or a multi-selection
/// (§4.9 rule 5 — "UI modal names all targets").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTargets {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    ConfirmSync {
        targets: SyncTargets,
    },
    /// Delete confirmation requires the app name typed verbatim (§4.9
    /// rule 6, §8 scenario 5).
    ConfirmDelete {
        app_name: String,
        typed: String,
    },
    RollbackPicker {
        app_name: String,
        history: Vec<RollbackEntry>,
        cursor: usize,
    },
    ThemePicker {
        themes: Vec<String>,
        cursor: usize,
    },
    ContextPicker {
        contexts: Vec<String>,
        cursor: usize,
    },
    Error {
        message: String,
    },
    NoDiff {
        app_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackEntry {
    pub id: i64,
    pub revision: String,
    pub deployed_at: String,
}

impl Modal {
    pub fn confirm_delete(app_name: impl Into<String>) -> Self {
        Self::ConfirmDelete { app_name: app_name.into(), typed: String::new() }
    }

    /// `demo` matches only when the typed buffer equals the app name
    /// verbatim (§4.9 rule 6).
    pub fn delete_confirmed(&self) -> bool {
        matches!(self, Self::ConfirmDelete { app_name, typed } if app_name == typed)
    }

    /// Backspace clears one character from the typed buffer (§4.9 rule 6).
    pub fn push_delete_char(&mut self, c: char) {
        if let Self::ConfirmDelete { typed, .. } = self {
            typed.push(c);
        }
    }

    pub fn backspace_delete_char(&mut self) {
        if let Self::ConfirmDelete { typed, .. } = self {
            typed.pop();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub active: Option<Modal>,
}

impl ModalState {
    pub fn open(&mut self, modal: Modal) {
        self.active = Some(modal);
    }

    /// `q`/`Esc` closes any open overlay without side effects (§4.9).
    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
#[path = "modal_tests.rs"]
mod tests;
