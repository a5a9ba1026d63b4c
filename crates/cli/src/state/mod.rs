// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level application state composing the navigation, selection,
//! UI, modal, and server sub-states (§3, §4.9).

pub mod modal;
pub mod navigation;
pub mod selection;
pub mod server;
pub mod ui;

pub use modal::{Modal, ModalState, RollbackEntry, SyncTargets};
pub use navigation::{NavigationState, View};
pub use selection::SelectionState;
pub use server::ServerState;
pub use ui::{Mode, StatusKind, UiState};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub nav: NavigationState,
    pub selection: SelectionState,
    pub ui: UiState,
    pub modal: ModalState,
    pub server: ServerState,
}

impl AppState {
    /// Entering a view resets that view's selection (§3 Selection state).
    pub fn enter_view(&mut self, view: View) {
        self.selection.clear(view);
    }

    /// §4.7: an app disappearing from the store clears any selection
    /// that referenced it across every view.
    pub fn forget_app(&mut self, app_name: &str) {
        self.selection.remove_id_everywhere(app_name);
    }
}
