// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Navigation sub-state (§4.9): view, drill-down scope, cursor, and
//! scroll offset, plus the cursor-containment invariant (§3, §8).

use argonaut_core::scope::SortSpec;
use argonaut_core::Scope;

/// The four-level drill-down hierarchy plus the resource tree (§2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Clusters,
    Namespaces,
    Projects,
    Apps,
    ResourceTree,
}

impl View {
    /// The view one descends into from here (§4.9 rule 4).
    pub fn child(self) -> Option<View> {
        match self {
            Self::Clusters => Some(Self::Namespaces),
            Self::Namespaces => Some(Self::Projects),
            Self::Projects => Some(Self::Apps),
            Self::Apps => Some(Self::ResourceTree),
            Self::ResourceTree => None,
        }
    }

    pub fn parent(self) -> Option<View> {
        match self {
            Self::Clusters => None,
            Self::Namespaces => Some(Self::Clusters),
            Self::Projects => Some(Self::Namespaces),
            Self::Apps => Some(Self::Projects),
            Self::ResourceTree => Some(Self::Apps),
        }
    }
}

/// A single level's cursor/scroll, preserved so `Esc` from a drilled-in
/// view restores the ancestor's exact cursor (§8 round-trip property).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ViewPosition {
    cursor: usize,
    scroll_offset: usize,
}

/// Navigation state: current view, scope, and per-level cursor stack.
#[derive(Debug, Clone)]
pub struct NavigationState {
    pub view: View,
    pub scope: Scope,
    pub cursor: usize,
    pub scroll_offset: usize,
    /// The application whose resource tree is currently open, if any.
    pub current_app: Option<String>,
    /// Active sort for the Apps view (§4.8 point 4); unaffected by drill-down.
    pub sort: SortSpec,
    ancestry: Vec<(View, Scope, Option<String>, ViewPosition)>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            view: View::Clusters,
            scope: Scope::default(),
            cursor: 0,
            scroll_offset: 0,
            current_app: None,
            sort: SortSpec::default(),
            ancestry: Vec::new(),
        }
    }
}

impl NavigationState {
    /// Descend into the child view, recording the selected id into scope
    /// and resetting the cursor (§4.9 rule 4: "in a non-leaf view").
    /// A no-op from `Apps` — opening an app's resource tree goes through
    /// [`Self::open_resource_tree`] instead, since it carries an app
    /// name rather than a scope segment.
    pub fn descend(&mut self, selected_id: &str) {
        if matches!(self.view, View::Apps | View::ResourceTree) {
            return;
        }
        let Some(child) = self.view.child() else { return };
        self.push_ancestry();

        match self.view {
            View::Clusters => self.scope.cluster_id = Some(selected_id.to_string()),
            View::Namespaces => self.scope.namespace = Some(selected_id.to_string()),
            View::Projects => self.scope.project = Some(selected_id.to_string()),
            View::Apps | View::ResourceTree => unreachable!("handled above"),
        }

        self.view = child;
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// `Enter` on the highlighted app opens its resource tree (§4.9 rule 4).
    pub fn open_resource_tree(&mut self, app_name: &str) {
        self.push_ancestry();
        self.current_app = Some(app_name.to_string());
        self.view = View::ResourceTree;
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    fn push_ancestry(&mut self) {
        self.ancestry.push((
            self.view,
            self.scope.clone(),
            self.current_app.clone(),
            ViewPosition { cursor: self.cursor, scroll_offset: self.scroll_offset },
        ));
    }

    /// `Esc` from a non-root view returns to the ancestor with its
    /// original cursor restored verbatim (§8).
    pub fn ascend(&mut self) -> bool {
        let Some((view, scope, current_app, position)) = self.ancestry.pop() else { return false };
        self.view = view;
        self.scope = scope;
        self.current_app = current_app;
        self.cursor = position.cursor;
        self.scroll_offset = position.scroll_offset;
        true
    }

    pub fn jump_to(&mut self, view: View, scope: Scope) {
        self.ancestry.clear();
        self.view = view;
        self.scope = scope;
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Enforce `0 ≤ cursor < max(1,len)` and
    /// `cursor − scrollOffset ∈ [0, viewportHeight)` (§3 invariants, §8).
    pub fn contain_cursor(&mut self, len: usize, viewport_height: usize) {
        let max_cursor = len.saturating_sub(1);
        if self.cursor > max_cursor {
            self.cursor = max_cursor;
        }
        if viewport_height == 0 {
            self.scroll_offset = 0;
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor + 1 - viewport_height;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.max(0) as usize;
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_bottom(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
