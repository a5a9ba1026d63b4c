// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scope & Filter Engine (C8, §4.8): derives the visible collection for
//! the current view from the store plus the drill-down scope, search
//! term, and sort spec.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::model::{App, HealthStatus, Scope, SyncStatus};

/// Debounce window for scoped-watch restarts (§4.8).
pub const WATCH_RESTART_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Sync,
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// §4.8: `▲`/`▼` indicator.
    pub fn indicator(self) -> char {
        match self {
            Self::Asc => '▲',
            Self::Desc => '▼',
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { field: SortField::Name, direction: SortDirection::Asc }
    }
}

/// A distinct derived row (cluster, namespace, project, or app set) with
/// a display label (§4.8 point 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedItem {
    pub id: String,
    pub label: String,
}

/// Restrict `apps` to those matching every populated field of `scope`
/// (§4.8 point 1).
pub fn apps_in_scope<'a>(apps: &'a [App], scope: &Scope) -> Vec<&'a App> {
    apps.iter()
        .filter(|app| match &scope.cluster_id {
            Some(id) => app.cluster_id().as_deref() == Some(id.as_str()),
            None => true,
        })
        .filter(|app| match &scope.namespace {
            Some(ns) => &app.destination_namespace == ns,
            None => true,
        })
        .filter(|app| match &scope.project {
            Some(project) => &app.project == project,
            None => true,
        })
        .filter(|app| match &scope.app_set {
            Some(app_set) => app.owner_app_set.as_deref() == Some(app_set.as_str()),
            None => true,
        })
        .collect()
}

pub fn derive_clusters(apps: &[&App]) -> Vec<DerivedItem> {
    let mut seen = std::collections::BTreeMap::new();
    for app in apps {
        if let Some(id) = app.cluster_id() {
            seen.entry(id).or_insert_with(|| app.cluster_label().unwrap_or_default());
        }
    }
    let mut items: Vec<DerivedItem> = seen.into_iter().map(|(id, label)| DerivedItem { id, label }).collect();
    items.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    items
}

pub fn derive_namespaces(apps: &[&App]) -> Vec<DerivedItem> {
    let mut seen = std::collections::BTreeSet::new();
    for app in apps {
        if !app.destination_namespace.is_empty() {
            seen.insert(app.destination_namespace.clone());
        }
    }
    seen.into_iter().map(|ns| DerivedItem { id: ns.clone(), label: ns }).collect()
}

pub fn derive_projects(apps: &[&App]) -> Vec<DerivedItem> {
    let mut seen = std::collections::BTreeSet::new();
    for app in apps {
        seen.insert(app.project.clone());
    }
    seen.into_iter().map(|p| DerivedItem { id: p.clone(), label: p }).collect()
}

/// Only apps with an ApplicationSet owner contribute (§4.8 point 2).
pub fn derive_app_sets(apps: &[&App]) -> Vec<DerivedItem> {
    let mut seen = std::collections::BTreeSet::new();
    for app in apps {
        if let Some(app_set) = &app.owner_app_set {
            seen.insert(app_set.clone());
        }
    }
    seen.into_iter().map(|a| DerivedItem { id: a.clone(), label: a }).collect()
}

/// Case-insensitive substring search against a row's label (§4.8 point 3).
pub fn search_filter<'a, T: 'a>(items: Vec<T>, query: &str, label_of: impl Fn(&T) -> &str) -> Vec<T> {
    if query.is_empty() {
        return items;
    }
    let needle = query.to_lowercase();
    items.into_iter().filter(|item| label_of(item).to_lowercase().contains(&needle)).collect()
}

/// Stable sort with `name asc` tiebreak (§4.8 point 4).
pub fn sort_apps<'a>(mut apps: Vec<&'a App>, sort: &SortSpec) -> Vec<&'a App> {
    apps.sort_by(|a, b| {
        let primary = match sort.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Sync => sync_rank(a.sync_status).cmp(&sync_rank(b.sync_status)),
            SortField::Health => health_rank(&a.health_status).cmp(&health_rank(&b.health_status)),
        };
        let ordered = if sort.direction == SortDirection::Desc { primary.reverse() } else { primary };
        ordered.then_with(|| a.name.cmp(&b.name))
    });
    apps
}

fn sync_rank(status: SyncStatus) -> u8 {
    match status {
        SyncStatus::Synced => 0,
        SyncStatus::OutOfSync => 1,
        SyncStatus::Unknown => 2,
    }
}

fn health_rank(status: &HealthStatus) -> u8 {
    match status {
        HealthStatus::Healthy => 0,
        HealthStatus::Progressing => 1,
        HealthStatus::Degraded => 2,
        HealthStatus::Suspended => 3,
        HealthStatus::Missing => 4,
        HealthStatus::Unknown => 5,
    }
}

/// Debounces scoped-watch restarts (§4.8: "debounce watch restarts by
/// 500 ms"). Each `schedule` call cancels any pending restart from a
/// prior scope change before arming a fresh one.
pub struct WatchDebouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Default for WatchDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchDebouncer {
    pub fn new() -> Self {
        Self { delay: WATCH_RESTART_DEBOUNCE, pending: Mutex::new(None) }
    }

    #[cfg(test)]
    fn with_delay(delay: Duration) -> Self {
        Self { delay, pending: Mutex::new(None) }
    }

    pub fn schedule<F, Fut>(&self, effect: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *pending = Some(token.clone());
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => effect().await,
            }
        });
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
