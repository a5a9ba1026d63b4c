// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Apps Store (C7, §4.7): the canonical in-memory application set, kept
//! under a monotonic resource-version guard so replayed or out-of-order
//! watch events never move the store backwards.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::App;

type DeletionCallback = Box<dyn Fn(&str, &str) + Send + Sync>;

/// One state transition the store can apply (§4.7).
#[derive(Debug, Clone)]
pub enum StoreEvent {
    AppsLoaded { apps: Vec<App>, resource_version: String },
    AppUpdated { app: App, resource_version: Option<String> },
    AppDeleted { namespace: String, name: String, resource_version: Option<String> },
}

/// Canonical `Map<(namespace,name), App>` plus its resource-version bound.
pub struct AppsStore {
    apps: Mutex<HashMap<(String, String), App>>,
    resource_version: Mutex<Option<String>>,
    on_deleted: Mutex<Vec<DeletionCallback>>,
}

impl Default for AppsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppsStore {
    pub fn new() -> Self {
        Self { apps: Mutex::new(HashMap::new()), resource_version: Mutex::new(None), on_deleted: Mutex::new(Vec::new()) }
    }

    /// Notified after `app-deleted` is applied, so C9 can clear any
    /// selection referencing the removed app (§4.7).
    pub fn on_deleted(&self, callback: impl Fn(&str, &str) + Send + Sync + 'static) {
        self.on_deleted.lock().unwrap_or_else(|e| e.into_inner()).push(Box::new(callback));
    }

    /// Clear the store ahead of a context switch's initial list (§4.7:
    /// "cleared before the new server's initial list completes").
    pub fn clear(&self) {
        *self.apps.lock().unwrap_or_else(|e| e.into_inner()) = HashMap::new();
        *self.resource_version.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn resource_version(&self) -> Option<String> {
        self.resource_version.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.apps.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<App> {
        self.apps.lock().unwrap_or_else(|e| e.into_inner()).get(&(namespace.to_string(), name.to_string())).cloned()
    }

    pub fn all(&self) -> Vec<App> {
        self.apps.lock().unwrap_or_else(|e| e.into_inner()).values().cloned().collect()
    }

    /// Apply one event. Returns `true` if the store changed, `false` if
    /// the event was discarded by the resource-version guard — applying
    /// the same event twice is always a no-op the second time (§8).
    pub fn apply(&self, event: StoreEvent) -> bool {
        match event {
            StoreEvent::AppsLoaded { apps, resource_version } => {
                let mut store = self.apps.lock().unwrap_or_else(|e| e.into_inner());
                let mut rv = self.resource_version.lock().unwrap_or_else(|e| e.into_inner());
                *store = apps.into_iter().map(|app| (app.id(), app)).collect();
                *rv = Some(resource_version);
                true
            }
            StoreEvent::AppUpdated { app, resource_version } => {
                if !self.admit_resource_version(resource_version.as_deref()) {
                    return false;
                }
                let mut store = self.apps.lock().unwrap_or_else(|e| e.into_inner());
                let key = app.id();
                let changed = store.get(&key) != Some(&app);
                store.insert(key, app);
                changed
            }
            StoreEvent::AppDeleted { namespace, name, resource_version } => {
                if !self.admit_resource_version(resource_version.as_deref()) {
                    return false;
                }
                let removed = {
                    let mut store = self.apps.lock().unwrap_or_else(|e| e.into_inner());
                    store.remove(&(namespace.clone(), name.clone())).is_some()
                };
                if removed {
                    for callback in self.on_deleted.lock().unwrap_or_else(|e| e.into_inner()).iter() {
                        callback(&namespace, &name);
                    }
                }
                removed
            }
        }
    }

    /// §4.7: "events carrying an older resourceVersion than the current
    /// bound are discarded." No bound yet, or no rv on the event, always
    /// admits (the initial list establishes the first bound).
    fn admit_resource_version(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate else { return true };
        let mut bound = self.resource_version.lock().unwrap_or_else(|e| e.into_inner());
        match bound.as_deref() {
            None => {
                *bound = Some(candidate.to_string());
                true
            }
            Some(current) if rv_ge(candidate, current) => {
                *bound = Some(candidate.to_string());
                true
            }
            Some(_) => false,
        }
    }
}

/// ArgoCD resource versions are opaque strings that are numeric in
/// practice; compare numerically when both parse, else lexicographically.
fn rv_ge(candidate: &str, current: &str) -> bool {
    match (candidate.parse::<u64>(), current.parse::<u64>()) {
        (Ok(c), Ok(b)) => c >= b,
        _ => candidate >= current,
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
