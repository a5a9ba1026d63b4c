// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::model::{HealthStatus, SyncStatus};

use super::*;

fn app(name: &str) -> App {
    App {
        name: name.to_string(),
        namespace: "argocd".to_string(),
        project: "default".to_string(),
        sync_status: SyncStatus::Synced,
        health_status: HealthStatus::Healthy,
        destination_cluster_name: None,
        destination_cluster_server: None,
        destination_namespace: String::new(),
        owner_app_set: None,
        last_sync_at: None,
    }
}

#[test]
fn apps_loaded_replaces_set_and_sets_bound() {
    let store = AppsStore::new();
    store.apply(StoreEvent::AppsLoaded { apps: vec![app("a"), app("b")], resource_version: "10".to_string() });
    assert_eq!(store.len(), 2);
    assert_eq!(store.resource_version().as_deref(), Some("10"));
}

#[test]
fn apply_is_idempotent_for_update() {
    let store = AppsStore::new();
    let event = StoreEvent::AppUpdated { app: app("a"), resource_version: Some("5".to_string()) };
    let first = store.apply(event.clone());
    let second = store.apply(event);
    assert!(first);
    assert!(!second);
    assert_eq!(store.len(), 1);
}

#[test]
fn older_resource_version_is_discarded() {
    let store = AppsStore::new();
    store.apply(StoreEvent::AppUpdated { app: app("a"), resource_version: Some("10".to_string()) });
    let applied = store.apply(StoreEvent::AppUpdated { app: app("a"), resource_version: Some("3".to_string()) });
    assert!(!applied);
}

#[test]
fn delete_removes_and_notifies_callback() {
    let store = AppsStore::new();
    store.apply(StoreEvent::AppUpdated { app: app("a"), resource_version: Some("1".to_string()) });

    let notified = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&notified);
    store.on_deleted(move |_ns, _name| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let removed = store.apply(StoreEvent::AppDeleted {
        namespace: "argocd".to_string(),
        name: "a".to_string(),
        resource_version: Some("2".to_string()),
    });
    assert!(removed);
    assert_eq!(store.len(), 0);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[test]
fn delete_is_idempotent() {
    let store = AppsStore::new();
    store.apply(StoreEvent::AppUpdated { app: app("a"), resource_version: Some("1".to_string()) });
    let event = StoreEvent::AppDeleted {
        namespace: "argocd".to_string(),
        name: "a".to_string(),
        resource_version: Some("2".to_string()),
    };
    let first = store.apply(event.clone());
    let second = store.apply(event);
    assert!(first);
    assert!(!second);
}

#[test]
fn clear_resets_store_and_bound() {
    let store = AppsStore::new();
    store.apply(StoreEvent::AppsLoaded { apps: vec![app("a")], resource_version: "10".to_string() });
    store.clear();
    assert_eq!(store.len(), 0);
    assert_eq!(store.resource_version(), None);
}
