// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Degradation Manager (C6, §4.6). Aggregates component health reports
//! from C4/C5 into a coarse operation-gating mode and serves a
//! read-only cache fallback while offline.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::ArgoError;
use crate::model::App;

/// Cache is a read-only fallback for a bounded window (§4.6).
const CACHE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// The three inputs watched for degradation (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    ArgoApi,
    Auth,
    Connectivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentHealthStatus {
    Healthy,
    Degraded,
    Unavailable,
    Unknown,
}

#[derive(Debug, Clone)]
struct ComponentHealthRecord {
    status: ComponentHealthStatus,
    last_seen: Instant,
    failures: u32,
}

impl Default for ComponentHealthRecord {
    fn default() -> Self {
        Self { status: ComponentHealthStatus::Unknown, last_seen: Instant::now(), failures: 0 }
    }
}

/// Coarse operation-gating mode derived from component health (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    None,
    Partial,
    ReadOnly,
    Offline,
}

/// The operation categories C6 gates (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    GetDiffs,
    GetVersion,
    Sync,
    Refresh,
    Rollback,
    Delete,
}

impl Operation {
    fn is_read(self) -> bool {
        matches!(self, Self::List | Self::Get | Self::GetDiffs | Self::GetVersion)
    }
}

#[derive(Debug, Clone)]
struct ListCache {
    apps: Vec<App>,
    server: String,
    api_version: Option<String>,
    last_updated: Instant,
}

type ModeCallback = Box<dyn Fn(Mode, Mode) + Send + Sync>;

/// Aggregates health and gates operations (C6).
pub struct DegradationManager {
    components: Mutex<HashMap<Component, ComponentHealthRecord>>,
    mode: Mutex<Mode>,
    admin_force_read_only: Mutex<bool>,
    cache: Mutex<Option<ListCache>>,
    callbacks: Mutex<Vec<ModeCallback>>,
}

impl Default for DegradationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationManager {
    pub fn new() -> Self {
        Self {
            components: Mutex::new(HashMap::new()),
            mode: Mutex::new(Mode::None),
            admin_force_read_only: Mutex::new(false),
            cache: Mutex::new(None),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn on_mode_change(&self, callback: impl Fn(Mode, Mode) + Send + Sync + 'static) {
        self.callbacks.lock().unwrap_or_else(|e| e.into_inner()).push(Box::new(callback));
    }

    pub fn set_admin_force_read_only(&self, forced: bool) {
        *self.admin_force_read_only.lock().unwrap_or_else(|e| e.into_inner()) = forced;
        self.recompute();
    }

    /// Record a health report for `component` (§4.6 input).
    pub fn report_health(&self, component: Component, healthy: bool, error: Option<&ArgoError>) {
        let status = if healthy {
            ComponentHealthStatus::Healthy
        } else if error.is_some_and(|e| e.triggers_stream_recovery()) {
            ComponentHealthStatus::Degraded
        } else {
            ComponentHealthStatus::Unavailable
        };

        let mut components = self.components.lock().unwrap_or_else(|e| e.into_inner());
        let record = components.entry(component).or_default();
        if healthy {
            record.failures = 0;
        } else {
            record.failures += 1;
        }
        record.status = status;
        record.last_seen = Instant::now();
        drop(components);

        self.recompute();
    }

    fn status_of(&self, component: Component) -> ComponentHealthStatus {
        self.components
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&component)
            .map(|r| r.status)
            .unwrap_or(ComponentHealthStatus::Unknown)
    }

    fn recompute(&self) {
        use ComponentHealthStatus::*;

        let auth = self.status_of(Component::Auth);
        let connectivity = self.status_of(Component::Connectivity);
        let argo_api = self.status_of(Component::ArgoApi);
        let forced_read_only = *self.admin_force_read_only.lock().unwrap_or_else(|e| e.into_inner());

        let next = if auth == Unavailable || connectivity == Unavailable || argo_api == Unavailable {
            Mode::Offline
        } else if argo_api == Degraded {
            Mode::Partial
        } else if forced_read_only {
            Mode::ReadOnly
        } else {
            Mode::None
        };

        let mut mode = self.mode.lock().unwrap_or_else(|e| e.into_inner());
        let previous = *mode;
        if previous != next {
            *mode = next;
            drop(mode);
            for callback in self.callbacks.lock().unwrap_or_else(|e| e.into_inner()).iter() {
                callback(previous, next);
            }
        }
    }

    pub fn mode(&self) -> Mode {
        *self.mode.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// §4.6 operation gating table.
    pub fn check_operation(&self, op: Operation) -> Result<(), ArgoError> {
        match self.mode() {
            Mode::None => Ok(()),
            Mode::Partial | Mode::ReadOnly => {
                if op.is_read() {
                    Ok(())
                } else {
                    Err(ArgoError::new(crate::error::ErrorKind::Permission, "OPERATION_RESTRICTED")
                        .recoverable(true)
                        .with_hint("this action is unavailable while the connection is degraded"))
                }
            }
            Mode::Offline => {
                if op == Operation::List {
                    Ok(())
                } else {
                    Err(ArgoError::unavailable("OPERATION_RESTRICTED")
                        .with_hint("only the cached application list is available while offline"))
                }
            }
        }
    }

    /// Record the last successful `ListApplications` result as the
    /// offline fallback (§4.6). Never merged with live data.
    pub fn update_cache(&self, apps: Vec<App>, server: impl Into<String>, api_version: Option<String>) {
        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(ListCache { apps, server: server.into(), api_version, last_updated: Instant::now() });
    }

    /// Serve the cached app list while offline; fails if no cache exists
    /// or it is older than `CACHE_MAX_AGE`.
    pub fn cached_apps(&self) -> Result<Vec<App>, ArgoError> {
        self.check_operation(Operation::List)?;
        if self.mode() != Mode::Offline {
            return Err(ArgoError::internal("cached_apps called outside offline mode"));
        }
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        match cache.as_ref() {
            Some(entry) if entry.last_updated.elapsed() <= CACHE_MAX_AGE => Ok(entry.apps.clone()),
            Some(_) => Err(ArgoError::unavailable("cached application list is stale")),
            None => Err(ArgoError::unavailable("no cached application list available")),
        }
    }
}

#[cfg(test)]
#[path = "degrade_tests.rs"]
mod tests;
