// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed ArgoCD API operations (C4, §4.4).

use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{ArgoError, ErrorContext};
use crate::model::{App, HealthStatus, ResourceNode, ResourceTree, RevisionHistoryEntry, SyncStatus};
use crate::retry::{with_retry, RetryOutcome, RetryPolicy};
use crate::transport::stream::{read_stream, StreamOutcome, StreamRecord};
use crate::transport::Transport;

use super::types::{
    ApplicationListEnvelope, ManagedResourcesEnvelope, PropagationPolicy, RefreshMode,
    RollbackRequest, SyncOptions,
};

/// Default mutation timeout (§4.4: "default 60 s"), distinct from the
/// per-request read timeout carried on `Server.request_timeout`.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of `ListApplications`: the apps plus the resource-version
/// cursor C7 uses to discard stale events (§4.7).
#[derive(Debug, Clone)]
pub struct AppList {
    pub apps: Vec<App>,
    pub resource_version: String,
}

/// Typed client over one ArgoCD server (§4.4).
pub struct ArgoApiService {
    transport: Transport,
    server_label: String,
    retry_policy: RetryPolicy,
    sync_timeout: Duration,
    cached_version: OnceLock<String>,
}

impl ArgoApiService {
    pub fn new(transport: Transport, server_label: impl Into<String>) -> Self {
        Self {
            transport,
            server_label: server_label.into(),
            retry_policy: RetryPolicy::api_default(),
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            cached_version: OnceLock::new(),
        }
    }

    fn ctx(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_server(self.server_label.clone())
    }

    /// Read operations run under C2's retry policy; mutations never do
    /// (§4.4: "NOT retried automatically").
    async fn read_with_retry<T, F, Fut>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        op: F,
    ) -> Result<T, ArgoError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ArgoError>>,
    {
        match with_retry(&self.retry_policy, cancel, op).await {
            RetryOutcome::Succeeded { value, .. } => Ok(value),
            RetryOutcome::Cancelled { .. } => {
                Err(ArgoError::internal("operation cancelled").with_context(self.ctx(operation)))
            }
            RetryOutcome::ExhaustedOrFatal { error, .. } => {
                Err(error.with_context(self.ctx(operation)))
            }
        }
    }

    pub async fn list_applications(&self, cancel: &CancellationToken) -> Result<AppList, ArgoError> {
        self.read_with_retry("ListApplications", cancel, || async {
            let bytes = self.transport.get("/api/v1/applications").await?;
            let envelope: ApplicationListEnvelope =
                serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
            let apps = envelope.items.iter().filter_map(app_from_json).collect();
            Ok(AppList { apps, resource_version: envelope.metadata.resource_version })
        })
        .await
    }

    /// `WatchApplications(projects?, resourceVersion?)` — spawns a task
    /// reading the stream and forwarding [`StreamRecord`]s; returns the
    /// join handle and receiver so the caller (C5) can own cancellation
    /// and generation tagging.
    pub fn watch_applications(
        self: &Arc<Self>,
        projects: &[String],
        resource_version: Option<&str>,
        cancel: CancellationToken,
    ) -> (tokio::task::JoinHandle<StreamOutcome>, mpsc::Receiver<StreamRecord>) {
        let mut path = String::from("/api/v1/stream/applications?");
        for project in projects {
            path.push_str("projects=");
            path.push_str(project);
            path.push('&');
        }
        if let Some(rv) = resource_version {
            path.push_str("resourceVersion=");
            path.push_str(rv);
        }

        let (tx, rx) = mpsc::channel(crate::transport::stream::STREAM_CHANNEL_CAPACITY);
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_watch(&path, tx, cancel).await });
        (handle, rx)
    }

    async fn run_watch(
        &self,
        path: &str,
        tx: mpsc::Sender<StreamRecord>,
        cancel: CancellationToken,
    ) -> StreamOutcome {
        // `Transport::stream` already classifies a non-2xx response into an
        // `ArgoError` before returning; a pre-stream HTTP failure never
        // reaches `read_stream` here.
        let response = match self.transport.stream(path).await {
            Ok(r) => r,
            Err(e) if e.kind == crate::error::ErrorKind::Auth => return StreamOutcome::AuthError,
            Err(ArgoError { kind: crate::error::ErrorKind::Http(code), message, .. }) => {
                return StreamOutcome::HttpError { code, body: message };
            }
            Err(e) => return StreamOutcome::Broken(e),
        };
        read_stream(response, tx, cancel).await
    }

    pub async fn get_application(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<App, ArgoError> {
        self.read_with_retry("GetApplication", cancel, || async {
            let bytes = self.transport.get(&format!("/api/v1/applications/{name}")).await?;
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
            app_from_json(&value).ok_or_else(|| ArgoError::parse("unrecognized application payload"))
        })
        .await
    }

    /// The application's deployment history, newest first, as reported
    /// under `status.history[]` (§4.4, backs the `rollback` picker).
    pub async fn get_revision_history(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RevisionHistoryEntry>, ArgoError> {
        self.read_with_retry("GetApplication", cancel, || async {
            let bytes = self.transport.get(&format!("/api/v1/applications/{name}")).await?;
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
            Ok(history_from_json(&value))
        })
        .await
    }

    pub async fn sync_application(
        &self,
        name: &str,
        opts: &SyncOptions,
        cancel: &CancellationToken,
    ) -> Result<(), ArgoError> {
        let _ = cancel;
        self.transport
            .post(&format!("/api/v1/applications/{name}/sync"), opts, self.sync_timeout)
            .await
            .map(|_| ())
            .map_err(|e| e.with_context(self.ctx("SyncApplication").with_app(name)))
    }

    pub async fn refresh(
        &self,
        name: &str,
        mode: RefreshMode,
        cancel: &CancellationToken,
    ) -> Result<App, ArgoError> {
        self.read_with_retry("Refresh", cancel, || async {
            let path = format!("/api/v1/applications/{name}?refresh={}", mode.as_query_value());
            let bytes = self.transport.get(&path).await?;
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
            app_from_json(&value).ok_or_else(|| ArgoError::parse("unrecognized application payload"))
        })
        .await
    }

    pub async fn rollback_application(
        &self,
        name: &str,
        req: &RollbackRequest,
        cancel: &CancellationToken,
    ) -> Result<(), ArgoError> {
        let _ = cancel;
        self.transport
            .post(&format!("/api/v1/applications/{name}/rollback"), req, self.sync_timeout)
            .await
            .map(|_| ())
            .map_err(|e| e.with_context(self.ctx("RollbackApplication").with_app(name)))
    }

    pub async fn delete_application(
        &self,
        name: &str,
        cascade: bool,
        propagation_policy: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ArgoError> {
        let _ = cancel;
        let policy = PropagationPolicy::parse(propagation_policy)
            .map_err(|e| e.with_context(self.ctx("DeleteApplication").with_app(name)))?;
        let path = format!(
            "/api/v1/applications/{name}?cascade={cascade}&propagationPolicy={}",
            policy.as_query_value()
        );
        self.transport
            .delete(&path, self.sync_timeout)
            .await
            .map(|_| ())
            .map_err(|e| e.with_context(self.ctx("DeleteApplication").with_app(name)))
    }

    pub async fn get_managed_resources(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<crate::model::ResourceDiff>, ArgoError> {
        self.read_with_retry("GetManagedResources", cancel, || async {
            let bytes =
                self.transport.get(&format!("/api/v1/applications/{name}/managed-resources")).await?;
            let envelope: ManagedResourcesEnvelope =
                serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
            Ok(envelope.items.into_iter().map(|item| item.into_diff()).collect())
        })
        .await
    }

    pub async fn get_resource_tree(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<ResourceTree, ArgoError> {
        self.read_with_retry("GetResourceTree", cancel, || async {
            let bytes = self.transport.get(&format!("/api/v1/applications/{name}/resource-tree")).await?;
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
            resource_tree_from_json(&value)
        })
        .await
    }

    pub fn watch_resource_tree(
        self: &Arc<Self>,
        name: &str,
        cancel: CancellationToken,
    ) -> (tokio::task::JoinHandle<StreamOutcome>, mpsc::Receiver<StreamRecord>) {
        let path = format!("/api/v1/applications/{name}/resource-tree?watch=true");
        let (tx, rx) = mpsc::channel(crate::transport::stream::STREAM_CHANNEL_CAPACITY);
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_watch(&path, tx, cancel).await });
        (handle, rx)
    }

    /// Version probing is issued once per context activation and cached
    /// for that context's lifetime (§4.4).
    pub async fn get_api_version(&self, cancel: &CancellationToken) -> Result<String, ArgoError> {
        if let Some(cached) = self.cached_version.get() {
            return Ok(cached.clone());
        }
        let version = self.read_with_retry("GetAPIVersion", cancel, || self.transport.version()).await?;
        let _ = self.cached_version.set(version.clone());
        Ok(version)
    }
}

/// One decoded watch-stream event, narrowed from a raw [`StreamRecord`]
/// (§4.4 WatchApplications, §5 WatchApps message translation).
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Added(App),
    Modified(App),
    Deleted { namespace: String, name: String },
}

/// Narrow a raw watch [`StreamRecord`] into a [`WatchEvent`]. ArgoCD
/// frames each event as `{type, application}`; `DELETED` events carry
/// the application's last known state, which is enough to recover its
/// identity even without a dedicated tombstone payload.
pub fn parse_watch_event(record: &StreamRecord) -> Option<WatchEvent> {
    let application = record.payload.get("application").unwrap_or(&record.payload);
    match record.result_type.as_str() {
        "DELETED" => {
            let metadata = application.get("metadata")?;
            let name = metadata.get("name")?.as_str()?.to_string();
            let namespace =
                metadata.get("namespace").and_then(|v| v.as_str()).unwrap_or("argocd").to_string();
            Some(WatchEvent::Deleted { namespace, name })
        }
        "MODIFIED" => app_from_json(application).map(WatchEvent::Modified),
        _ => app_from_json(application).map(WatchEvent::Added),
    }
}

fn app_from_json(value: &serde_json::Value) -> Option<App> {
    let metadata = value.get("metadata")?;
    let spec = value.get("spec")?;
    let status = value.get("status");

    let name = metadata.get("name")?.as_str()?.to_string();
    let namespace = metadata.get("namespace").and_then(|v| v.as_str()).unwrap_or("argocd").to_string();
    let project = spec.get("project").and_then(|v| v.as_str()).unwrap_or("default").to_string();

    let destination = spec.get("destination");
    let destination_cluster_name =
        destination.and_then(|d| d.get("name")).and_then(|v| v.as_str()).map(str::to_string);
    let destination_cluster_server =
        destination.and_then(|d| d.get("server")).and_then(|v| v.as_str()).map(str::to_string);
    let destination_namespace = destination
        .and_then(|d| d.get("namespace"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let sync_status = status
        .and_then(|s| s.get("sync"))
        .and_then(|s| s.get("status"))
        .and_then(|v| v.as_str())
        .map(parse_sync_status)
        .unwrap_or(SyncStatus::Unknown);

    let health_status = status
        .and_then(|s| s.get("health"))
        .and_then(|h| h.get("status"))
        .and_then(|v| v.as_str())
        .map(parse_health_status)
        .unwrap_or(HealthStatus::Unknown);

    let owner_app_set = metadata
        .get("ownerReferences")
        .and_then(|refs| refs.as_array())
        .and_then(|refs| refs.iter().find(|r| r.get("kind").and_then(|k| k.as_str()) == Some("ApplicationSet")))
        .and_then(|r| r.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let last_sync_at = status
        .and_then(|s| s.get("operationState"))
        .and_then(|o| o.get("finishedAt"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Some(App {
        name,
        namespace,
        project,
        sync_status,
        health_status,
        destination_cluster_name,
        destination_cluster_server,
        destination_namespace,
        owner_app_set,
        last_sync_at,
    })
}

/// ArgoCD lists `status.history[]` oldest first; the picker wants the
/// most recent deployment on top.
fn history_from_json(value: &serde_json::Value) -> Vec<RevisionHistoryEntry> {
    let entries = value.get("status").and_then(|s| s.get("history")).and_then(|h| h.as_array());
    let Some(entries) = entries else { return Vec::new() };

    let mut history: Vec<RevisionHistoryEntry> = entries
        .iter()
        .filter_map(|entry| {
            Some(RevisionHistoryEntry {
                id: entry.get("id")?.as_i64()?,
                revision: entry.get("revision")?.as_str()?.to_string(),
                deployed_at: entry.get("deployedAt").and_then(|v| v.as_str()).map(str::to_string),
            })
        })
        .collect();
    history.reverse();
    history
}

fn parse_sync_status(raw: &str) -> SyncStatus {
    match raw {
        "Synced" => SyncStatus::Synced,
        "OutOfSync" => SyncStatus::OutOfSync,
        _ => SyncStatus::Unknown,
    }
}

fn parse_health_status(raw: &str) -> HealthStatus {
    match raw {
        "Healthy" => HealthStatus::Healthy,
        "Progressing" => HealthStatus::Progressing,
        "Degraded" => HealthStatus::Degraded,
        "Suspended" => HealthStatus::Suspended,
        "Missing" => HealthStatus::Missing,
        _ => HealthStatus::Unknown,
    }
}

fn resource_tree_from_json(value: &serde_json::Value) -> Result<ResourceTree, ArgoError> {
    let nodes = value
        .get("nodes")
        .and_then(|n| n.as_array())
        .ok_or_else(|| ArgoError::parse("resource tree response missing nodes[]"))?;

    let nodes = nodes
        .iter()
        .map(|n| {
            let parent_refs = n
                .get("parentRefs")
                .and_then(|p| p.as_array())
                .map(|refs| {
                    refs.iter()
                        .filter_map(|r| {
                            Some(crate::model::ParentRef {
                                uid: r.get("uid")?.as_str()?.to_string(),
                                kind: r.get("kind")?.as_str()?.to_string(),
                                name: r.get("name")?.as_str()?.to_string(),
                                namespace: r
                                    .get("namespace")
                                    .and_then(|v| v.as_str())
                                    .unwrap_or_default()
                                    .to_string(),
                                group: r.get("group").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                                version: r.get("version").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            Ok(ResourceNode {
                kind: field_str(n, "kind")?,
                name: field_str(n, "name")?,
                namespace: n.get("namespace").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                group: n.get("group").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                version: n.get("version").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                uid: field_str(n, "uid")?,
                status: n.get("status").and_then(|v| v.as_str()).map(str::to_string),
                health: n
                    .get("health")
                    .and_then(|h| h.get("status"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                parent_refs,
            })
        })
        .collect::<Result<Vec<_>, ArgoError>>()?;

    Ok(ResourceTree { nodes })
}

fn field_str(value: &serde_json::Value, field: &str) -> Result<String, ArgoError> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ArgoError::parse(format!("resource node missing field `{field}`")))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
