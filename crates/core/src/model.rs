// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire/domain data model (§3).

use serde::{Deserialize, Serialize};

/// Sync status of an [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SyncStatus {
    Synced,
    OutOfSync,
    Unknown,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Health status of an [`App`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Progressing,
    Degraded,
    Suspended,
    Missing,
    Unknown,
}

/// An ArgoCD Application, identity `(namespace, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub namespace: String,
    pub project: String,
    pub sync_status: SyncStatus,
    pub health_status: HealthStatus,
    pub destination_cluster_name: Option<String>,
    pub destination_cluster_server: Option<String>,
    pub destination_namespace: String,
    pub owner_app_set: Option<String>,
    pub last_sync_at: Option<String>,
}

impl App {
    pub fn id(&self) -> (String, String) {
        (self.namespace.clone(), self.name.clone())
    }

    /// Cluster identity: prefer the destination cluster name, fall back to
    /// the server URL (§3 Cluster).
    pub fn cluster_id(&self) -> Option<String> {
        self.destination_cluster_name.clone().or_else(|| self.destination_cluster_server.clone())
    }

    /// Display label for the cluster: name if present, else the server
    /// URL's host.
    pub fn cluster_label(&self) -> Option<String> {
        if let Some(name) = &self.destination_cluster_name {
            return Some(name.clone());
        }
        self.destination_cluster_server.as_deref().map(url_host_or_verbatim)
    }
}

fn url_host_or_verbatim(url: &str) -> String {
    // Minimal host extraction: strip scheme, take up to next '/' or ':'.
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let host_and_maybe_port = without_scheme.split('/').next().unwrap_or(without_scheme);
    host_and_maybe_port.split(':').next().unwrap_or(host_and_maybe_port).to_string()
}

/// A reference from a resource node to its parent (§3 ResourceNode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub uid: String,
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub group: String,
    pub version: String,
}

/// A single node in a [`ResourceTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub group: String,
    pub version: String,
    pub uid: String,
    pub status: Option<String>,
    pub health: Option<String>,
    #[serde(default)]
    pub parent_refs: Vec<ParentRef>,
}

/// A directed forest of [`ResourceNode`]s, rooted at nodes with no
/// `parent_refs` (§3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTree {
    pub nodes: Vec<ResourceNode>,
}

impl ResourceTree {
    /// Stable depth-first order: parents precede children, siblings
    /// ordered by `(kind, name)` (§3 invariant).
    pub fn depth_first_order(&self) -> Vec<&ResourceNode> {
        let mut children: std::collections::HashMap<&str, Vec<&ResourceNode>> =
            std::collections::HashMap::new();
        let mut roots: Vec<&ResourceNode> = Vec::new();

        for node in &self.nodes {
            if node.parent_refs.is_empty() {
                roots.push(node);
            } else {
                for parent in &node.parent_refs {
                    children.entry(parent.uid.as_str()).or_default().push(node);
                }
            }
        }

        let sort_key = |n: &&ResourceNode| (n.kind.clone(), n.name.clone());
        roots.sort_by_key(sort_key);
        for siblings in children.values_mut() {
            siblings.sort_by_key(sort_key);
        }

        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<&ResourceNode> = roots.into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            ordered.push(node);
            if let Some(kids) = children.get(node.uid.as_str()) {
                for kid in kids.iter().rev() {
                    stack.push(kid);
                }
            }
        }
        ordered
    }
}

/// One entry in an [`App`]'s deployment history, as returned under
/// `status.history[]` by `GetApplication` (§3 RevisionHistoryEntry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionHistoryEntry {
    pub id: i64,
    pub revision: String,
    pub deployed_at: Option<String>,
}

/// A managed resource's live/desired pair (§3 ResourceDiff).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDiff {
    pub kind: String,
    pub group: String,
    pub namespace: String,
    pub name: String,
    pub live_state: Option<serde_json::Value>,
    pub desired_state: Option<serde_json::Value>,
}

/// A configured ArgoCD server endpoint (§3 Server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub base_url: String,
    pub auth_token: String,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub grpc_web: bool,
    pub ca_cert_path: Option<String>,
    pub ca_path: Option<String>,
    pub client_cert_path: Option<String>,
    pub client_key_path: Option<String>,
    pub context_name: String,
    pub request_timeout: std::time::Duration,
}

/// A named [`Server`] drawn from the ArgoCD CLI config (§3 Context).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub server: Server,
}

/// Drill-down scope recording the ancestors the user has entered (§3
/// Navigation state).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub cluster_id: Option<String>,
    pub namespace: Option<String>,
    pub project: Option<String>,
    pub app_set: Option<String>,
}

impl Scope {
    /// True once the scope has drilled at least to project depth — the
    /// point at which §4.8's scoped-watch rule kicks in.
    pub fn has_project(&self) -> bool {
        self.project.is_some()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
