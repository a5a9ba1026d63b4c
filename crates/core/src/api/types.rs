// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response DTOs for the ArgoCD wire protocol (§4.4).

use serde::{Deserialize, Serialize};

/// A single resource targeted by a scoped sync (§4.4 SyncApplication).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResource {
    pub group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncOptions {
    pub prune: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<SyncResource>>,
}

/// Cascading deletion policy (§4.4 DeleteApplication). Any other spelling
/// is rejected locally before the request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationPolicy {
    Foreground,
    Background,
    Orphan,
}

impl PropagationPolicy {
    pub fn parse(raw: &str) -> Result<Self, crate::error::ArgoError> {
        match raw {
            "foreground" => Ok(Self::Foreground),
            "background" => Ok(Self::Background),
            "orphan" => Ok(Self::Orphan),
            other => Err(crate::error::ArgoError::validation(format!(
                "invalid propagation policy: {other} (expected foreground, background, or orphan)"
            ))),
        }
    }

    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
            Self::Orphan => "orphan",
        }
    }
}

#[derive(Debug, Clone)]
pub enum RefreshMode {
    Normal,
    Hard,
}

impl RefreshMode {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Normal => "true",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RollbackRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,
}

/// `GET /api/v1/applications` envelope: items plus a resource-version
/// cursor for C7's monotonic guard (§4.4, §4.7).
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationListEnvelope {
    pub items: Vec<serde_json::Value>,
    pub metadata: ListMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMetadata {
    #[serde(rename = "resourceVersion")]
    pub resource_version: String,
}

/// One managed resource as returned by `GetManagedResources`, accepting
/// either field-naming variant the server may use (§4.4).
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedResourceEnvelope {
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(rename = "normalizedLiveState")]
    pub normalized_live_state: Option<serde_json::Value>,
    #[serde(rename = "predictedLiveState")]
    pub predicted_live_state: Option<serde_json::Value>,
    #[serde(rename = "liveState")]
    pub live_state: Option<serde_json::Value>,
    #[serde(rename = "targetState")]
    pub target_state: Option<serde_json::Value>,
}

impl ManagedResourceEnvelope {
    pub fn into_diff(self) -> crate::model::ResourceDiff {
        crate::model::ResourceDiff {
            kind: self.kind,
            group: self.group,
            namespace: self.namespace,
            name: self.name,
            live_state: self.normalized_live_state.or(self.live_state),
            desired_state: self.predicted_live_state.or(self.target_state),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManagedResourcesEnvelope {
    pub items: Vec<ManagedResourceEnvelope>,
}
