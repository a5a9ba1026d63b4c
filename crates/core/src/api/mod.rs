// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed ArgoCD API service (C4, §4.4): the operation table, wire DTOs,
//! and the retry/timeout policy that distinguishes reads from mutations.

pub mod service;
pub mod types;

pub use service::{parse_watch_event, AppList, ArgoApiService, WatchEvent, DEFAULT_SYNC_TIMEOUT};
pub use types::{
    ApplicationListEnvelope, ManagedResourceEnvelope, ManagedResourcesEnvelope, PropagationPolicy,
    RefreshMode, RollbackRequest, SyncOptions, SyncResource,
};
