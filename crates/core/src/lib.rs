// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-facing data plane for an interactive ArgoCD terminal client:
//! transport, retry, stream reading, the typed API, stream recovery,
//! degradation, the apps store, and scope/filter derivation.

pub mod api;
pub mod config;
pub mod degrade;
pub mod error;
pub mod logger;
pub mod model;
pub mod recovery;
pub mod retry;
pub mod scope;
pub mod store;
pub mod transport;

pub use error::{ArgoError, ErrorContext, ErrorKind};
pub use model::{
    App, Context, HealthStatus, ParentRef, ResourceDiff, ResourceNode, ResourceTree,
    RevisionHistoryEntry, Scope, Server, SyncStatus,
};
