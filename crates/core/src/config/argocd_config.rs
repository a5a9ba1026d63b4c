// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only parser for the ArgoCD CLI config YAML (§6): `contexts[]`,
//! `servers[]`, `users[]`, `current-context`. Never mutated — Argonaut
//! has no kubeconfig/argocd-config mutation (§1 Non-goals).

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ArgoError;
use crate::model::{Context, Server};

#[derive(Debug, Clone, Deserialize)]
struct ContextEntry {
    name: String,
    server: String,
    #[serde(default)]
    user: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerEntry {
    server: String,
    #[serde(default)]
    insecure: bool,
    #[serde(rename = "grpc-web", default)]
    grpc_web: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct UserEntry {
    name: String,
    #[serde(rename = "auth-token", default)]
    auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ArgoCdConfigFile {
    #[serde(default)]
    contexts: Vec<ContextEntry>,
    #[serde(default)]
    servers: Vec<ServerEntry>,
    #[serde(default)]
    users: Vec<UserEntry>,
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
}

/// Parsed ArgoCD CLI config.
#[derive(Debug, Clone)]
pub struct ArgoCdConfig {
    file: ArgoCdConfigFile,
}

/// CA/client-cert paths supplied on the command line (§4.1); the
/// ArgoCD config file itself carries none of these.
#[derive(Debug, Clone, Default)]
pub struct TlsOverrides {
    pub ca_cert_path: Option<String>,
    pub ca_path: Option<String>,
    pub client_cert_path: Option<String>,
    pub client_key_path: Option<String>,
    pub insecure: bool,
}

impl ArgoCdConfig {
    pub fn load(path: &Path) -> Result<Self, ArgoError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ArgoError::config(format!("reading {}: {e}", path.display())))?;
        let file: ArgoCdConfigFile =
            serde_yaml::from_str(&raw).map_err(|e| ArgoError::config(format!("parsing {}: {e}", path.display())))?;
        Ok(Self { file })
    }

    pub fn context_names(&self) -> Vec<&str> {
        self.file.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn current_context_name(&self) -> Option<&str> {
        self.file.current_context.as_deref()
    }

    /// Resolve a named context into a runnable [`Context`], applying
    /// CLI-supplied TLS overrides and the effective request timeout.
    pub fn resolve(
        &self,
        context_name: &str,
        overrides: &TlsOverrides,
        request_timeout: Duration,
    ) -> Result<Context, ArgoError> {
        let ctx_entry = self
            .file
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .ok_or_else(|| ArgoError::config(format!("unknown context `{context_name}`")))?;

        let server_entry = self.file.servers.iter().find(|s| s.server == ctx_entry.server);
        let user_entry = self.file.users.iter().find(|u| u.name == ctx_entry.user);

        let auth_token = user_entry
            .and_then(|u| u.auth_token.clone())
            .ok_or_else(|| ArgoError::auth(format!("no auth token for context `{context_name}`")))?;

        Ok(Context {
            name: ctx_entry.name.clone(),
            server: Server {
                base_url: ctx_entry.server.clone(),
                auth_token,
                insecure: overrides.insecure || server_entry.is_some_and(|s| s.insecure),
                grpc_web: server_entry.is_some_and(|s| s.grpc_web),
                ca_cert_path: overrides.ca_cert_path.clone(),
                ca_path: overrides.ca_path.clone(),
                client_cert_path: overrides.client_cert_path.clone(),
                client_key_path: overrides.client_key_path.clone(),
                context_name: ctx_entry.name.clone(),
                request_timeout,
            },
        })
    }
}

#[cfg(test)]
#[path = "argocd_config_tests.rs"]
mod tests;
