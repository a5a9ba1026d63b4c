// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated HTTP transport (C1, §4.1). Grounded on the donor's
//! `UpstreamClient` (bearer-auth `reqwest::Client` wrapper) generalized
//! with the spec's TLS trust assembly, per-request deadlines, and the
//! full error-classification table.

use std::sync::Once;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::ArgoError;
use crate::model::Server;

use super::tls::build_trust;

/// Hard cap on the TLS handshake, independent of `Server.request_timeout`
/// (§4.1: "only the TLS handshake has a fixed 10s cap").
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

static INSECURE_WARNING_ONCE: Once = Once::new();

/// Authenticated HTTP/1.1 session against one ArgoCD server.
pub struct Transport {
    client: Client,
    base_url: String,
    auth_token: String,
    request_timeout: Duration,
}

impl Transport {
    pub fn new(server: &Server) -> Result<Self, ArgoError> {
        let trust = build_trust(server)?;
        if let Some(warning) = trust.insecure_warning {
            INSECURE_WARNING_ONCE.call_once(|| {
                tracing::warn!("{warning}");
            });
        }

        let client = Client::builder()
            .use_preconfigured_tls(trust.client_config)
            .connect_timeout(HANDSHAKE_TIMEOUT)
            .build()
            .map_err(|e| ArgoError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            auth_token: server.auth_token.clone(),
            request_timeout: server.request_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET(path) → bytes`, bounded by `Server.request_timeout`.
    pub async fn get(&self, path: &str) -> Result<Bytes, ArgoError> {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.auth_token)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(classify_send_error)?;
        handle_response(resp).await
    }

    /// `POST(path, body) → bytes`, bounded by the given timeout (mutations
    /// use the larger sync timeout, §4.4).
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Bytes, ArgoError> {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.auth_token)
            .header("Content-Type", "application/json")
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_send_error)?;
        handle_response(resp).await
    }

    pub async fn delete(&self, path: &str, timeout: Duration) -> Result<Bytes, ArgoError> {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.auth_token)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_send_error)?;
        handle_response(resp).await
    }

    /// `STREAM(path, query) → byte stream`. Streams are exempt from the
    /// per-request deadline (§4.1); only the handshake, already bounded
    /// above, applies.
    pub async fn stream(&self, path: &str) -> Result<reqwest::Response, ArgoError> {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(classify_send_error)?;

        if !resp.status().is_success() {
            return Err(classify_http_status(resp.status(), &bytes_or_empty(resp).await));
        }
        Ok(resp)
    }

    /// `VERSION() → string` via `/api/version`, accepting either
    /// `Version` or `version` (§4.4).
    pub async fn version(&self) -> Result<String, ArgoError> {
        let bytes = self.get("/api/version").await?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ArgoError::parse(e.to_string()))?;
        value
            .get("Version")
            .or_else(|| value.get("version"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ArgoError::parse("version response missing Version/version field"))
    }
}

async fn bytes_or_empty(resp: reqwest::Response) -> Bytes {
    resp.bytes().await.unwrap_or_default()
}

async fn handle_response(resp: reqwest::Response) -> Result<Bytes, ArgoError> {
    let status = resp.status();
    if status.is_success() {
        resp.bytes().await.map_err(|e| ArgoError::network(e.to_string()))
    } else {
        let body = bytes_or_empty(resp).await;
        Err(classify_http_status(status, &body))
    }
}

/// §4.1 error classification for transport-level send failures.
fn classify_send_error(err: reqwest::Error) -> ArgoError {
    if err.is_timeout() {
        ArgoError::timeout(err.to_string())
    } else if err.is_connect() {
        ArgoError::network(err.to_string())
            .with_hint("Tip: Ensure you are using the correct Argo CD context")
    } else if err.is_builder() || err.is_request() {
        ArgoError::validation(err.to_string())
    } else {
        ArgoError::network(err.to_string())
    }
}

/// §4.1: classify a non-2xx HTTP response, promoting 401/403 bodies that
/// match known expired-token phrasing to AUTH regardless of status code.
fn classify_http_status(status: StatusCode, body: &[u8]) -> ArgoError {
    let json: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let message = json
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("error")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| String::from_utf8_lossy(body).to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || looks_like_expired_token(&message)
    {
        return ArgoError::auth(message).with_hint("argocd login <server>");
    }

    ArgoError::http(status.as_u16(), message)
}

fn looks_like_expired_token(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("token is expired") || lower.contains("\"error\":\"unauthorized\"")
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
