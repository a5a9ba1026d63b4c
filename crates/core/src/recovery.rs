// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream Recovery Manager (C5, §4.5). Tracks every registered stream's
//! health, detects staleness via a periodic health check, and drives
//! reconnection through C2's retry abstraction — kept a separate loop
//! from C2's inner retry per §9 ("stream restart is always whole-stream,
//! never per-event").

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::ArgoError;
use crate::retry::{with_retry, RetryOutcome, RetryPolicy};

/// Health-check cadence (§4.5).
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

pub type RecoveryFuture = Pin<Box<dyn Future<Output = Result<(), ArgoError>> + Send>>;
pub type RecoveryFn = Arc<dyn Fn(CancellationToken) -> RecoveryFuture + Send + Sync>;

/// Per-stream connection status (§3 Stream connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Healthy,
    Recovering,
    Failed,
    Disconnected,
}

/// A copyable view of one stream's state, returned by [`StreamRecoveryManager::snapshot`]
/// so external readers never hold the internal lock (§5).
#[derive(Debug, Clone)]
pub struct StreamStatusSnapshot {
    pub id: String,
    pub server_label: String,
    pub status: StreamStatus,
    pub failures: u32,
    pub generation: u64,
}

struct StreamState {
    server_label: String,
    status: StreamStatus,
    last_seen: Instant,
    failures: u32,
    generation: u64,
    cancel: CancellationToken,
    recovery_fn: RecoveryFn,
}

/// Registers and supervises every long-lived stream (C5, §4.5).
pub struct StreamRecoveryManager {
    streams: Mutex<HashMap<String, StreamState>>,
    retry_policy: RetryPolicy,
}

impl Default for StreamRecoveryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRecoveryManager {
    pub fn new() -> Self {
        Self { streams: Mutex::new(HashMap::new()), retry_policy: RetryPolicy::stream_default() }
    }

    /// Register a stream with its re-establishment function; returns the
    /// initial generation (0).
    pub fn register(
        &self,
        id: impl Into<String>,
        server_label: impl Into<String>,
        cancel: CancellationToken,
        recovery_fn: RecoveryFn,
    ) -> u64 {
        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams.insert(
            id.into(),
            StreamState {
                server_label: server_label.into(),
                status: StreamStatus::Healthy,
                last_seen: Instant::now(),
                failures: 0,
                generation: 0,
                cancel,
                recovery_fn,
            },
        );
        0
    }

    pub fn unregister(&self, id: &str) {
        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(state) = streams.remove(id) {
            state.cancel.cancel();
        }
    }

    /// Record successful activity on a stream (an event was delivered).
    pub fn mark_success(&self, id: &str) {
        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(state) = streams.get_mut(id) {
            state.status = StreamStatus::Healthy;
            state.last_seen = Instant::now();
            state.failures = 0;
        }
    }

    /// Current generation for `id`, or `None` if unregistered — callers
    /// tag outgoing messages with this so C9 can drop late events.
    pub fn generation_of(&self, id: &str) -> Option<u64> {
        let streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams.get(id).map(|s| s.generation)
    }

    pub fn snapshot(&self) -> Vec<StreamStatusSnapshot> {
        let streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams
            .iter()
            .map(|(id, s)| StreamStatusSnapshot {
                id: id.clone(),
                server_label: s.server_label.clone(),
                status: s.status,
                failures: s.failures,
                generation: s.generation,
            })
            .collect()
    }

    /// Mark `id` failed and run recovery to completion under the stream
    /// retry profile. Transitions: Healthy/Failed → Recovering → Healthy
    /// (success, generation bumped) or Disconnected (attempts exhausted).
    pub async fn recover(&self, id: &str, _cause: ArgoError) {
        let (cancel, recovery_fn) = {
            let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
            let Some(state) = streams.get_mut(id) else { return };
            state.status = StreamStatus::Failed;
            (state.cancel.clone(), Arc::clone(&state.recovery_fn))
        };

        {
            let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(state) = streams.get_mut(id) {
                state.status = StreamStatus::Recovering;
            }
        }

        let outcome =
            with_retry(&self.retry_policy, &cancel, || (recovery_fn)(cancel.clone())).await;

        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        let Some(state) = streams.get_mut(id) else { return };
        match outcome {
            RetryOutcome::Succeeded { attempts, .. } => {
                state.status = StreamStatus::Healthy;
                state.last_seen = Instant::now();
                state.failures = 0;
                state.generation += 1;
                tracing::info!(stream_id = id, attempts, generation = state.generation, "stream recovered");
            }
            RetryOutcome::Cancelled { .. } => {
                state.status = StreamStatus::Disconnected;
            }
            RetryOutcome::ExhaustedOrFatal { error, attempts } => {
                state.status = StreamStatus::Disconnected;
                state.failures += attempts;
                tracing::warn!(stream_id = id, error = %error, "stream recovery exhausted");
            }
        }
    }

    /// One health-check pass (§4.5: idle beyond `2·interval` fails a
    /// Healthy stream). Returns the ids that were marked failed so the
    /// caller can drive `recover` for each — kept separate so tests can
    /// drive a single pass deterministically.
    pub fn sweep_stale(&self) -> Vec<String> {
        let mut stale = Vec::new();
        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        for (id, state) in streams.iter_mut() {
            if state.status == StreamStatus::Healthy
                && state.last_seen.elapsed() > HEALTH_CHECK_INTERVAL * 2
            {
                state.status = StreamStatus::Failed;
                stale.push(id.clone());
            }
        }
        stale
    }

    /// Runs the periodic health-check loop until `cancel` fires.
    pub async fn run_health_check_loop(self: &Arc<Self>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(HEALTH_CHECK_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = interval.tick() => {
                    for id in self.sweep_stale() {
                        self.recover(&id, ArgoError::unavailable("stream idle past health-check threshold")).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
