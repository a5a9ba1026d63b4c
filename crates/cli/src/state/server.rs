// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server sub-state (§3, §4.9): current context, the list of known
//! context names, and the generation counter that tags every async
//! task spawned against the current server.

use argonaut_core::Context;

#[derive(Debug, Clone)]
pub struct ServerState {
    pub current: Option<Context>,
    pub context_names: Vec<String>,
    generation: u64,
}

impl Default for ServerState {
    fn default() -> Self {
        Self { current: None, context_names: Vec::new(), generation: 0 }
    }
}

impl ServerState {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Context switch is atomic: the new context replaces the old one
    /// and the generation is bumped so stale tasks from the prior
    /// context are filtered out everywhere (§4.9 rule 1, §4 invariants).
    pub fn switch_context(&mut self, context: Context) -> u64 {
        self.current = Some(context);
        self.generation += 1;
        self.generation
    }

    /// An intentional stream restart (e.g. scoped watch change) also
    /// bumps the generation without changing context (§4.9 rule 1).
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// The generation filter applied before any other reducer logic
    /// (§5 Ordering guarantees).
    pub fn accepts(&self, message_generation: u64) -> bool {
        message_generation == self.generation
    }

    pub fn current_context_name(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
