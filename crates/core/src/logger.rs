// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Logger (C11, §4.12). Append-only NDJSON records per session,
//! plus listing/reading for the in-app log viewer. Construction never
//! blocks startup: an unwritable cache directory falls back to stderr.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ArgoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One append-only log line (§4.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: u64,
    pub level: LogLevel,
    pub component: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

fn epoch_ms() -> u64 {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

enum Sink {
    File(File),
    Stderr,
}

/// Per-session append-only writer (C11).
pub struct SessionLogger {
    session_id: String,
    sink: Mutex<Sink>,
}

impl SessionLogger {
    /// Open (creating if necessary) `~/.cache/<app>/sessions/<sessionId>.log`.
    /// Never fails: an unwritable directory silently falls back to stderr.
    pub fn new(sessions_dir: &Path, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        let sink = std::fs::create_dir_all(sessions_dir)
            .ok()
            .and_then(|_| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(sessions_dir.join(format!("{session_id}.log")))
                    .ok()
            })
            .map(Sink::File)
            .unwrap_or(Sink::Stderr);
        Self { session_id, sink: Mutex::new(sink) }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log(&self, level: LogLevel, component: impl Into<String>, message: impl Into<String>) {
        self.log_with_fields(level, component, message, None);
    }

    pub fn log_with_fields(
        &self,
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
        fields: Option<serde_json::Value>,
    ) {
        let record = LogRecord { timestamp: epoch_ms(), level, component: component.into(), message: message.into(), fields };
        let Ok(mut line) = serde_json::to_string(&record) else { return };
        line.push('\n');

        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        let _ = match &mut *sink {
            Sink::File(file) => file.write_all(line.as_bytes()),
            Sink::Stderr => std::io::stderr().write_all(line.as_bytes()),
        };
    }
}

/// List prior sessions under `sessions_dir`, newest first by filename.
/// Session ids are UUIDv7, whose leading bytes are a millisecond
/// timestamp, so plain lexicographic order is also time order.
pub fn list_sessions(sessions_dir: &Path) -> Result<Vec<String>, ArgoError> {
    if !sessions_dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids: Vec<String> = std::fs::read_dir(sessions_dir)
        .map_err(|e| ArgoError::internal(format!("reading {}: {e}", sessions_dir.display())))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.path().file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    ids.sort();
    ids.reverse();
    Ok(ids)
}

/// Read back every record of one session's log file, in file order.
pub fn read_session(sessions_dir: &Path, session_id: &str) -> Result<Vec<LogRecord>, ArgoError> {
    let path: PathBuf = sessions_dir.join(format!("{session_id}.log"));
    let file = File::open(&path).map_err(|e| ArgoError::internal(format!("opening {}: {e}", path.display())))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| ArgoError::internal(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(record) = serde_json::from_str::<LogRecord>(&line) {
            records.push(record);
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
