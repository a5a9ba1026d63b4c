// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Stream Reader (C3, §4.3). Consumes a chunked HTTP response body
//! framed as newline-delimited JSON, optionally `data: `-prefixed SSE
//! (§9 open question: accept either, never assume one), and forwards
//! decoded records onto a bounded channel sized the way the donor sizes
//! its backend-output channel in `session/run.rs`.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ArgoError;

/// Bounded channel capacity for decoded stream records (§4.3).
pub const STREAM_CHANNEL_CAPACITY: usize = 100;

/// One decoded record from a watch stream. `result` is left as raw JSON;
/// callers in `crate::api` narrow it into `Application`/`ResourceNode`
/// payloads depending on which watch endpoint produced it.
#[derive(Debug, Clone)]
pub struct StreamRecord {
    pub result_type: String,
    pub payload: serde_json::Value,
}

/// Why a stream reader stopped delivering records (§4.3).
#[derive(Debug)]
pub enum StreamOutcome {
    Ended,
    AuthError,
    HttpError { code: u16, body: String },
    Broken(ArgoError),
    Cancelled,
}

/// Read `response`'s body as newline-delimited (optionally SSE-framed)
/// JSON, sending decoded [`StreamRecord`]s to `tx` until the stream ends,
/// errors, or `cancel` fires.
pub async fn read_stream(
    response: reqwest::Response,
    tx: mpsc::Sender<StreamRecord>,
    cancel: CancellationToken,
) -> StreamOutcome {
    let mut byte_stream = response.bytes_stream();
    let mut buffer = Vec::new();
    let mut saw_any_bytes = false;

    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => return StreamOutcome::Cancelled,
            chunk = byte_stream.next() => chunk,
        };

        match chunk {
            None => return StreamOutcome::Ended,
            Some(Ok(bytes)) => {
                saw_any_bytes = true;
                buffer.extend_from_slice(&bytes);
                if let Err(outcome) = drain_lines(&mut buffer, &tx, &cancel).await {
                    return outcome;
                }
            }
            Some(Err(e)) => {
                if !saw_any_bytes {
                    return StreamOutcome::Broken(ArgoError::network(e.to_string()));
                }
                return StreamOutcome::Broken(ArgoError::network(e.to_string()));
            }
        }
    }
}

async fn drain_lines(
    buffer: &mut Vec<u8>,
    tx: &mpsc::Sender<StreamRecord>,
    cancel: &CancellationToken,
) -> Result<(), StreamOutcome> {
    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        let line = strip_trailing_newline(&line);
        let line = strip_sse_prefix(line);
        if line.trim_ascii().is_empty() {
            continue;
        }
        match parse_record(line) {
            Ok(record) => {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(StreamOutcome::Cancelled),
                    send_result = tx.send(record) => {
                        if send_result.is_err() {
                            return Err(StreamOutcome::Cancelled);
                        }
                    }
                }
            }
            Err(e) => {
                tracing::debug!(err = %e, "dropping unparsable stream line");
            }
        }
    }
    Ok(())
}

fn strip_trailing_newline(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}

/// SSE frames a payload as `data: <json>`; accept with or without the
/// prefix (§9 open question).
fn strip_sse_prefix(line: &[u8]) -> &[u8] {
    const PREFIX: &[u8] = b"data: ";
    if line.starts_with(PREFIX) {
        &line[PREFIX.len()..]
    } else {
        line
    }
}

fn parse_record(line: &[u8]) -> Result<StreamRecord, serde_json::Error> {
    let envelope: serde_json::Value = serde_json::from_slice(line)?;
    let result = envelope.get("result").cloned().unwrap_or(envelope);
    let result_type =
        result.get("type").and_then(|v| v.as_str()).unwrap_or("UNKNOWN").to_string();
    Ok(StreamRecord { result_type, payload: result })
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
