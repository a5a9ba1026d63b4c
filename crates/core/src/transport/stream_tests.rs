// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_record_extracts_type_and_payload() {
    let line = br#"{"result":{"type":"ADDED","application":{"metadata":{"name":"demo"}}}}"#;
    let record = parse_record(line).unwrap();
    assert_eq!(record.result_type, "ADDED");
    assert_eq!(record.payload["application"]["metadata"]["name"], "demo");
}

#[test]
fn strip_sse_prefix_removes_data_prefix_when_present() {
    assert_eq!(strip_sse_prefix(b"data: {\"a\":1}"), b"{\"a\":1}".as_slice());
    assert_eq!(strip_sse_prefix(b"{\"a\":1}"), b"{\"a\":1}".as_slice());
}

#[tokio::test]
async fn drain_lines_delivers_bare_ndjson_and_sse_framed_lines() {
    let (tx, mut rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    let mut buffer = b"{\"result\":{\"type\":\"ADDED\"}}\ndata: {\"result\":{\"type\":\"MODIFIED\"}}\n".to_vec();

    drain_lines(&mut buffer, &tx, &cancel).await.unwrap();
    drop(tx);

    let first = rx.recv().await.unwrap();
    assert_eq!(first.result_type, "ADDED");
    let second = rx.recv().await.unwrap();
    assert_eq!(second.result_type, "MODIFIED");
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn drain_lines_skips_unparsable_lines_without_failing() {
    let (tx, mut rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    let mut buffer = b"not json\n{\"result\":{\"type\":\"ADDED\"}}\n".to_vec();

    drain_lines(&mut buffer, &tx, &cancel).await.unwrap();
    drop(tx);

    let record = rx.recv().await.unwrap();
    assert_eq!(record.result_type, "ADDED");
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn drain_lines_respects_cancellation() {
    let (tx, _rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut buffer = b"{\"result\":{\"type\":\"ADDED\"}}\n".to_vec();
    let outcome = drain_lines(&mut buffer, &tx, &cancel).await;
    assert!(matches!(outcome, Err(StreamOutcome::Cancelled)));
}
