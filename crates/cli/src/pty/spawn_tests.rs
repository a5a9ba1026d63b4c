// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bytes::Bytes;
use tokio::sync::mpsc;

use super::*;

#[tokio::test]
async fn spawn_rejects_empty_command() {
    let err = ExternalProcess::spawn(&[], 80, 24, false, None).unwrap_err();
    assert_eq!(err.kind, argonaut_core::ErrorKind::Validation);
}

#[tokio::test]
async fn echo_child_round_trips_output_and_reports_clean_exit() {
    let command = vec!["/bin/echo".to_string(), "hello-argonaut".to_string()];
    let mut process = ExternalProcess::spawn(&command, 80, 24, false, None).expect("spawn echo");

    let (output_tx, mut output_rx) = mpsc::channel::<Bytes>(16);
    let (_input_tx, input_rx) = mpsc::channel::<Bytes>(1);

    let status = process.run(output_tx, input_rx).await.expect("run should not error");
    assert_eq!(status.code, Some(0));

    let mut collected = Vec::new();
    while let Ok(chunk) = output_rx.try_recv() {
        collected.extend_from_slice(&chunk);
    }
    assert!(String::from_utf8_lossy(&collected).contains("hello-argonaut"));
}
