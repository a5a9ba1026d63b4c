// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn injects_status_bar_right_after_clear_sequence() {
    let chunk = b"\x1b[2Jhello";
    let out = inject_status_bar(chunk, b"[status]");
    assert_eq!(out, b"\x1b[2J[status]hello");
}

#[test]
fn passes_through_unchanged_when_no_clear_sequence() {
    let chunk = b"plain output";
    let out = inject_status_bar(chunk, b"[status]");
    assert_eq!(out, chunk);
}

#[test]
fn matches_ris_sequence_too() {
    let chunk = b"\x1bcreset";
    let out = inject_status_bar(chunk, b"[s]");
    assert_eq!(out, b"\x1bc[s]reset");
}
