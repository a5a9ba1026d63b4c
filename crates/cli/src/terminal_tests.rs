// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn decodes_plain_ascii_into_char_keys() {
    let keys = decode_keys(b"sj");
    assert_eq!(keys, vec![KeyCode::Char('s'), KeyCode::Char('j')]);
}

#[test]
fn decodes_arrow_escape_sequences() {
    assert_eq!(decode_keys(b"\x1b[A"), vec![KeyCode::Up]);
    assert_eq!(decode_keys(b"\x1b[B"), vec![KeyCode::Down]);
}

#[test]
fn decodes_page_up_and_down() {
    assert_eq!(decode_keys(b"\x1b[5~"), vec![KeyCode::PageUp]);
    assert_eq!(decode_keys(b"\x1b[6~"), vec![KeyCode::PageDown]);
}

#[test]
fn unrecognised_escape_sequence_falls_back_to_bare_escape() {
    assert_eq!(decode_keys(b"\x1bQ"), vec![KeyCode::Escape, KeyCode::Char('Q')]);
}

#[test]
fn decodes_control_chars_and_enter_and_backspace() {
    assert_eq!(decode_keys(&[0x04]), vec![KeyCode::Ctrl('d')]);
    assert_eq!(decode_keys(b"\r"), vec![KeyCode::Enter]);
    assert_eq!(decode_keys(&[0x7f]), vec![KeyCode::Backspace]);
}

#[test]
fn decodes_multibyte_utf8_as_one_char() {
    assert_eq!(decode_keys("é".as_bytes()), vec![KeyCode::Char('é')]);
}
