// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn delete_confirmed_requires_exact_match() {
    let mut modal = Modal::confirm_delete("demo");
    assert!(!modal.delete_confirmed());

    modal.push_delete_char('d');
    modal.push_delete_char('e');
    modal.push_delete_char('m');
    assert!(!modal.delete_confirmed());

    modal.push_delete_char('o');
    assert!(modal.delete_confirmed());
}

#[test]
fn backspace_clears_typed_buffer() {
    let mut modal = Modal::confirm_delete("demo");
    modal.push_delete_char('d');
    modal.push_delete_char('x');
    modal.backspace_delete_char();
    modal.push_delete_char('e');
    modal.push_delete_char('m');
    modal.push_delete_char('o');
    assert!(modal.delete_confirmed());
}

#[test]
fn push_delete_char_is_a_no_op_on_other_modals() {
    let mut modal = Modal::Error { message: "boom".to_string() };
    modal.push_delete_char('x');
    assert_eq!(modal, Modal::Error { message: "boom".to_string() });
}

#[test]
fn modal_state_open_close_roundtrip() {
    let mut state = ModalState::default();
    assert!(!state.is_open());
    state.open(Modal::NoDiff { app_name: "demo".to_string() });
    assert!(state.is_open());
    assert!(state.close());
    assert!(!state.is_open());
    assert!(!state.close());
}
