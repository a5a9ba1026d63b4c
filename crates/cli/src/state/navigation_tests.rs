// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn descend_records_scope_and_resets_cursor() {
    let mut nav = NavigationState::default();
    nav.cursor = 3;
    nav.descend("cluster-a");
    assert_eq!(nav.view, View::Namespaces);
    assert_eq!(nav.scope.cluster_id.as_deref(), Some("cluster-a"));
    assert_eq!(nav.cursor, 0);
}

#[test]
fn ascend_restores_prior_cursor_verbatim() {
    let mut nav = NavigationState::default();
    nav.cursor = 5;
    nav.scroll_offset = 2;
    nav.descend("cluster-a");
    nav.cursor = 9;

    assert!(nav.ascend());
    assert_eq!(nav.view, View::Clusters);
    assert_eq!(nav.cursor, 5);
    assert_eq!(nav.scroll_offset, 2);
    assert_eq!(nav.scope.cluster_id, None);
}

#[test]
fn ascend_at_root_is_a_no_op() {
    let mut nav = NavigationState::default();
    assert!(!nav.ascend());
    assert_eq!(nav.view, View::Clusters);
}

#[test]
fn open_resource_tree_and_ascend_preserves_apps_scope() {
    let mut nav = NavigationState::default();
    nav.descend("cluster-a");
    nav.descend("prod");
    nav.descend("team-a");
    nav.cursor = 2;

    nav.open_resource_tree("guestbook");
    assert_eq!(nav.view, View::ResourceTree);
    assert_eq!(nav.current_app.as_deref(), Some("guestbook"));

    assert!(nav.ascend());
    assert_eq!(nav.view, View::Apps);
    assert_eq!(nav.cursor, 2);
}

#[test]
fn contain_cursor_clamps_to_list_length() {
    let mut nav = NavigationState::default();
    nav.cursor = 10;
    nav.contain_cursor(3, 5);
    assert_eq!(nav.cursor, 2);
}

#[test]
fn contain_cursor_is_zero_when_list_is_empty() {
    let mut nav = NavigationState::default();
    nav.cursor = 4;
    nav.contain_cursor(0, 5);
    assert_eq!(nav.cursor, 0);
}

#[test]
fn contain_cursor_scrolls_forward_and_backward() {
    let mut nav = NavigationState::default();
    nav.cursor = 20;
    nav.scroll_offset = 0;
    nav.contain_cursor(30, 5);
    assert_eq!(nav.scroll_offset, 16);

    nav.cursor = 1;
    nav.contain_cursor(30, 5);
    assert_eq!(nav.scroll_offset, 1);
}

#[test]
fn jump_to_clears_ancestry_stack() {
    let mut nav = NavigationState::default();
    nav.descend("cluster-a");
    nav.jump_to(View::Apps, Scope { project: Some("team-a".to_string()), ..Default::default() });
    assert!(!nav.ascend());
    assert_eq!(nav.view, View::Apps);
}
