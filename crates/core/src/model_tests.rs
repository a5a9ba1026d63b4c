// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn app(name: &str) -> App {
    App {
        name: name.to_string(),
        namespace: "ns".to_string(),
        project: "default".to_string(),
        sync_status: SyncStatus::Synced,
        health_status: HealthStatus::Healthy,
        destination_cluster_name: None,
        destination_cluster_server: None,
        destination_namespace: "ns".to_string(),
        owner_app_set: None,
        last_sync_at: None,
    }
}

#[test]
fn cluster_label_prefers_name_over_server() {
    let mut a = app("demo");
    a.destination_cluster_server = Some("https://10.0.0.1:6443".to_string());
    assert_eq!(a.cluster_label(), Some("10.0.0.1".to_string()));
    a.destination_cluster_name = Some("prod".to_string());
    assert_eq!(a.cluster_label(), Some("prod".to_string()));
}

#[test]
fn cluster_label_none_without_destination() {
    let a = app("demo");
    assert_eq!(a.cluster_label(), None);
}

fn node(uid: &str, kind: &str, name: &str, parent: Option<&str>) -> ResourceNode {
    ResourceNode {
        kind: kind.to_string(),
        name: name.to_string(),
        namespace: "ns".to_string(),
        group: "apps".to_string(),
        version: "v1".to_string(),
        uid: uid.to_string(),
        status: None,
        health: None,
        parent_refs: parent
            .map(|p| {
                vec![ParentRef {
                    uid: p.to_string(),
                    kind: "Deployment".to_string(),
                    name: "parent".to_string(),
                    namespace: "ns".to_string(),
                    group: "apps".to_string(),
                    version: "v1".to_string(),
                }]
            })
            .unwrap_or_default(),
    }
}

#[test]
fn depth_first_order_parents_precede_children_siblings_sorted() {
    let tree = ResourceTree {
        nodes: vec![
            node("c2", "Pod", "zeta", Some("root")),
            node("root", "Deployment", "app", None),
            node("c1", "Pod", "alpha", Some("root")),
        ],
    };
    let ordered: Vec<&str> = tree.depth_first_order().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(ordered, vec!["app", "alpha", "zeta"]);
}

#[test]
fn scope_has_project_tracks_drill_depth() {
    let mut scope = Scope::default();
    assert!(!scope.has_project());
    scope.project = Some("team-a".to_string());
    assert!(scope.has_project());
}
