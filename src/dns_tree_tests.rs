// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `dns_tree.rs`

use crate::dns_tree::{build_tree, copy_label, DnsTree};
use crate::endpoint::Endpoint;
use crate::labels::{LABEL_VALUE_TRUE, SOFT_DELETE_LABEL, STOP_SOFT_DELETE_LABEL};

const ROOT: &str = "app.example.com";
const KLB: &str = "klb.app.example.com";
const EU: &str = "eu.klb.app.example.com";
const US: &str = "us.klb.app.example.com";
const C1: &str = "c1.eu.klb.app.example.com";
const C2: &str = "c2.eu.klb.app.example.com";
const C3: &str = "c3.us.klb.app.example.com";

/// Geo/weighted topology:
///
/// ```text
/// app -> klb -> eu -> c1 -> 1.1.1.1
///                  -> c2 -> 2.2.2.2
///            -> us -> c3 -> 3.3.3.3
/// ```
fn geo_records() -> Vec<Endpoint> {
    vec![
        Endpoint::new(ROOT, "CNAME", 300, &[KLB]),
        Endpoint::new(KLB, "CNAME", 300, &[EU])
            .with_set_identifier("EU")
            .with_provider_specific("geo-code", "EU"),
        Endpoint::new(KLB, "CNAME", 300, &[US])
            .with_set_identifier("US")
            .with_provider_specific("geo-code", "US"),
        Endpoint::new(EU, "CNAME", 60, &[C1])
            .with_set_identifier("c1")
            .with_provider_specific("weight", "100"),
        Endpoint::new(EU, "CNAME", 60, &[C2])
            .with_set_identifier("c2")
            .with_provider_specific("weight", "100"),
        Endpoint::new(US, "CNAME", 60, &[C3])
            .with_set_identifier("c3")
            .with_provider_specific("weight", "100"),
        Endpoint::new(C1, "A", 60, &["1.1.1.1"]),
        Endpoint::new(C2, "A", 60, &["2.2.2.2"]),
        Endpoint::new(C3, "A", 60, &["3.3.3.3"]),
    ]
}

fn labelled(records: Vec<Endpoint>, names: &[&str], label: &str) -> Vec<Endpoint> {
    records
        .into_iter()
        .map(|ep| {
            if names.contains(&ep.dns_name.as_str()) {
                ep.with_label(label, LABEL_VALUE_TRUE)
            } else {
                ep
            }
        })
        .collect()
}

fn node(tree: &DnsTree, name: &str) -> crate::dns_tree::NodeId {
    tree.find_node(name)
        .unwrap_or_else(|| panic!("node {name} should exist"))
}

fn sorted(mut endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
    endpoints.sort_by_key(Endpoint::key);
    endpoints
}

fn any_labelled(tree: &DnsTree, label: &str) -> bool {
    tree.to_endpoints()
        .iter()
        .any(|ep| ep.labels.contains_key(label))
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_build_tree_structure() {
    let tree = build_tree(ROOT, &geo_records());

    let root = tree.root();
    assert_eq!(tree.name(root), ROOT);
    assert_eq!(tree.parent(root), None);
    assert_eq!(tree.children(root).len(), 1);

    let klb = node(&tree, KLB);
    assert_eq!(tree.parent(klb), Some(root));
    assert_eq!(tree.children(klb).len(), 2);
    assert_eq!(tree.data_sets(klb).len(), 2);

    let eu = node(&tree, EU);
    assert_eq!(tree.data_sets(eu)[0].set_identifier, "c1");
    assert_eq!(tree.data_sets(eu)[1].targets, vec![C2.to_string()]);

    assert!(tree.is_leaf(node(&tree, "1.1.1.1")));
    assert_eq!(
        tree.leaf_targets(),
        vec![
            "1.1.1.1".to_string(),
            "2.2.2.2".to_string(),
            "3.3.3.3".to_string()
        ]
    );
}

#[test]
fn test_build_tree_without_root_is_stub() {
    let tree = build_tree("", &geo_records());

    assert!(tree.is_leaf(tree.root()));
    assert!(tree.to_endpoints().is_empty());
    assert!(tree.leaf_targets().is_empty());
}

#[test]
fn test_build_tree_without_records() {
    let tree = build_tree(ROOT, &[]);

    assert_eq!(tree.name(tree.root()), ROOT);
    assert!(tree.is_leaf(tree.root()));
    assert!(tree.data_sets(tree.root()).is_empty());
    assert!(tree.to_endpoints().is_empty());
}

#[test]
fn test_shared_targets_are_duplicated_not_merged() {
    let records = vec![
        Endpoint::new("a.example.com", "CNAME", 60, &["b.example.com"]).with_set_identifier("b"),
        Endpoint::new("a.example.com", "CNAME", 60, &["c.example.com"]).with_set_identifier("c"),
        Endpoint::new("b.example.com", "CNAME", 60, &["shared.example.com"]),
        Endpoint::new("c.example.com", "CNAME", 60, &["shared.example.com"]),
        Endpoint::new("shared.example.com", "A", 60, &["10.0.0.1"]),
    ];

    let tree = build_tree("a.example.com", &records);

    assert_eq!(
        tree.leaf_targets(),
        vec!["10.0.0.1".to_string(), "10.0.0.1".to_string()]
    );
}

#[test]
fn test_round_trip_single_chain() {
    let records = vec![
        Endpoint::new("www.example.com", "CNAME", 300, &["lb.example.com"]),
        Endpoint::new("lb.example.com", "CNAME", 60, &["edge.example.net"]),
        Endpoint::new("edge.example.net", "A", 60, &["192.0.2.10"]),
    ];

    let tree = build_tree("www.example.com", &records);

    assert_eq!(tree.to_endpoints(), records);
}

#[test]
fn test_to_endpoints_carries_data_set_fields() {
    let tree = build_tree(ROOT, &geo_records());

    let endpoints = tree.to_endpoints();
    let eu = endpoints
        .iter()
        .find(|ep| ep.dns_name == KLB && ep.set_identifier == "EU")
        .expect("EU variant should be flattened");

    assert_eq!(eu.record_ttl, 300);
    assert_eq!(eu.get_provider_specific("geo-code"), Some("EU"));
    assert_eq!(endpoints.len(), geo_records().len());
}

#[test]
fn test_leaves_is_restartable() {
    let tree = build_tree(ROOT, &geo_records());

    let first: Vec<&str> = tree.leaves().collect();
    let second: Vec<&str> = tree.leaves().collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

// ============================================================================
// Label Propagation
// ============================================================================

#[test]
fn test_propagate_label_requires_unanimous_children() {
    let records = labelled(geo_records(), &[C1, C2], SOFT_DELETE_LABEL);
    let mut tree = build_tree(ROOT, &records);

    let root = tree.root();
    tree.propagate_label(root, SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);

    let klb = node(&tree, KLB);
    let eu = node(&tree, EU);
    assert_eq!(
        tree.edge_label(eu, C1, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(
        tree.edge_label(klb, EU, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(tree.edge_label(klb, US, SOFT_DELETE_LABEL), None);
    assert_eq!(tree.edge_label(root, KLB, SOFT_DELETE_LABEL), None);
}

#[test]
fn test_propagate_label_spreads_down_marked_branch() {
    let mut records = geo_records();
    // mark the klb -> us edge only
    records[2] = records[2].clone().with_label(SOFT_DELETE_LABEL, "stale");
    let mut tree = build_tree(ROOT, &records);

    let root = tree.root();
    tree.propagate_label(root, SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);

    let klb = node(&tree, KLB);
    let us = node(&tree, US);
    let c3 = node(&tree, C3);
    assert_eq!(
        tree.edge_label(klb, US, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(
        tree.edge_label(us, C3, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(
        tree.edge_label(c3, "3.3.3.3", SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(tree.edge_label(klb, EU, SOFT_DELETE_LABEL), None);
}

#[test]
fn test_propagate_stoppable_partial_branch_survives() {
    let records = labelled(geo_records(), &[C1, C2], SOFT_DELETE_LABEL);
    let mut tree = build_tree(ROOT, &records);

    tree.propagate_stoppable_label(SOFT_DELETE_LABEL, LABEL_VALUE_TRUE, STOP_SOFT_DELETE_LABEL);

    let klb = node(&tree, KLB);
    assert_eq!(
        tree.edge_label(klb, EU, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(tree.edge_label(klb, US, SOFT_DELETE_LABEL), None);
}

#[test]
fn test_root_acts_as_implicit_stop() {
    let records = labelled(geo_records(), &[C1, C2, C3], SOFT_DELETE_LABEL);
    let mut tree = build_tree(ROOT, &records);

    let root = tree.root();
    tree.propagate_label(root, SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);
    assert_eq!(
        tree.edge_label(root, KLB, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );

    tree.resolve_stops(SOFT_DELETE_LABEL, STOP_SOFT_DELETE_LABEL);

    assert!(!any_labelled(&tree, SOFT_DELETE_LABEL));
}

#[test]
fn test_stop_label_vetoes_branch_and_ancestors() {
    let mut records = labelled(geo_records(), &[C1, C2], SOFT_DELETE_LABEL);
    // eu -> c1 carries the veto
    records[3] = records[3]
        .clone()
        .with_label(STOP_SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);
    let mut tree = build_tree(ROOT, &records);

    tree.propagate_stoppable_label(SOFT_DELETE_LABEL, LABEL_VALUE_TRUE, STOP_SOFT_DELETE_LABEL);

    let root = tree.root();
    let klb = node(&tree, KLB);
    let eu = node(&tree, EU);
    let c1 = node(&tree, C1);
    let c2 = node(&tree, C2);

    // vetoed edge, its subtree and its ancestors lose the label
    assert_eq!(tree.edge_label(eu, C1, SOFT_DELETE_LABEL), None);
    assert_eq!(tree.edge_label(c1, "1.1.1.1", SOFT_DELETE_LABEL), None);
    assert_eq!(tree.edge_label(klb, EU, SOFT_DELETE_LABEL), None);
    assert_eq!(tree.edge_label(root, KLB, SOFT_DELETE_LABEL), None);

    // the sibling branch keeps it
    assert_eq!(
        tree.edge_label(eu, C2, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(
        tree.edge_label(c2, "2.2.2.2", SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );

    // the veto itself is untouched
    assert_eq!(
        tree.edge_label(eu, C1, STOP_SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
}

#[test]
fn test_upward_propagation_splits_shared_data_set() {
    let records = vec![
        Endpoint::new("lb.example.com", "CNAME", 60, &["a.example.com", "b.example.com"]),
        Endpoint::new("a.example.com", "A", 60, &["10.0.0.1"])
            .with_label(SOFT_DELETE_LABEL, LABEL_VALUE_TRUE),
        Endpoint::new("b.example.com", "A", 60, &["10.0.0.2"]),
    ];
    let mut tree = build_tree("lb.example.com", &records);

    let root = tree.root();
    tree.propagate_label(root, SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);

    let data_sets = tree.data_sets(root);
    assert_eq!(data_sets.len(), 2);
    assert_eq!(data_sets[0].targets, vec!["b.example.com".to_string()]);
    assert!(!data_sets[0].labels.contains_key(SOFT_DELETE_LABEL));
    assert_eq!(data_sets[1].targets, vec!["a.example.com".to_string()]);
    assert_eq!(
        data_sets[1].labels.get(SOFT_DELETE_LABEL).map(String::as_str),
        Some(LABEL_VALUE_TRUE)
    );
}

#[test]
fn test_label_edge_and_unlabel_edge() {
    let mut tree = build_tree(ROOT, &geo_records());
    let klb = node(&tree, KLB);

    tree.label_edge(klb, US, SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);
    assert_eq!(
        tree.edge_label(klb, US, SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(tree.edge_label(klb, EU, SOFT_DELETE_LABEL), None);

    tree.unlabel_edge(klb, US, SOFT_DELETE_LABEL);
    assert_eq!(tree.edge_label(klb, US, SOFT_DELETE_LABEL), None);
    assert_eq!(tree.data_sets(klb).len(), 2);
}

#[test]
fn test_copy_label_between_aligned_edges() {
    let source_records = labelled(geo_records(), &[C1], SOFT_DELETE_LABEL);
    let source = build_tree(ROOT, &source_records);

    let target_records = labelled(geo_records(), &[C2], SOFT_DELETE_LABEL);
    let mut target = build_tree(ROOT, &target_records);

    copy_label(SOFT_DELETE_LABEL, &source, &mut target);

    let c1 = node(&target, C1);
    let c2 = node(&target, C2);
    assert_eq!(
        target.edge_label(c1, "1.1.1.1", SOFT_DELETE_LABEL),
        Some(LABEL_VALUE_TRUE)
    );
    assert_eq!(target.edge_label(c2, "2.2.2.2", SOFT_DELETE_LABEL), None);
}

#[test]
fn test_copy_label_skips_unaligned_targets() {
    let source = build_tree(
        "a.example.com",
        &[Endpoint::new("a.example.com", "A", 60, &["10.0.0.1"])
            .with_label(SOFT_DELETE_LABEL, LABEL_VALUE_TRUE)],
    );
    let mut target = build_tree(
        "a.example.com",
        &[Endpoint::new("a.example.com", "A", 60, &["10.0.0.2"])],
    );

    copy_label(SOFT_DELETE_LABEL, &source, &mut target);

    assert!(!any_labelled(&target, SOFT_DELETE_LABEL));
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn test_remove_leaf_prunes_emptied_parent() {
    let mut tree = build_tree(ROOT, &geo_records());

    tree.remove_node("1.1.1.1");

    assert!(tree.find_node(C1).is_none());
    let eu = node(&tree, EU);
    assert_eq!(tree.children(eu).len(), 1);
    assert_eq!(tree.data_sets(eu).len(), 1);
    assert_eq!(tree.data_sets(eu)[0].targets, vec![C2.to_string()]);
    assert_eq!(
        tree.leaf_targets(),
        vec!["2.2.2.2".to_string(), "3.3.3.3".to_string()]
    );
}

#[test]
fn test_remove_cascades_to_first_surviving_ancestor() {
    let mut tree = build_tree(ROOT, &geo_records());
    let before: Vec<Endpoint> = tree
        .to_endpoints()
        .into_iter()
        .filter(|ep| ep.dns_name.contains("eu."))
        .collect();

    tree.remove_node("3.3.3.3");

    assert!(tree.find_node(US).is_none());
    assert!(tree.find_node(C3).is_none());

    let klb = node(&tree, KLB);
    assert_eq!(tree.children(klb).len(), 1);
    assert_eq!(tree.data_sets(klb).len(), 1);
    assert_eq!(tree.data_sets(klb)[0].targets, vec![EU.to_string()]);

    let after: Vec<Endpoint> = tree
        .to_endpoints()
        .into_iter()
        .filter(|ep| ep.dns_name.contains("eu."))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_remove_intermediate_node() {
    let mut tree = build_tree(ROOT, &geo_records());

    tree.remove_node(EU);

    let klb = node(&tree, KLB);
    assert_eq!(tree.children(klb).len(), 1);
    assert_eq!(tree.data_sets(klb).len(), 1);
    assert_eq!(tree.leaf_targets(), vec!["3.3.3.3".to_string()]);
}

#[test]
fn test_remove_unknown_node_is_noop() {
    let mut tree = build_tree(ROOT, &geo_records());

    tree.remove_node("9.9.9.9");

    assert_eq!(sorted(tree.to_endpoints()), sorted(geo_records()));
}

#[test]
fn test_remove_only_chain_empties_tree() {
    let records = vec![
        Endpoint::new("www.example.com", "CNAME", 300, &["lb.example.com"]),
        Endpoint::new("lb.example.com", "A", 60, &["192.0.2.10"]),
    ];
    let mut tree = build_tree("www.example.com", &records);

    tree.remove_node("192.0.2.10");

    assert!(tree.is_leaf(tree.root()));
    assert!(tree.to_endpoints().is_empty());
    assert_eq!(tree.leaves().count(), 0);
    assert!(tree.leaf_targets().is_empty());
}

#[test]
fn test_remove_drops_data_set_left_without_targets() {
    let mut tree = build_tree(ROOT, &geo_records());

    tree.remove_node(C1);

    let eu = node(&tree, EU);
    assert_eq!(tree.children(eu).len(), 1);
    assert_eq!(tree.data_sets(eu).len(), 1);
    assert_eq!(tree.data_sets(eu)[0].set_identifier, "c2");
    assert!(tree.to_endpoints().iter().all(|ep| !ep.targets.is_empty()));
}

#[test]
fn test_remove_drops_unsplit_mixed_data_set() {
    // a single data set points at both a branch that dies and one that survives
    let records = vec![
        Endpoint::new("lb.example.com", "CNAME", 60, &["a.example.com", "b.example.com"]),
        Endpoint::new("a.example.com", "A", 60, &["10.0.0.1"]),
        Endpoint::new("b.example.com", "A", 60, &["10.0.0.2"]),
    ];
    let mut tree = build_tree("lb.example.com", &records);

    tree.remove_node("10.0.0.1");

    let root = tree.root();
    assert_eq!(tree.children(root).len(), 1);
    assert!(tree.data_sets(root).is_empty());
}

#[test]
fn test_display_renders_every_node() {
    let tree = build_tree(ROOT, &geo_records());

    let rendered = tree.to_string();

    for name in [ROOT, KLB, EU, US, C1, C2, C3, "1.1.1.1"] {
        assert!(rendered.contains(name), "{name} missing from {rendered}");
    }
}
