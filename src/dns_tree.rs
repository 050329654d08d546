// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Answer-tree representation of a hostname's DNS resolution graph.
//!
//! A flat record set such as
//!
//! ```text
//! app.example.com        CNAME  klb.app.example.com
//! klb.app.example.com    CNAME  eu.klb.app.example.com   [geo-code=EU]
//! klb.app.example.com    CNAME  us.klb.app.example.com   [geo-code=US]
//! eu.klb.app.example.com A      1.1.1.1
//! us.klb.app.example.com A      2.2.2.2
//! ```
//!
//! is turned into a rooted tree where every node is a DNS name and every
//! [`DataSet`] on a node is one record variant pointing at some of its children.
//! Labels live on data sets (edges), so derived state can be spread along one
//! routing branch without leaking into its siblings.
//!
//! # Architecture
//!
//! Nodes are stored in an arena owned by [`DnsTree`] and addressed with
//! [`NodeId`]. Children are owned by their parent's child list; the parent link
//! is a plain index used only for upward walks. Removing a node detaches it from
//! its parent; detached nodes are unreachable and are never visited again.
//!
//! The tree is not deduplicated: a target referenced from two branches appears
//! twice, each occurrence with its own subtree. Cycles are not detected.
//!
//! # Example
//!
//! ```rust
//! use hostroute::dns_tree::build_tree;
//! use hostroute::endpoint::Endpoint;
//!
//! let records = vec![
//!     Endpoint::new("app.example.com", "CNAME", 60, &["lb.example.com"]),
//!     Endpoint::new("lb.example.com", "A", 60, &["1.1.1.1", "2.2.2.2"]),
//! ];
//!
//! let mut tree = build_tree("app.example.com", &records);
//! tree.remove_node("1.1.1.1");
//!
//! assert_eq!(tree.leaf_targets(), vec!["2.2.2.2".to_string()]);
//! ```

use crate::endpoint::{Endpoint, Labels, ProviderSpecificProperty};
use std::fmt;
use tracing::{debug, trace};

/// Index of a node inside a [`DnsTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One record variant attached to a node: an edge to one or more children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    /// Record type of the variant
    pub record_type: String,
    /// TTL of the variant
    pub record_ttl: i64,
    /// Set identifier of the variant
    pub set_identifier: String,
    /// Labels attached to this edge
    pub labels: Labels,
    /// Routing metadata (geo code, weight, ...)
    pub provider_specific: Vec<ProviderSpecificProperty>,
    /// Names of the children this edge points to
    pub targets: Vec<String>,
}

impl DataSet {
    /// Whether this edge points at `name`.
    #[must_use]
    pub fn targets_name(&self, name: &str) -> bool {
        self.targets.iter().any(|t| t == name)
    }

    fn to_endpoint(&self, dns_name: &str) -> Endpoint {
        Endpoint {
            dns_name: dns_name.to_string(),
            record_type: self.record_type.clone(),
            record_ttl: self.record_ttl,
            targets: self.targets.clone(),
            set_identifier: self.set_identifier.clone(),
            labels: self.labels.clone(),
            provider_specific: self.provider_specific.clone(),
        }
    }
}

impl From<&Endpoint> for DataSet {
    fn from(ep: &Endpoint) -> Self {
        Self {
            record_type: ep.record_type.clone(),
            record_ttl: ep.record_ttl,
            set_identifier: ep.set_identifier.clone(),
            labels: ep.labels.clone(),
            provider_specific: ep.provider_specific.clone(),
            targets: ep.targets.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data_sets: Vec<DataSet>,
}

/// A rooted answer tree built from a flat record set.
#[derive(Debug, Clone)]
pub struct DnsTree {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Build the answer tree rooted at `root_host` from a flat record set.
///
/// Every record named after a node becomes one [`DataSet`] on that node. The
/// distinct targets of those data sets, in first-seen order, become the node's
/// children, each populated against the full record set again. A node without
/// records is a leaf. An empty `root_host` yields a stub tree with no records.
#[must_use]
pub fn build_tree(root_host: &str, endpoints: &[Endpoint]) -> DnsTree {
    let mut tree = DnsTree {
        nodes: vec![Node {
            name: root_host.to_string(),
            parent: None,
            children: Vec::new(),
            data_sets: Vec::new(),
        }],
        root: NodeId(0),
    };

    if root_host.is_empty() {
        return tree;
    }

    tree.populate(tree.root, endpoints);
    debug!(
        root = root_host,
        records = endpoints.len(),
        nodes = tree.nodes.len(),
        "Built DNS answer tree"
    );
    tree
}

/// Copy `label` from every data set in `from` onto the data set with identical
/// targets on the node of the same name in `to`.
///
/// Nodes are matched by name, first pre-order match in `to` wins. When the source
/// data set lacks the label, the label is deleted on the destination.
pub fn copy_label(label: &str, from: &DnsTree, to: &mut DnsTree) {
    for from_id in from.preorder() {
        let Some(to_id) = to.find_node(from.name(from_id)) else {
            continue;
        };

        for from_ds in &from.node(from_id).data_sets {
            let value = from_ds.labels.get(label);
            for to_ds in to
                .node_mut(to_id)
                .data_sets
                .iter_mut()
                .filter(|ds| ds.targets == from_ds.targets)
            {
                match value {
                    Some(v) => {
                        to_ds.labels.insert(label.to_string(), v.clone());
                    }
                    None => {
                        to_ds.labels.remove(label);
                    }
                }
            }
        }
    }
}

impl DnsTree {
    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of a node, in construction order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Data sets (outgoing edges) of a node.
    #[must_use]
    pub fn data_sets(&self, id: NodeId) -> &[DataSet] {
        &self.node(id).data_sets
    }

    /// A node without children: a terminal address or a name outside this topology.
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).children.is_empty()
    }

    /// Find the first node named `name` in pre-order.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.preorder().into_iter().find(|&id| self.name(id) == name)
    }

    /// Value of `label` on the edge from `parent` to its child named `child`.
    ///
    /// When several data sets point at the child, the first one wins.
    #[must_use]
    pub fn edge_label(&self, parent: NodeId, child: &str, label: &str) -> Option<&str> {
        self.node(parent)
            .data_sets
            .iter()
            .filter(|ds| ds.targets_name(child))
            .find_map(|ds| ds.labels.get(label))
            .map(String::as_str)
    }

    /// Set `label=value` on the edge from `parent` to `child` only.
    ///
    /// Data sets shared with other targets are split first so siblings keep their labels.
    pub fn label_edge(&mut self, parent: NodeId, child: &str, label: &str, value: &str) {
        for idx in self.split_out(parent, child) {
            self.node_mut(parent).data_sets[idx]
                .labels
                .insert(label.to_string(), value.to_string());
        }
    }

    /// Remove `label` from the edge from `parent` to `child` only.
    pub fn unlabel_edge(&mut self, parent: NodeId, child: &str, label: &str) {
        if !self
            .node(parent)
            .data_sets
            .iter()
            .any(|ds| ds.targets_name(child) && ds.labels.contains_key(label))
        {
            return;
        }
        for idx in self.split_out(parent, child) {
            self.node_mut(parent).data_sets[idx].labels.remove(label);
        }
    }

    /// Spread `label=value` through the tree, then retract it across branches marked with `stop_label`.
    ///
    /// The first pass spreads the label down every branch whose entry edge already
    /// carries it, and up to a parent edge once all of a node's child edges carry
    /// it. The second pass removes it from every branch whose entry edge carries
    /// both labels, together with the ancestors of that edge. The root acts as an
    /// implicit stop: a uniformly labelled tree ends up with no label at all.
    pub fn propagate_stoppable_label(&mut self, label: &str, value: &str, stop_label: &str) {
        debug!(
            root = %self.name(self.root),
            label, value, stop_label, "Propagating stoppable label"
        );
        self.propagate_label(self.root, label, value);
        self.resolve_stops(label, stop_label);
    }

    /// Greedy pass of [`Self::propagate_stoppable_label`].
    pub fn propagate_label(&mut self, id: NodeId, label: &str, value: &str) {
        let children = self.node(id).children.clone();

        for &child in &children {
            let child_name = self.name(child).to_string();
            if self.edge_label(id, &child_name, label).is_some() {
                for ds in self
                    .node_mut(id)
                    .data_sets
                    .iter_mut()
                    .filter(|ds| ds.targets_name(&child_name))
                {
                    ds.labels.insert(label.to_string(), value.to_string());
                }
                self.label_subtree(child, label, value);
            } else {
                self.propagate_label(child, label, value);
            }
        }

        let Some(parent) = self.parent(id) else {
            return;
        };
        let unanimous = !children.is_empty()
            && children
                .iter()
                .all(|&c| self.edge_label(id, self.name(c), label) == Some(value));
        if unanimous {
            let name = self.name(id).to_string();
            trace!(node = %name, label, "All child edges labelled, labelling parent edge");
            self.label_edge(parent, &name, label, value);
        }
    }

    /// Stop-resolution pass of [`Self::propagate_stoppable_label`].
    pub fn resolve_stops(&mut self, label: &str, stop_label: &str) {
        let root = self.root;
        let root_children = self.node(root).children.clone();
        let uniformly_labelled = !root_children.is_empty()
            && root_children
                .iter()
                .all(|&c| self.edge_label(root, self.name(c), label).is_some());

        if uniformly_labelled {
            debug!(root = %self.name(root), label, "Whole tree labelled, root stops propagation");
            self.strip_subtree(root, label);
            return;
        }

        self.resolve_stops_from(root, label, stop_label);
    }

    fn resolve_stops_from(&mut self, id: NodeId, label: &str, stop_label: &str) {
        let children = self.node(id).children.clone();

        for child in children {
            let child_name = self.name(child).to_string();
            let stopped = self.node(id).data_sets.iter().any(|ds| {
                ds.targets_name(&child_name)
                    && ds.labels.contains_key(stop_label)
                    && ds.labels.contains_key(label)
            });

            if !stopped {
                self.resolve_stops_from(child, label, stop_label);
                continue;
            }

            trace!(parent = %self.name(id), child = %child_name, label, "Stop label found");
            self.unlabel_edge(id, &child_name, label);
            self.strip_subtree(child, label);

            let mut current = id;
            while let Some(parent) = self.parent(current) {
                let name = self.name(current).to_string();
                self.unlabel_edge(parent, &name, label);
                current = parent;
            }
        }
    }

    /// Remove every node named `name`, pruning branches left without children.
    ///
    /// The removed name is stripped from the targets of the parent's data sets.
    /// This goes further than stripping the name alone: a data set left without
    /// targets is dropped instead of being kept as an empty record set. A child that had children and
    /// became a leaf during the walk is a dead branch: it is removed, and so is
    /// every data set on its parent whose *first* target is the dead branch. A
    /// data set mixing a dead branch with live targets is dropped whole, so such
    /// data sets must be split with [`Self::label_edge`]-style edits beforehand
    /// when the live targets have to survive.
    pub fn remove_node(&mut self, name: &str) {
        debug!(root = %self.name(self.root), node = name, "Removing node from DNS answer tree");
        self.remove_from(self.root, name);
    }

    fn remove_from(&mut self, id: NodeId, name: &str) {
        if let Some(pos) = self
            .node(id)
            .children
            .iter()
            .position(|&c| self.name(c) == name)
        {
            let node = self.node_mut(id);
            let removed = node.children.remove(pos);
            for ds in &mut node.data_sets {
                ds.targets.retain(|t| t != name);
            }
            node.data_sets.retain(|ds| !ds.targets.is_empty());
            self.node_mut(removed).parent = None;
            return;
        }

        let children = self.node(id).children.clone();
        let mut dead_branches = Vec::new();
        for child in children {
            let was_leaf = self.is_leaf(child);
            self.remove_from(child, name);
            if !was_leaf && self.is_leaf(child) {
                dead_branches.push(child);
            }
        }

        for dead in dead_branches {
            let dead_name = self.name(dead).to_string();
            trace!(parent = %self.name(id), branch = %dead_name, "Pruning dead branch");
            let node = self.node_mut(id);
            node.children.retain(|&c| c != dead);
            node.data_sets
                .retain(|ds| ds.targets.first().map(String::as_str) != Some(dead_name.as_str()));
            self.node_mut(dead).parent = None;
        }
    }

    /// Lazily walk the leaves of the tree, depth first.
    ///
    /// The root is never reported. A root without children yields no leaves.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            tree: self,
            stack: self.node(self.root).children.iter().rev().copied().collect(),
        }
    }

    /// Names of all leaves, depth first. Duplicated branches report their leaves once per occurrence.
    ///
    /// Empty when the root has no children, for example after
    /// [`Self::remove_node`] pruned the last chain.
    #[must_use]
    pub fn leaf_targets(&self) -> Vec<String> {
        self.leaves().map(ToString::to_string).collect()
    }

    /// Flatten the tree back into a record set: one record per data set of every non-leaf node.
    #[must_use]
    pub fn to_endpoints(&self) -> Vec<Endpoint> {
        self.preorder()
            .into_iter()
            .filter(|&id| !self.is_leaf(id))
            .flat_map(|id| {
                let node = self.node(id);
                node.data_sets
                    .iter()
                    .map(move |ds| ds.to_endpoint(&node.name))
            })
            .collect()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn populate(&mut self, id: NodeId, endpoints: &[Endpoint]) {
        let name = self.name(id).to_string();
        let mut targets: Vec<String> = Vec::new();

        for ep in endpoints.iter().filter(|ep| ep.dns_name == name) {
            for target in &ep.targets {
                if !targets.contains(target) {
                    targets.push(target.clone());
                }
            }
            self.node_mut(id).data_sets.push(DataSet::from(ep));
        }

        for target in targets {
            let child = NodeId(self.nodes.len());
            self.nodes.push(Node {
                name: target,
                parent: Some(id),
                children: Vec::new(),
                data_sets: Vec::new(),
            });
            self.node_mut(id).children.push(child);
            self.populate(child, endpoints);
        }
    }

    /// Reachable nodes in pre-order.
    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    /// Make every data set on `parent` pointing at `child` point at it alone.
    ///
    /// Returns the indices of the data sets addressing `child` after the split.
    fn split_out(&mut self, parent: NodeId, child: &str) -> Vec<usize> {
        let node = self.node_mut(parent);
        let mut split = Vec::new();

        for ds in &mut node.data_sets {
            if ds.targets.len() > 1 && ds.targets_name(child) {
                ds.targets.retain(|t| t != child);
                split.push(DataSet {
                    targets: vec![child.to_string()],
                    ..ds.clone()
                });
            }
        }
        if !split.is_empty() {
            trace!(parent = %node.name, child, "Split target out of shared data set");
        }
        node.data_sets.extend(split);

        node.data_sets
            .iter()
            .enumerate()
            .filter(|(_, ds)| ds.targets_name(child))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn label_subtree(&mut self, id: NodeId, label: &str, value: &str) {
        for ds in &mut self.node_mut(id).data_sets {
            ds.labels.insert(label.to_string(), value.to_string());
        }
        for child in self.node(id).children.clone() {
            self.label_subtree(child, label, value);
        }
    }

    fn strip_subtree(&mut self, id: NodeId, label: &str) {
        for ds in &mut self.node_mut(id).data_sets {
            ds.labels.remove(label);
        }
        for child in self.node(id).children.clone() {
            self.strip_subtree(child, label);
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        writeln!(f, "{:indent$}{}", "", node.name, indent = depth * 2)?;
        for ds in &node.data_sets {
            let labels: Vec<String> = ds.labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
            writeln!(
                f,
                "{:indent$}- {} {} -> {:?} {{{}}}",
                "",
                ds.record_type,
                ds.set_identifier,
                ds.targets,
                labels.join(","),
                indent = depth * 2 + 1
            )?;
        }
        for &child in &node.children {
            self.fmt_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DnsTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

/// Depth-first iterator over the leaf names of a [`DnsTree`].
pub struct Leaves<'a> {
    tree: &'a DnsTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(id) = self.stack.pop() {
            let children = tree.children(id);
            if children.is_empty() {
                return Some(tree.name(id));
            }
            self.stack.extend(children.iter().rev().copied());
        }
        None
    }
}

#[cfg(test)]
#[path = "dns_tree_tests.rs"]
mod dns_tree_tests;
