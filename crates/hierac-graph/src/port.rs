//! The graph access port consumed by the access resolver.
//!
//! [`GraphSnapshot`] is the read-only traversal capability: lookup by name,
//! typed edge traversal, and hop-bounded hierarchy walks. [`GraphStore`]
//! hands out one snapshot per operation; the snapshot must stay consistent
//! for as long as it is held, and is released when dropped.
//!
//! Two stores are provided:
//!
//! - [`GraphData`] itself, whose snapshot is a plain borrow.
//! - [`SharedGraph`], an `Arc<RwLock<GraphData>>` whose snapshot holds the
//!   read lock, so a graph published with [`SharedGraph::replace`] is never
//!   observed half-way through an operation.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use hierac_core::{Error, Result};
use petgraph::Direction;

use crate::traversal::{HopSet, walk_within_hops};
use crate::types::{EdgeKind, EdgeView, GraphData, Node, NodeLabel, NodeRef};

// ============================================================================
// GraphSnapshot
// ============================================================================

/// Read-only view of a permission graph.
pub trait GraphSnapshot {
    /// Find a node by label and name; fails with `NotFound` if absent.
    fn lookup(&self, label: NodeLabel, name: &str) -> Result<NodeRef>;

    /// Node data for a handle; fails with `NotFound` for a foreign handle.
    fn node(&self, node: NodeRef) -> Result<&Node>;

    /// Edges of `kind` leaving `node`, with their target nodes.
    fn out_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>>;

    /// Edges of `kind` entering `node`, with their source nodes.
    fn in_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>>;

    /// Every node carrying `label`.
    fn nodes_with_label(&self, label: NodeLabel) -> Result<Vec<NodeRef>>;

    /// Name of a node.
    fn node_name(&self, node: NodeRef) -> Result<&str> {
        Ok(self.node(node)?.name.as_str())
    }

    /// Label of a node.
    fn node_label(&self, node: NodeRef) -> Result<NodeLabel> {
        Ok(self.node(node)?.label)
    }

    /// Nodes reachable by following `kind` forward up to `max_hops` hops,
    /// including `node` itself. For `CHILD_OF` these are the ancestors.
    fn ancestors_within_hops(
        &self,
        node: NodeRef,
        kind: EdgeKind,
        max_hops: usize,
    ) -> Result<HopSet> {
        walk_within_hops(self, node, kind, Direction::Outgoing, max_hops)
    }

    /// Nodes reachable by following `kind` backward up to `max_hops` hops,
    /// including `node` itself. For `CHILD_OF` these are the descendants.
    fn descendants_within_hops(
        &self,
        node: NodeRef,
        kind: EdgeKind,
        max_hops: usize,
    ) -> Result<HopSet> {
        walk_within_hops(self, node, kind, Direction::Incoming, max_hops)
    }
}

impl GraphSnapshot for GraphData {
    fn lookup(&self, label: NodeLabel, name: &str) -> Result<NodeRef> {
        self.find(label, name)
            .ok_or_else(|| Error::not_found(label.name(), name))
    }

    fn node(&self, node: NodeRef) -> Result<&Node> {
        self.get_node(node)
            .ok_or_else(|| Error::not_found("node", node.to_string()))
    }

    fn out_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>> {
        self.node(node)?;
        Ok(self.edges_of_kind(node, kind, Direction::Outgoing))
    }

    fn in_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>> {
        self.node(node)?;
        Ok(self.edges_of_kind(node, kind, Direction::Incoming))
    }

    fn nodes_with_label(&self, label: NodeLabel) -> Result<Vec<NodeRef>> {
        Ok(self
            .iter_nodes()
            .filter(|(_, node)| node.label == label)
            .map(|(node_ref, _)| node_ref)
            .collect())
    }
}

impl<T: GraphSnapshot + ?Sized> GraphSnapshot for &T {
    fn lookup(&self, label: NodeLabel, name: &str) -> Result<NodeRef> {
        (**self).lookup(label, name)
    }

    fn node(&self, node: NodeRef) -> Result<&Node> {
        (**self).node(node)
    }

    fn out_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>> {
        (**self).out_edges(node, kind)
    }

    fn in_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>> {
        (**self).in_edges(node, kind)
    }

    fn nodes_with_label(&self, label: NodeLabel) -> Result<Vec<NodeRef>> {
        (**self).nodes_with_label(label)
    }

    fn ancestors_within_hops(
        &self,
        node: NodeRef,
        kind: EdgeKind,
        max_hops: usize,
    ) -> Result<HopSet> {
        (**self).ancestors_within_hops(node, kind, max_hops)
    }

    fn descendants_within_hops(
        &self,
        node: NodeRef,
        kind: EdgeKind,
        max_hops: usize,
    ) -> Result<HopSet> {
        (**self).descendants_within_hops(node, kind, max_hops)
    }
}

// ============================================================================
// GraphStore
// ============================================================================

/// Source of consistent read-only snapshots.
pub trait GraphStore {
    /// Snapshot type; dropping it releases whatever the store holds.
    type Snapshot<'a>: GraphSnapshot
    where
        Self: 'a;

    /// Acquire a snapshot for the duration of one operation.
    fn snapshot(&self) -> Result<Self::Snapshot<'_>>;
}

impl GraphStore for GraphData {
    type Snapshot<'a> = &'a GraphData;

    fn snapshot(&self) -> Result<Self::Snapshot<'_>> {
        Ok(self)
    }
}

// ============================================================================
// SharedGraph
// ============================================================================

/// Thread-safe graph store publishing whole graphs atomically.
///
/// Cheap to clone (Arc internals).
#[derive(Clone, Debug, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<GraphData>>,
}

/// Snapshot of a [`SharedGraph`]; holds the read lock until dropped.
#[derive(Debug)]
pub struct SharedSnapshot<'a> {
    guard: RwLockReadGuard<'a, GraphData>,
}

impl SharedGraph {
    /// Wrap a graph.
    pub fn new(graph: GraphData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Publish a new graph, waiting for in-flight snapshots to be released.
    pub fn replace(&self, graph: GraphData) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| Error::store_unavailable(format!("graph lock poisoned: {e}")))?;
        *guard = graph;
        log::info!(
            "Published graph with {} nodes and {} edges",
            guard.node_count(),
            guard.edge_count()
        );
        Ok(())
    }
}

impl From<GraphData> for SharedGraph {
    fn from(graph: GraphData) -> Self {
        Self::new(graph)
    }
}

impl GraphStore for SharedGraph {
    type Snapshot<'a> = SharedSnapshot<'a>;

    fn snapshot(&self) -> Result<Self::Snapshot<'_>> {
        let guard = self
            .inner
            .read()
            .map_err(|e| Error::store_unavailable(format!("graph lock poisoned: {e}")))?;
        Ok(SharedSnapshot { guard })
    }
}

impl GraphSnapshot for SharedSnapshot<'_> {
    fn lookup(&self, label: NodeLabel, name: &str) -> Result<NodeRef> {
        self.guard.lookup(label, name)
    }

    fn node(&self, node: NodeRef) -> Result<&Node> {
        GraphSnapshot::node(&*self.guard, node)
    }

    fn out_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>> {
        self.guard.out_edges(node, kind)
    }

    fn in_edges(&self, node: NodeRef, kind: EdgeKind) -> Result<Vec<EdgeView>> {
        self.guard.in_edges(node, kind)
    }

    fn nodes_with_label(&self, label: NodeLabel) -> Result<Vec<NodeRef>> {
        self.guard.nodes_with_label(label)
    }
}

// ============================================================================
// Tests
// ============================================================================
