//! Core graph types for the permission graph.
//!
//! Nodes are identified by a `(label, name)` pair; names are unique per
//! label. Edges carry a typed [`EdgeKind`] and, for the attribute-based
//! grant encoding, an optional `inherit` flag.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use hierac_core::{Error, Result};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

// ============================================================================
// NodeLabel enum
// ============================================================================

/// Label of a node in the permission graph.
///
/// `Employee` and `Account` are both resources; see [`NodeLabel::is_resource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLabel {
    /// A person administering companies through group membership.
    Administrator,
    /// A group holding grants and denials.
    Group,
    /// A company in the hierarchy.
    Company,
    /// An employee working for a company.
    Employee,
    /// An account owned by an employee.
    Account,
}

impl NodeLabel {
    /// Every label, in declaration order.
    pub const ALL: [NodeLabel; 5] = [
        NodeLabel::Administrator,
        NodeLabel::Group,
        NodeLabel::Company,
        NodeLabel::Employee,
        NodeLabel::Account,
    ];

    /// Returns the label name as it appears in fixtures.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Group => "Group",
            Self::Company => "Company",
            Self::Employee => "Employee",
            Self::Account => "Account",
        }
    }

    /// Whether nodes with this label are resources.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Employee | Self::Account)
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NodeLabel::ALL
            .into_iter()
            .find(|label| label.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::parse(format!("unknown node label: {s}")))
    }
}

// ============================================================================
// EdgeKind enum
// ============================================================================

/// Relationship types in the permission graph.
///
/// Grants exist in two encodings: the distinct kinds `AllowedInherit` /
/// `AllowedDoNotInherit`, or a single `Allowed` kind whose edge carries an
/// `inherit` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Administrator → Group.
    MemberOf,
    /// Group → Company grant, mode given by the `inherit` attribute.
    Allowed,
    /// Group → Company grant that propagates to descendants.
    AllowedInherit,
    /// Group → Company grant for exactly that company.
    AllowedDoNotInherit,
    /// Group → Company denial.
    Denied,
    /// Company → parent Company.
    ChildOf,
    /// Employee → Company.
    WorksFor,
    /// Employee → Account.
    HasAccount,
}

impl EdgeKind {
    /// Every edge kind, in declaration order.
    pub const ALL: [EdgeKind; 8] = [
        EdgeKind::MemberOf,
        EdgeKind::Allowed,
        EdgeKind::AllowedInherit,
        EdgeKind::AllowedDoNotInherit,
        EdgeKind::Denied,
        EdgeKind::ChildOf,
        EdgeKind::WorksFor,
        EdgeKind::HasAccount,
    ];

    /// Edge kinds that carry a grant, in either encoding.
    pub const GRANTS: [EdgeKind; 3] = [
        EdgeKind::AllowedInherit,
        EdgeKind::AllowedDoNotInherit,
        EdgeKind::Allowed,
    ];

    /// Returns the relationship type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MemberOf => "MEMBER_OF",
            Self::Allowed => "ALLOWED",
            Self::AllowedInherit => "ALLOWED_INHERIT",
            Self::AllowedDoNotInherit => "ALLOWED_DO_NOT_INHERIT",
            Self::Denied => "DENIED",
            Self::ChildOf => "CHILD_OF",
            Self::WorksFor => "WORKS_FOR",
            Self::HasAccount => "HAS_ACCOUNT",
        }
    }

    /// The labels this kind of edge connects, as `(from, to)`.
    pub fn endpoints(&self) -> (NodeLabel, NodeLabel) {
        match self {
            Self::MemberOf => (NodeLabel::Administrator, NodeLabel::Group),
            Self::Allowed | Self::AllowedInherit | Self::AllowedDoNotInherit | Self::Denied => {
                (NodeLabel::Group, NodeLabel::Company)
            }
            Self::ChildOf => (NodeLabel::Company, NodeLabel::Company),
            Self::WorksFor => (NodeLabel::Employee, NodeLabel::Company),
            Self::HasAccount => (NodeLabel::Employee, NodeLabel::Account),
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        EdgeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| Error::parse(format!("unknown edge kind: {s}")))
    }
}

// ============================================================================
// NodeRef
// ============================================================================

/// Opaque handle to a node inside one graph.
///
/// Handles are only meaningful for the graph (or snapshot) that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    pub(crate) fn from_index(idx: NodeIndex) -> Self {
        Self(idx.index())
    }

    pub(crate) fn index(self) -> NodeIndex {
        NodeIndex::new(self.0)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Node and Edge structs
// ============================================================================

/// A node in the permission graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Entity kind.
    pub label: NodeLabel,
    /// Name, unique within the label.
    pub name: String,
}

impl Node {
    /// Creates a node.
    pub fn new(label: NodeLabel, name: impl Into<String>) -> Self {
        Self {
            label,
            name: name.into(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.label, self.name)
    }
}

/// Attributes of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Type of relationship.
    pub kind: EdgeKind,
    /// `inherit` attribute; only meaningful on `ALLOWED` edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit: Option<bool>,
}

impl Edge {
    /// Creates an edge without attributes.
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            inherit: None,
        }
    }

    /// Creates an `ALLOWED` edge carrying an `inherit` attribute.
    pub fn allowed(inherit: bool) -> Self {
        Self {
            kind: EdgeKind::Allowed,
            inherit: Some(inherit),
        }
    }
}

/// One edge as seen from a node during traversal.
///
/// `neighbor` is the node at the other end: the target for outgoing
/// traversal, the source for incoming traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeView {
    /// Edge attributes.
    pub edge: Edge,
    /// Node at the other end of the edge.
    pub neighbor: NodeRef,
}

// ============================================================================
// GraphData struct
// ============================================================================

/// In-memory permission graph.
///
/// Wraps a petgraph `DiGraph` with a `(label, name)` lookup table. The graph
/// only grows; nothing in Hierac removes nodes or edges.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    graph: DiGraph<Node, Edge>,
    node_indices: HashMap<(NodeLabel, String), NodeIndex>,
}

impl GraphData {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Read-only access to the underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<Node, Edge> {
        &self.graph
    }

    /// Checks if a node exists.
    pub fn contains_node(&self, label: NodeLabel, name: &str) -> bool {
        self.node_indices.contains_key(&(label, name.to_string()))
    }

    /// Finds a node by label and name.
    pub fn find(&self, label: NodeLabel, name: &str) -> Option<NodeRef> {
        self.node_indices
            .get(&(label, name.to_string()))
            .copied()
            .map(NodeRef::from_index)
    }

    /// Gets node data for a handle.
    pub fn get_node(&self, node: NodeRef) -> Option<&Node> {
        self.graph.node_weight(node.index())
    }

    /// Returns an iterator over all nodes.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeRef, &Node)> {
        self.graph
            .node_indices()
            .map(|idx| (NodeRef::from_index(idx), &self.graph[idx]))
    }

    /// Add a node.
    ///
    /// If a node with the same label and name already exists, returns its
    /// existing handle.
    pub fn add_node(&mut self, node: Node) -> NodeRef {
        let key = (node.label, node.name.clone());
        if let Some(&existing) = self.node_indices.get(&key) {
            return NodeRef::from_index(existing);
        }
        let idx = self.graph.add_node(node);
        self.node_indices.insert(key, idx);
        NodeRef::from_index(idx)
    }

    /// Add an edge between two existing nodes.
    pub fn add_edge(&mut self, from: NodeRef, to: NodeRef, edge: Edge) -> Result<()> {
        if self.get_node(from).is_none() {
            return Err(Error::not_found("node", from.to_string()));
        }
        if self.get_node(to).is_none() {
            return Err(Error::not_found("node", to.to_string()));
        }
        self.graph.add_edge(from.index(), to.index(), edge);
        Ok(())
    }

    /// Add an edge between two nodes identified by label and name.
    pub fn add_edge_by_name(
        &mut self,
        from: (NodeLabel, &str),
        to: (NodeLabel, &str),
        edge: Edge,
    ) -> Result<()> {
        let from_ref = self
            .find(from.0, from.1)
            .ok_or_else(|| Error::not_found(from.0.name(), from.1))?;
        let to_ref = self
            .find(to.0, to.1)
            .ok_or_else(|| Error::not_found(to.0.name(), to.1))?;
        self.add_edge(from_ref, to_ref, edge)
    }

    /// Edges of one kind touching `node` in the given direction, in
    /// insertion order.
    pub fn edges_of_kind(
        &self,
        node: NodeRef,
        kind: EdgeKind,
        direction: Direction,
    ) -> Vec<EdgeView> {
        let idx = node.index();
        if self.graph.node_weight(idx).is_none() {
            return Vec::new();
        }

        // petgraph yields the most recently added edge first
        let mut found: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|edge_ref| edge_ref.weight().kind == kind)
            .map(|edge_ref| {
                let neighbor = match direction {
                    Direction::Outgoing => edge_ref.target(),
                    Direction::Incoming => edge_ref.source(),
                };
                (
                    edge_ref.id(),
                    EdgeView {
                        edge: *edge_ref.weight(),
                        neighbor: NodeRef::from_index(neighbor),
                    },
                )
            })
            .collect();
        found.sort_by_key(|(id, _)| *id);
        found.into_iter().map(|(_, view)| view).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
