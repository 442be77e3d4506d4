//! Fluent construction of permission graphs.
//!
//! [`OrgGraphBuilder`] speaks the vocabulary of the permission domain
//! (administrators, groups, grants, denials, the company hierarchy) and
//! creates nodes on first mention. Grants are written in the encoding chosen
//! with [`EdgeEncoding`], so the same organization can be materialized both
//! ways.
//!
//! # Example
//!
//! ```rust
//! use hierac_graph::{EdgeEncoding, NodeLabel, OrgGraphBuilder};
//!
//! let graph = OrgGraphBuilder::new(EdgeEncoding::InheritAttribute)
//!     .member_of("Ben", "Ben-Group")
//!     .allow_inherit("Ben-Group", "Acme")
//!     .child_of("Spinoff", "Acme")
//!     .build();
//!
//! assert!(graph.contains_node(NodeLabel::Company, "Spinoff"));
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Edge, EdgeKind, GraphData, Node, NodeLabel, NodeRef};

/// How grant edges are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeEncoding {
    /// `ALLOWED_INHERIT` / `ALLOWED_DO_NOT_INHERIT` edges.
    #[default]
    DistinctKinds,
    /// `ALLOWED` edges with an `inherit` attribute.
    InheritAttribute,
}

impl EdgeEncoding {
    /// Both encodings.
    pub const ALL: [EdgeEncoding; 2] = [
        EdgeEncoding::DistinctKinds,
        EdgeEncoding::InheritAttribute,
    ];

    /// The edge representing a grant with the given mode.
    pub fn grant_edge(&self, inherit: bool) -> Edge {
        match (self, inherit) {
            (Self::DistinctKinds, true) => Edge::new(EdgeKind::AllowedInherit),
            (Self::DistinctKinds, false) => Edge::new(EdgeKind::AllowedDoNotInherit),
            (Self::InheritAttribute, _) => Edge::allowed(inherit),
        }
    }
}

/// Builder for permission graphs.
#[derive(Clone, Debug, Default)]
pub struct OrgGraphBuilder {
    graph: GraphData,
    encoding: EdgeEncoding,
}

impl OrgGraphBuilder {
    /// Creates a builder writing grants in `encoding`.
    pub fn new(encoding: EdgeEncoding) -> Self {
        Self {
            graph: GraphData::new(),
            encoding,
        }
    }

    /// The grant encoding in use.
    pub fn encoding(&self) -> EdgeEncoding {
        self.encoding
    }

    fn node(&mut self, label: NodeLabel, name: &str) -> NodeRef {
        self.graph.add_node(Node::new(label, name))
    }

    fn link(mut self, from: (NodeLabel, &str), to: (NodeLabel, &str), edge: Edge) -> Self {
        let from = self.node(from.0, from.1);
        let to = self.node(to.0, to.1);
        // Both handles were just issued by this graph
        if let Err(e) = self.graph.add_edge(from, to, edge) {
            log::error!("Builder failed to link {from} -> {to}: {e}");
        }
        self
    }

    /// Declares an administrator with no memberships.
    pub fn administrator(mut self, name: &str) -> Self {
        self.node(NodeLabel::Administrator, name);
        self
    }

    /// Declares a group with no grants.
    pub fn group(mut self, name: &str) -> Self {
        self.node(NodeLabel::Group, name);
        self
    }

    /// Declares a company with no parent.
    pub fn company(mut self, name: &str) -> Self {
        self.node(NodeLabel::Company, name);
        self
    }

    /// Declares an employee with no employer.
    pub fn employee(mut self, name: &str) -> Self {
        self.node(NodeLabel::Employee, name);
        self
    }

    /// Declares an account with no owner.
    pub fn account(mut self, name: &str) -> Self {
        self.node(NodeLabel::Account, name);
        self
    }

    /// `(admin)-[:MEMBER_OF]->(group)`
    pub fn member_of(self, admin: &str, group: &str) -> Self {
        self.link(
            (NodeLabel::Administrator, admin),
            (NodeLabel::Group, group),
            Edge::new(EdgeKind::MemberOf),
        )
    }

    /// Inherit grant from `group` on `company`.
    pub fn allow_inherit(self, group: &str, company: &str) -> Self {
        let edge = self.encoding.grant_edge(true);
        self.link(
            (NodeLabel::Group, group),
            (NodeLabel::Company, company),
            edge,
        )
    }

    /// Direct grant from `group` on `company`.
    pub fn allow_direct(self, group: &str, company: &str) -> Self {
        let edge = self.encoding.grant_edge(false);
        self.link(
            (NodeLabel::Group, group),
            (NodeLabel::Company, company),
            edge,
        )
    }

    /// `(group)-[:DENIED]->(company)`
    pub fn deny(self, group: &str, company: &str) -> Self {
        self.link(
            (NodeLabel::Group, group),
            (NodeLabel::Company, company),
            Edge::new(EdgeKind::Denied),
        )
    }

    /// `(child)-[:CHILD_OF]->(parent)`
    pub fn child_of(self, child: &str, parent: &str) -> Self {
        self.link(
            (NodeLabel::Company, child),
            (NodeLabel::Company, parent),
            Edge::new(EdgeKind::ChildOf),
        )
    }

    /// `(employee)-[:WORKS_FOR]->(company)`
    pub fn works_for(self, employee: &str, company: &str) -> Self {
        self.link(
            (NodeLabel::Employee, employee),
            (NodeLabel::Company, company),
            Edge::new(EdgeKind::WorksFor),
        )
    }

    /// `(employee)-[:HAS_ACCOUNT]->(account)`
    pub fn has_account(self, employee: &str, account: &str) -> Self {
        self.link(
            (NodeLabel::Employee, employee),
            (NodeLabel::Account, account),
            Edge::new(EdgeKind::HasAccount),
        )
    }

    /// Adds a raw edge, for shapes the domain methods cannot express.
    pub fn raw_edge(self, from: (NodeLabel, &str), to: (NodeLabel, &str), edge: Edge) -> Self {
        self.link(from, to, edge)
    }

    /// Finishes the graph.
    pub fn build(self) -> GraphData {
        log::debug!(
            "Built permission graph ({:?}): {} nodes, {} edges",
            self.encoding,
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.graph
    }
}

// ============================================================================
// Tests
// ============================================================================
