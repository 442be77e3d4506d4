//! Loading permission graphs from JSON fixtures.
//!
//! A fixture lists nodes and edges by `(label, name)`:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "label": "Group", "name": "G1" },
//!     { "label": "Company", "name": "Acme" }
//!   ],
//!   "edges": [
//!     { "from": { "label": "Group", "name": "G1" },
//!       "kind": "ALLOWED",
//!       "to": { "label": "Company", "name": "Acme" },
//!       "inherit": true }
//!   ]
//! }
//! ```
//!
//! Loading is two-phase: all nodes are created first, then all edges.
//! Edges naming a missing node are recorded in [`LoadStats::dangling_refs`]
//! instead of failing the load, and repeated edges are deduplicated.

use std::collections::HashSet;
use std::path::Path;

use hierac_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::types::{Edge, EdgeKind, GraphData, Node};

// ============================================================================
// Fixture types
// ============================================================================

/// An edge definition in a fixture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureEdge {
    /// Source node.
    pub from: Node,
    /// Relationship type.
    pub kind: EdgeKind,
    /// Target node.
    pub to: Node,
    /// `inherit` attribute for `ALLOWED` edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit: Option<bool>,
}

/// A serialized permission graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFixture {
    /// Nodes to create.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges to create.
    #[serde(default)]
    pub edges: Vec<FixtureEdge>,
}

/// Statistics from loading a fixture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of distinct nodes created.
    pub nodes_created: usize,
    /// Number of edges created.
    pub edges_created: usize,
    /// Edges whose endpoints were not declared as nodes.
    pub dangling_refs: Vec<String>,
    /// Duplicate edges that were skipped.
    pub deduped_edges: usize,
    /// Edges whose endpoint labels do not match the edge kind.
    pub mislabeled_edges: Vec<String>,
}

impl GraphFixture {
    /// Parse a fixture from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("Failed to parse graph fixture: {e}")))
    }

    /// Serialize the fixture as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::parse(format!("Failed to serialize graph fixture: {e}")))
    }

    /// Capture every node and edge of a graph as a fixture.
    pub fn from_graph(graph: &GraphData) -> Self {
        let nodes = graph.iter_nodes().map(|(_, node)| node.clone()).collect();
        let inner = graph.graph();
        let edges = inner
            .edge_indices()
            .filter_map(|idx| {
                let (from, to) = inner.edge_endpoints(idx)?;
                let edge = inner[idx];
                Some(FixtureEdge {
                    from: inner[from].clone(),
                    kind: edge.kind,
                    to: inner[to].clone(),
                    inherit: edge.inherit,
                })
            })
            .collect();
        Self { nodes, edges }
    }

    /// Build a graph from the fixture.
    pub fn into_graph(self) -> (GraphData, LoadStats) {
        let mut stats = LoadStats::default();
        let mut graph = GraphData::new();

        // ================================================================
        // Phase 1: nodes
        // ================================================================
        for node in self.nodes {
            if !graph.contains_node(node.label, &node.name) {
                stats.nodes_created += 1;
            }
            graph.add_node(node);
        }

        // ================================================================
        // Phase 2: edges (with dedup and dangling ref tracking)
        // ================================================================
        let mut seen_edges: HashSet<(Node, EdgeKind, Node, Option<bool>)> = HashSet::new();

        for fixture_edge in self.edges {
            let description = format!(
                "{} -[{}]-> {}",
                fixture_edge.from, fixture_edge.kind, fixture_edge.to
            );

            let (Some(from), Some(to)) = (
                graph.find(fixture_edge.from.label, &fixture_edge.from.name),
                graph.find(fixture_edge.to.label, &fixture_edge.to.name),
            ) else {
                log::warn!("Skipping dangling fixture edge {description}");
                stats.dangling_refs.push(description);
                continue;
            };

            let (from_label, to_label) = fixture_edge.kind.endpoints();
            if fixture_edge.from.label != from_label || fixture_edge.to.label != to_label {
                log::warn!("Fixture edge {description} connects unexpected labels");
                stats.mislabeled_edges.push(description.clone());
            }

            let key = (
                fixture_edge.from.clone(),
                fixture_edge.kind,
                fixture_edge.to.clone(),
                fixture_edge.inherit,
            );
            if !seen_edges.insert(key) {
                stats.deduped_edges += 1;
                continue;
            }

            let edge = Edge {
                kind: fixture_edge.kind,
                inherit: fixture_edge.inherit,
            };
            if graph.add_edge(from, to, edge).is_ok() {
                stats.edges_created += 1;
            }
        }

        log::debug!(
            "Loaded fixture: {} nodes, {} edges, {} dangling, {} deduped",
            stats.nodes_created,
            stats.edges_created,
            stats.dangling_refs.len(),
            stats.deduped_edges
        );

        (graph, stats)
    }
}

/// Load a graph from a JSON fixture file.
pub async fn load_fixture(path: impl AsRef<Path>) -> Result<(GraphData, LoadStats)> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    let fixture = GraphFixture::from_json_str(&json)?;
    Ok(fixture.into_graph())
}

// ============================================================================
// Tests
// ============================================================================
