//! Permission-graph storage and the traversal port for Hierac.
//!
//! This crate provides:
//!
//! - [`GraphData`]: a petgraph-backed property graph indexed by `(label, name)`
//! - [`GraphSnapshot`] / [`GraphStore`]: the read-only port the access
//!   resolver consumes, with hop-bounded hierarchy walks
//! - [`SharedGraph`]: a lock-backed store handing out scoped snapshots
//! - [`GraphFixture`] and [`OrgGraphBuilder`]: ways to populate graphs
//!
//! Nothing in this crate interprets permissions; see `hierac-acl` for that.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod fixture;
pub mod port;
pub mod traversal;
pub mod types;

pub use builder::{EdgeEncoding, OrgGraphBuilder};
pub use fixture::{FixtureEdge, GraphFixture, LoadStats, load_fixture};
pub use port::{GraphSnapshot, GraphStore, SharedGraph, SharedSnapshot};
pub use traversal::{HopSet, walk_within_hops};
pub use types::{Edge, EdgeKind, EdgeView, GraphData, Node, NodeLabel, NodeRef};

// Re-export so callers of `walk_within_hops` need not depend on petgraph.
pub use petgraph::Direction;
