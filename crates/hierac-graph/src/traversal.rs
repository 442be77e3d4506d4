//! Hop-bounded hierarchy walks.
//!
//! Walks are breadth-first and iterative. Every walk carries an explicit
//! hop counter and a visited set, so a cyclic `CHILD_OF` chain in a
//! malformed graph still terminates after at most `max_hops` levels.

use std::collections::{HashMap, VecDeque};

use hierac_core::Result;
use petgraph::Direction;

use crate::port::GraphSnapshot;
use crate::types::{EdgeKind, NodeRef};

/// Nodes reached by a bounded walk, with their hop distance.
///
/// Always contains the start node at distance 0. Iteration follows
/// breadth-first discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HopSet {
    order: Vec<NodeRef>,
    distances: HashMap<NodeRef, usize>,
}

impl HopSet {
    fn insert(&mut self, node: NodeRef, distance: usize) -> bool {
        if self.distances.contains_key(&node) {
            return false;
        }
        self.distances.insert(node, distance);
        self.order.push(node);
        true
    }

    /// Whether `node` was reached.
    pub fn contains(&self, node: NodeRef) -> bool {
        self.distances.contains_key(&node)
    }

    /// Hop distance of `node`, if it was reached.
    pub fn distance(&self, node: NodeRef) -> Option<usize> {
        self.distances.get(&node).copied()
    }

    /// Number of nodes reached, including the start node.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false for a walk result; the start node is included.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.order.iter().copied()
    }

    /// Whether any node in `other` was also reached here.
    pub fn intersects<'a>(&self, mut other: impl Iterator<Item = &'a NodeRef>) -> bool {
        other.any(|node| self.contains(*node))
    }
}

impl<'a> IntoIterator for &'a HopSet {
    type Item = NodeRef;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeRef>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().copied()
    }
}

/// Walk edges of one kind from `start`, up to `max_hops` hops.
///
/// `Direction::Outgoing` follows edges forward (for `CHILD_OF`, towards
/// ancestors); `Direction::Incoming` follows them backward (towards
/// descendants). The start node is included at hop 0.
pub fn walk_within_hops<S>(
    snapshot: &S,
    start: NodeRef,
    kind: EdgeKind,
    direction: Direction,
    max_hops: usize,
) -> Result<HopSet>
where
    S: GraphSnapshot + ?Sized,
{
    // Resolve the start node first so an invalid handle fails loudly.
    snapshot.node(start)?;

    let mut reached = HopSet::default();
    let mut queue: VecDeque<(NodeRef, usize)> = VecDeque::new();

    reached.insert(start, 0);
    queue.push_back((start, 0));

    while let Some((current, hops)) = queue.pop_front() {
        if hops >= max_hops {
            continue;
        }

        let edges = match direction {
            Direction::Outgoing => snapshot.out_edges(current, kind)?,
            Direction::Incoming => snapshot.in_edges(current, kind)?,
        };

        for view in edges {
            if reached.insert(view.neighbor, hops + 1) {
                queue.push_back((view.neighbor, hops + 1));
            }
        }
    }

    log::trace!(
        "walk {kind} {direction:?} from {start} within {max_hops} hops reached {} nodes",
        reached.len()
    );

    Ok(reached)
}

// ============================================================================
// Tests
// ============================================================================
