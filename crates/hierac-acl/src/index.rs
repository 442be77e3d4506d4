//! Precomputed resource ownership.
//!
//! [`ResourceIndex`] maps every employee and account name to the company
//! that owns it, found by walking `WORKS_FOR` and `HAS_ACCOUNT` out from
//! each company. It replaces only the resource-to-company step of an access
//! check. The company rule, denials included, is still evaluated against
//! the graph (see [`AccessSession::has_access_indexed`]).
//!
//! [`AccessSession::has_access_indexed`]: crate::resolver::AccessSession::has_access_indexed

use std::collections::HashMap;

use hierac_graph::{Direction, EdgeKind, GraphSnapshot, NodeLabel, NodeRef};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hops from a company to its resources.
const RESOURCE_STEPS: [(EdgeKind, Direction); 2] = [
    (EdgeKind::WorksFor, Direction::Incoming),
    (EdgeKind::HasAccount, Direction::Outgoing),
];

/// Counters collected while building an index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Companies walked.
    pub companies_scanned: usize,
    /// Employees indexed.
    pub employees: usize,
    /// Accounts indexed.
    pub accounts: usize,
    /// Names reached more than once with different owners or labels.
    pub conflicts: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Entry {
    Owned { label: NodeLabel, company: String },
    Ambiguous,
}

/// Resource name to owning company.
#[derive(Clone, Debug, Default)]
pub struct ResourceIndex {
    entries: HashMap<String, Entry>,
    stats: IndexStats,
}

impl ResourceIndex {
    /// Walk every company in `snapshot` and record the resources it owns.
    pub fn build<G: GraphSnapshot + ?Sized>(snapshot: &G) -> Result<Self> {
        let mut index = Self::default();

        for company in snapshot.nodes_with_label(NodeLabel::Company)? {
            index.stats.companies_scanned += 1;
            let company_name = snapshot.node_name(company)?.to_string();

            let mut frontier = vec![company];
            for (kind, direction) in RESOURCE_STEPS {
                let mut next = Vec::new();
                for node in frontier {
                    let edges = match direction {
                        Direction::Outgoing => snapshot.out_edges(node, kind)?,
                        Direction::Incoming => snapshot.in_edges(node, kind)?,
                    };
                    for view in edges {
                        index.record(snapshot, view.neighbor, &company_name)?;
                        next.push(view.neighbor);
                    }
                }
                frontier = next;
            }
        }

        log::info!(
            "Indexed {} employees and {} accounts across {} companies ({} conflicts)",
            index.stats.employees,
            index.stats.accounts,
            index.stats.companies_scanned,
            index.stats.conflicts
        );
        Ok(index)
    }

    fn record<G: GraphSnapshot + ?Sized>(
        &mut self,
        snapshot: &G,
        resource: NodeRef,
        company: &str,
    ) -> Result<()> {
        let node = snapshot.node(resource)?;
        match node.label {
            NodeLabel::Employee => self.stats.employees += 1,
            NodeLabel::Account => self.stats.accounts += 1,
            _ => {}
        }

        let mut entry = Entry::Owned {
            label: node.label,
            company: company.to_string(),
        };
        match self.entries.get(&node.name) {
            None => {}
            Some(existing) if *existing == entry => return Ok(()),
            Some(_) => {
                log::warn!("Resource {} reached from more than one owner", node.name);
                self.stats.conflicts += 1;
                entry = Entry::Ambiguous;
            }
        }
        self.entries.insert(node.name.clone(), entry);
        Ok(())
    }

    /// Name of the company owning `resource`.
    pub fn company_of(&self, resource: &str) -> Result<&str> {
        match self.entries.get(resource) {
            Some(Entry::Owned { company, .. }) => Ok(company.as_str()),
            Some(Entry::Ambiguous) => Err(Error::ambiguous_resource(resource)),
            None => Err(Error::index_miss(resource)),
        }
    }

    /// Whether `resource` was indexed.
    pub fn contains(&self, resource: &str) -> bool {
        self.entries.contains_key(resource)
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build counters.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================
