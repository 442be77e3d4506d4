//! The permission model.
//!
//! Typed views over the raw graph: which groups an administrator belongs
//! to, the grants and denials those groups hold, and which company owns a
//! resource. Both grant encodings are read from the same graph, so
//! `ALLOWED_INHERIT`, `ALLOWED_DO_NOT_INHERIT` and `ALLOWED{inherit}` edges
//! may be mixed freely.

use std::collections::HashSet;

use hierac_graph::{EdgeKind, EdgeView, GraphSnapshot, NodeLabel, NodeRef};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Grants and denials
// ============================================================================

/// A permission grant held by a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Grant {
    /// Reaches the target company and its descendants within the hop cap.
    Inherit(NodeRef),
    /// Reaches exactly the target company. Never blocked by a denial.
    Direct(NodeRef),
}

impl Grant {
    /// Interpret a grant edge leaving a group.
    ///
    /// Returns `None` for non-grant edges and for an `ALLOWED` edge with no
    /// `inherit` attribute, which grants nothing.
    pub fn from_edge(view: &EdgeView) -> Option<Self> {
        let target = view.neighbor;
        match (view.edge.kind, view.edge.inherit) {
            (EdgeKind::AllowedInherit, _) => Some(Grant::Inherit(target)),
            (EdgeKind::AllowedDoNotInherit, _) => Some(Grant::Direct(target)),
            (EdgeKind::Allowed, Some(true)) => Some(Grant::Inherit(target)),
            (EdgeKind::Allowed, Some(false)) => Some(Grant::Direct(target)),
            (EdgeKind::Allowed, None) => {
                log::warn!("Ignoring ALLOWED edge to {target} without an inherit attribute");
                None
            }
            _ => None,
        }
    }

    /// The company the grant names.
    pub fn target(&self) -> NodeRef {
        match self {
            Grant::Inherit(target) | Grant::Direct(target) => *target,
        }
    }

    /// Whether the grant propagates down the hierarchy.
    pub fn is_inherit(&self) -> bool {
        matches!(self, Grant::Inherit(_))
    }
}

/// A denial held by a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Denial {
    /// The denied company.
    pub target: NodeRef,
}

/// Grants and denials of one group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPermissions {
    /// The group.
    pub group: NodeRef,
    /// Grants grouped by edge kind, in insertion order within a kind.
    pub grants: Vec<Grant>,
    /// Denials in edge insertion order.
    pub denials: Vec<Denial>,
}

impl GroupPermissions {
    /// Read the permissions of `group`.
    pub fn load<S: GraphSnapshot + ?Sized>(snapshot: &S, group: NodeRef) -> Result<Self> {
        let mut grants = Vec::new();
        for kind in EdgeKind::GRANTS {
            grants.extend(
                snapshot
                    .out_edges(group, kind)?
                    .iter()
                    .filter_map(Grant::from_edge),
            );
        }

        let denials = snapshot
            .out_edges(group, EdgeKind::Denied)?
            .into_iter()
            .map(|view| Denial {
                target: view.neighbor,
            })
            .collect();

        Ok(Self {
            group,
            grants,
            denials,
        })
    }
}

/// Groups an administrator is a member of.
pub fn groups_of<S: GraphSnapshot + ?Sized>(snapshot: &S, admin: NodeRef) -> Result<Vec<NodeRef>> {
    Ok(snapshot
        .out_edges(admin, EdgeKind::MemberOf)?
        .into_iter()
        .map(|view| view.neighbor)
        .collect())
}

/// Administrators that are members of a group.
pub fn members_of<S: GraphSnapshot + ?Sized>(snapshot: &S, group: NodeRef) -> Result<Vec<NodeRef>> {
    Ok(snapshot
        .in_edges(group, EdgeKind::MemberOf)?
        .into_iter()
        .map(|view| view.neighbor)
        .collect())
}

// ============================================================================
// Access counts
// ============================================================================

/// Number of ways an administrator reaches a company.
///
/// Every (group, grant) pair that reaches the company counts once. Access is
/// granted when either count is non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCount {
    /// Unblocked inherit grants whose reach includes the company.
    pub inherit_paths: usize,
    /// Direct grants naming the company.
    pub direct_paths: usize,
}

impl AccessCount {
    /// Whether any path grants access.
    pub fn granted(&self) -> bool {
        self.inherit_paths > 0 || self.direct_paths > 0
    }

    /// Total number of granting paths.
    pub fn total(&self) -> usize {
        self.inherit_paths + self.direct_paths
    }
}

// ============================================================================
// Administrator permissions
// ============================================================================

/// Everything one administrator holds, across all of their groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminPermissions {
    /// The administrator.
    pub admin: NodeRef,
    /// Per-group permissions, in membership order.
    pub groups: Vec<GroupPermissions>,
    denied: HashSet<NodeRef>,
}

impl AdminPermissions {
    /// Read the permissions of `admin`.
    pub fn load<S: GraphSnapshot + ?Sized>(snapshot: &S, admin: NodeRef) -> Result<Self> {
        let groups = groups_of(snapshot, admin)?
            .into_iter()
            .map(|group| GroupPermissions::load(snapshot, group))
            .collect::<Result<Vec<_>>>()?;
        let denied = groups
            .iter()
            .flat_map(|perms| perms.denials.iter().map(|denial| denial.target))
            .collect();
        Ok(Self {
            admin,
            groups,
            denied,
        })
    }

    /// Every grant, one entry per (group, grant) pair.
    pub fn grants(&self) -> impl Iterator<Item = Grant> + '_ {
        self.groups.iter().flat_map(|perms| perms.grants.iter().copied())
    }

    /// Targets of every denial, across all groups.
    pub fn denied_targets(&self) -> &HashSet<NodeRef> {
        &self.denied
    }

    /// Whether a denial lies on `company` or one of its ancestors within
    /// `max_hops`.
    pub fn is_blocked<S: GraphSnapshot + ?Sized>(
        &self,
        snapshot: &S,
        company: NodeRef,
        max_hops: usize,
    ) -> Result<bool> {
        if self.denied.is_empty() {
            return Ok(false);
        }
        let ancestors = snapshot.ancestors_within_hops(company, EdgeKind::ChildOf, max_hops)?;
        Ok(ancestors.intersects(self.denied.iter()))
    }

    /// Count the paths by which the administrator reaches `company`.
    pub fn access_count<S: GraphSnapshot + ?Sized>(
        &self,
        snapshot: &S,
        company: NodeRef,
        max_hops: usize,
    ) -> Result<AccessCount> {
        let ancestors = snapshot.ancestors_within_hops(company, EdgeKind::ChildOf, max_hops)?;
        let blocked = ancestors.intersects(self.denied.iter());

        let mut count = AccessCount::default();
        for grant in self.grants() {
            match grant {
                Grant::Inherit(target) if !blocked && ancestors.contains(target) => {
                    count.inherit_paths += 1;
                }
                Grant::Direct(target) if target == company => count.direct_paths += 1,
                _ => {}
            }
        }
        Ok(count)
    }
}

// ============================================================================
// Resources
// ============================================================================

/// A resource node: an employee or an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// An employee, owned by the company they work for.
    Employee(NodeRef),
    /// An account, owned by its employee's company.
    Account(NodeRef),
}

impl Resource {
    /// Find the resource called `name`.
    ///
    /// Employees and accounts share one namespace; a name used by both is
    /// rejected as ambiguous.
    pub fn resolve<S: GraphSnapshot + ?Sized>(snapshot: &S, name: &str) -> Result<Self> {
        let employee = optional(snapshot.lookup(NodeLabel::Employee, name))?;
        let account = optional(snapshot.lookup(NodeLabel::Account, name))?;
        match (employee, account) {
            (Some(_), Some(_)) => Err(Error::ambiguous_resource(name)),
            (Some(employee), None) => Ok(Resource::Employee(employee)),
            (None, Some(account)) => Ok(Resource::Account(account)),
            (None, None) => Err(Error::not_found("Resource", name)),
        }
    }

    /// The resource node.
    pub fn node(&self) -> NodeRef {
        match self {
            Resource::Employee(node) | Resource::Account(node) => *node,
        }
    }

    /// The company the resource belongs to.
    pub fn company<S: GraphSnapshot + ?Sized>(&self, snapshot: &S) -> Result<NodeRef> {
        match self {
            Resource::Employee(employee) => employer_of(snapshot, *employee),
            Resource::Account(account) => {
                let owner = owner_of(snapshot, *account)?;
                employer_of(snapshot, owner)
            }
        }
    }
}

fn optional(result: hierac_core::Result<NodeRef>) -> Result<Option<NodeRef>> {
    match result {
        Ok(node) => Ok(Some(node)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The company an employee works for.
pub fn employer_of<S: GraphSnapshot + ?Sized>(snapshot: &S, employee: NodeRef) -> Result<NodeRef> {
    let employers = snapshot.out_edges(employee, EdgeKind::WorksFor)?;
    let name = snapshot.node_name(employee)?;
    match employers.as_slice() {
        [] => Err(Error::not_found("Company", format!("employer of {name}"))),
        [only] => Ok(only.neighbor),
        [first, ..] => {
            log::warn!(
                "Employee {name} works for {} companies; using the first",
                employers.len()
            );
            Ok(first.neighbor)
        }
    }
}

/// The employee owning an account.
pub fn owner_of<S: GraphSnapshot + ?Sized>(snapshot: &S, account: NodeRef) -> Result<NodeRef> {
    let owners = snapshot.in_edges(account, EdgeKind::HasAccount)?;
    let name = snapshot.node_name(account)?;
    match owners.as_slice() {
        [] => Err(Error::not_found("Employee", format!("owner of {name}"))),
        [only] => Ok(only.neighbor),
        [first, ..] => {
            log::warn!("Account {name} has {} owners; using the first", owners.len());
            Ok(first.neighbor)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
