//! The access resolver.
//!
//! An administrator `a` reaches company `c` when one of their groups holds
//!
//! - an inherit grant on `c` or an ancestor of `c` within the hop cap, and
//!   none of their groups denies `c` or an ancestor of `c` within the hop
//!   cap; or
//! - a direct grant on `c` itself.
//!
//! Employees belong to the company they work for, accounts to their
//! employee's company, and a resource is reachable when its company is.
//!
//! [`AccessSession`] evaluates queries against one snapshot.
//! [`AccessResolver`] owns a store and configuration and opens a fresh
//! session per call, so every public operation sees one consistent graph.
//!
//! # Example
//!
//! ```rust
//! use hierac_acl::AccessResolver;
//! use hierac_graph::{EdgeEncoding, OrgGraphBuilder};
//!
//! let graph = OrgGraphBuilder::new(EdgeEncoding::DistinctKinds)
//!     .member_of("Ben", "Ben-Group")
//!     .allow_inherit("Ben-Group", "Acme")
//!     .child_of("Spinoff", "Acme")
//!     .works_for("Emily", "Spinoff")
//!     .build();
//!
//! let resolver = AccessResolver::new(graph);
//! let mut companies = resolver.accessible_companies("Ben").unwrap();
//! companies.sort();
//! assert_eq!(companies, vec!["Acme", "Spinoff"]);
//! assert!(resolver.has_access("Ben", "Emily").unwrap());
//! ```

use std::collections::{HashMap, HashSet};

use hierac_core::{AclConfig, validate_name};
use hierac_graph::{EdgeKind, EdgeView, GraphSnapshot, GraphStore, HopSet, NodeLabel, NodeRef};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::ResourceIndex;
use crate::model::{AccessCount, AdminPermissions, Grant, Resource, members_of};

/// An employee and one of their accounts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourcePair {
    /// Employee name.
    pub employee: String,
    /// Account name.
    pub account: String,
}

// ============================================================================
// AccessSession
// ============================================================================

/// Access queries over one graph snapshot.
///
/// Holding a session holds the snapshot; drop it to release the store.
#[derive(Debug)]
pub struct AccessSession<G> {
    snapshot: G,
    max_hops: usize,
}

impl<G: GraphSnapshot> AccessSession<G> {
    /// Evaluate queries against `snapshot` with the given hop cap.
    pub fn new(snapshot: G, max_hops: usize) -> Self {
        Self { snapshot, max_hops }
    }

    /// The snapshot queries run against.
    pub fn snapshot(&self) -> &G {
        &self.snapshot
    }

    /// The hop cap.
    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    // ------------------------------------------------------------------------
    // Lookup helpers
    // ------------------------------------------------------------------------

    fn lookup(&self, label: NodeLabel, name: &str) -> Result<NodeRef> {
        let name = validate_name(label.name(), name)?;
        Ok(self.snapshot.lookup(label, name)?)
    }

    fn resource(&self, name: &str) -> Result<Resource> {
        let name = validate_name("Resource", name)?;
        Resource::resolve(&self.snapshot, name)
    }

    fn names(&self, nodes: impl IntoIterator<Item = NodeRef>) -> Result<Vec<String>> {
        nodes
            .into_iter()
            .map(|node| Ok(self.snapshot.node_name(node)?.to_string()))
            .collect()
    }

    fn names_with_label(&self, label: NodeLabel) -> Result<Vec<String>> {
        let nodes = self.snapshot.nodes_with_label(label)?;
        self.names(nodes)
    }

    fn ancestors(&self, company: NodeRef) -> Result<HopSet> {
        Ok(self
            .snapshot
            .ancestors_within_hops(company, EdgeKind::ChildOf, self.max_hops)?)
    }

    fn descendants(&self, company: NodeRef) -> Result<HopSet> {
        Ok(self
            .snapshot
            .descendants_within_hops(company, EdgeKind::ChildOf, self.max_hops)?)
    }

    /// `(employee, account)` node pairs of everyone working for `company`.
    fn accounts_at(&self, company: NodeRef) -> Result<Vec<(NodeRef, NodeRef)>> {
        let mut pairs = Vec::new();
        for employee in self.snapshot.in_edges(company, EdgeKind::WorksFor)? {
            for account in self
                .snapshot
                .out_edges(employee.neighbor, EdgeKind::HasAccount)?
            {
                pairs.push((employee.neighbor, account.neighbor));
            }
        }
        Ok(pairs)
    }

    // ------------------------------------------------------------------------
    // Forward evaluation
    // ------------------------------------------------------------------------

    /// Companies reached by `perms`: inherit reach in discovery order, then
    /// direct grants, without repeats.
    fn companies_reached(&self, perms: &AdminPermissions) -> Result<Vec<NodeRef>> {
        let mut reached = Vec::new();
        let mut seen = HashSet::new();
        let mut blocked: HashMap<NodeRef, bool> = HashMap::new();

        for grant in perms.grants() {
            let Grant::Inherit(target) = grant else {
                continue;
            };
            for company in &self.descendants(target)? {
                if seen.contains(&company) {
                    continue;
                }
                let is_blocked = match blocked.get(&company) {
                    Some(is_blocked) => *is_blocked,
                    None => {
                        let is_blocked =
                            perms.is_blocked(&self.snapshot, company, self.max_hops)?;
                        blocked.insert(company, is_blocked);
                        is_blocked
                    }
                };
                if !is_blocked {
                    seen.insert(company);
                    reached.push(company);
                }
            }
        }

        for grant in perms.grants() {
            if let Grant::Direct(target) = grant
                && seen.insert(target)
            {
                reached.push(target);
            }
        }

        Ok(reached)
    }

    /// Companies the administrator called `admin` can see.
    pub fn accessible_companies(&self, admin: &str) -> Result<Vec<String>> {
        log::debug!("accessible_companies({admin})");
        let admin = self.lookup(NodeLabel::Administrator, admin)?;
        let perms = AdminPermissions::load(&self.snapshot, admin)?;
        let companies = self.companies_reached(&perms)?;
        self.names(companies)
    }

    /// Every `(employee, account)` pair at companies the administrator can
    /// see. Employees without accounts do not appear.
    pub fn accessible_resources(&self, admin: &str) -> Result<Vec<ResourcePair>> {
        log::debug!("accessible_resources({admin})");
        let admin = self.lookup(NodeLabel::Administrator, admin)?;
        let perms = AdminPermissions::load(&self.snapshot, admin)?;

        let mut pairs = Vec::new();
        for company in self.companies_reached(&perms)? {
            for (employee, account) in self.accounts_at(company)? {
                pairs.push(ResourcePair {
                    employee: self.snapshot.node_name(employee)?.to_string(),
                    account: self.snapshot.node_name(account)?.to_string(),
                });
            }
        }
        Ok(pairs)
    }

    /// Accounts the administrator can see within `company` and its
    /// descendants up to the hop cap.
    ///
    /// Each company in that subtree is checked on its own, so a denied
    /// subsidiary hides its accounts even when its parent is visible.
    pub fn accessible_accounts_for_company(
        &self,
        admin: &str,
        company: &str,
    ) -> Result<Vec<String>> {
        log::debug!("accessible_accounts_for_company({admin}, {company})");
        let admin = self.lookup(NodeLabel::Administrator, admin)?;
        let company = self.lookup(NodeLabel::Company, company)?;
        let perms = AdminPermissions::load(&self.snapshot, admin)?;

        let mut accounts = Vec::new();
        for member in &self.descendants(company)? {
            if !perms
                .access_count(&self.snapshot, member, self.max_hops)?
                .granted()
            {
                continue;
            }
            for (_, account) in self.accounts_at(member)? {
                accounts.push(account);
            }
        }
        self.names(accounts)
    }

    // ------------------------------------------------------------------------
    // Reverse evaluation
    // ------------------------------------------------------------------------

    /// Administrators reaching `company`, mirroring [`companies_reached`].
    ///
    /// Grants are found on the ancestors of `company` through incoming grant
    /// edges; an administrator holding an inherit grant qualifies unless one
    /// of their denials lies on the same ancestor set.
    ///
    /// [`companies_reached`]: Self::companies_reached
    fn admins_reaching(&self, company: NodeRef) -> Result<Vec<NodeRef>> {
        let ancestors = self.ancestors(company)?;

        let mut inherit_groups = Vec::new();
        let mut direct_groups = Vec::new();
        for target in &ancestors {
            for kind in EdgeKind::GRANTS {
                for incoming in self.snapshot.in_edges(target, kind)? {
                    let view = EdgeView {
                        edge: incoming.edge,
                        neighbor: target,
                    };
                    match Grant::from_edge(&view) {
                        Some(Grant::Inherit(_)) => inherit_groups.push(incoming.neighbor),
                        Some(Grant::Direct(granted)) if granted == company => {
                            direct_groups.push(incoming.neighbor);
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut admins = Vec::new();
        let mut seen = HashSet::new();
        let mut blocked: HashMap<NodeRef, bool> = HashMap::new();

        for group in inherit_groups {
            for admin in members_of(&self.snapshot, group)? {
                if seen.contains(&admin) {
                    continue;
                }
                let is_blocked = match blocked.get(&admin) {
                    Some(is_blocked) => *is_blocked,
                    None => {
                        let perms = AdminPermissions::load(&self.snapshot, admin)?;
                        let is_blocked = ancestors.intersects(perms.denied_targets().iter());
                        blocked.insert(admin, is_blocked);
                        is_blocked
                    }
                };
                if !is_blocked {
                    seen.insert(admin);
                    admins.push(admin);
                }
            }
        }

        for group in direct_groups {
            for admin in members_of(&self.snapshot, group)? {
                if seen.insert(admin) {
                    admins.push(admin);
                }
            }
        }

        Ok(admins)
    }

    /// Administrators that can see `company`.
    pub fn admins_for_company(&self, company: &str) -> Result<Vec<String>> {
        log::debug!("admins_for_company({company})");
        let company = self.lookup(NodeLabel::Company, company)?;
        let admins = self.admins_reaching(company)?;
        self.names(admins)
    }

    /// Administrators that can see the employee or account `resource`.
    pub fn admins_for_resource(&self, resource: &str) -> Result<Vec<String>> {
        log::debug!("admins_for_resource({resource})");
        let company = self.resource(resource)?.company(&self.snapshot)?;
        let admins = self.admins_reaching(company)?;
        self.names(admins)
    }

    // ------------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------------

    /// Count the paths by which `admin` reaches `resource`.
    pub fn access_paths(&self, admin: &str, resource: &str) -> Result<AccessCount> {
        log::debug!("access_paths({admin}, {resource})");
        let admin = self.lookup(NodeLabel::Administrator, admin)?;
        let company = self.resource(resource)?.company(&self.snapshot)?;
        let perms = AdminPermissions::load(&self.snapshot, admin)?;
        perms.access_count(&self.snapshot, company, self.max_hops)
    }

    /// Whether `admin` can see `resource`.
    pub fn has_access(&self, admin: &str, resource: &str) -> Result<bool> {
        Ok(self.access_paths(admin, resource)?.granted())
    }

    /// Whether `admin` can see `company`.
    pub fn has_access_to_company(&self, admin: &str, company: &str) -> Result<bool> {
        log::debug!("has_access_to_company({admin}, {company})");
        let admin = self.lookup(NodeLabel::Administrator, admin)?;
        let company = self.lookup(NodeLabel::Company, company)?;
        let perms = AdminPermissions::load(&self.snapshot, admin)?;
        Ok(perms
            .access_count(&self.snapshot, company, self.max_hops)?
            .granted())
    }

    /// Whether `admin` can see `resource`, resolving its company through a
    /// precomputed index instead of the graph.
    ///
    /// The company rule itself is always evaluated against the snapshot, so
    /// denials apply exactly as in [`has_access`](Self::has_access).
    pub fn has_access_indexed(
        &self,
        index: &ResourceIndex,
        admin: &str,
        resource: &str,
    ) -> Result<bool> {
        log::debug!("has_access_indexed({admin}, {resource})");
        let admin = self.lookup(NodeLabel::Administrator, admin)?;
        let resource = validate_name("Resource", resource)?;
        let company = index.company_of(resource)?;
        let company = self.snapshot.lookup(NodeLabel::Company, company)?;
        let perms = AdminPermissions::load(&self.snapshot, admin)?;
        Ok(perms
            .access_count(&self.snapshot, company, self.max_hops)?
            .granted())
    }

    /// Name of the company `resource` belongs to.
    pub fn company_of_resource(&self, resource: &str) -> Result<String> {
        let company = self.resource(resource)?.company(&self.snapshot)?;
        Ok(self.snapshot.node_name(company)?.to_string())
    }

    // ------------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------------

    /// Names of every administrator.
    pub fn administrators(&self) -> Result<Vec<String>> {
        self.names_with_label(NodeLabel::Administrator)
    }

    /// Names of every company.
    pub fn companies(&self) -> Result<Vec<String>> {
        self.names_with_label(NodeLabel::Company)
    }

    /// Names of every resource: employees, then accounts.
    pub fn resources(&self) -> Result<Vec<String>> {
        let mut names = self.names_with_label(NodeLabel::Employee)?;
        names.extend(self.names_with_label(NodeLabel::Account)?);
        Ok(names)
    }
}

// ============================================================================
// AccessResolver
// ============================================================================

/// Resolves access over a graph store.
///
/// Each operation takes one snapshot from the store and releases it before
/// returning. With [`AclConfig::fold_not_found`] set, unknown names yield
/// empty results instead of `NotFound`.
#[derive(Clone, Debug)]
pub struct AccessResolver<S> {
    store: S,
    config: AclConfig,
}

impl<S: GraphStore> AccessResolver<S> {
    /// Create a resolver with the default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: AclConfig::default(),
        }
    }

    /// Create a resolver with a validated configuration.
    pub fn with_config(store: S, config: AclConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a session on a fresh snapshot, for running several queries
    /// against the same graph state.
    pub fn session(&self) -> Result<AccessSession<S::Snapshot<'_>>> {
        let snapshot = self.store.snapshot()?;
        Ok(AccessSession::new(snapshot, self.config.max_hops))
    }

    fn run<'s, T: Default>(
        &'s self,
        operation: &str,
        query: impl FnOnce(&AccessSession<S::Snapshot<'s>>) -> Result<T>,
    ) -> Result<T> {
        let result = self.session().and_then(|session| query(&session));
        match result {
            Err(e) if self.config.fold_not_found && e.is_not_found() => {
                log::debug!("{operation}: {e}; answering empty");
                Ok(T::default())
            }
            other => other,
        }
    }

    /// See [`AccessSession::accessible_companies`].
    pub fn accessible_companies(&self, admin: &str) -> Result<Vec<String>> {
        self.run("accessible_companies", |s| s.accessible_companies(admin))
    }

    /// See [`AccessSession::accessible_resources`].
    pub fn accessible_resources(&self, admin: &str) -> Result<Vec<ResourcePair>> {
        self.run("accessible_resources", |s| s.accessible_resources(admin))
    }

    /// See [`AccessSession::accessible_accounts_for_company`].
    pub fn accessible_accounts_for_company(
        &self,
        admin: &str,
        company: &str,
    ) -> Result<Vec<String>> {
        self.run("accessible_accounts_for_company", |s| {
            s.accessible_accounts_for_company(admin, company)
        })
    }

    /// See [`AccessSession::admins_for_company`].
    pub fn admins_for_company(&self, company: &str) -> Result<Vec<String>> {
        self.run("admins_for_company", |s| s.admins_for_company(company))
    }

    /// See [`AccessSession::admins_for_resource`].
    pub fn admins_for_resource(&self, resource: &str) -> Result<Vec<String>> {
        self.run("admins_for_resource", |s| s.admins_for_resource(resource))
    }

    /// See [`AccessSession::access_paths`].
    pub fn access_paths(&self, admin: &str, resource: &str) -> Result<AccessCount> {
        self.run("access_paths", |s| s.access_paths(admin, resource))
    }

    /// See [`AccessSession::has_access`].
    pub fn has_access(&self, admin: &str, resource: &str) -> Result<bool> {
        self.run("has_access", |s| s.has_access(admin, resource))
    }

    /// See [`AccessSession::has_access_to_company`].
    pub fn has_access_to_company(&self, admin: &str, company: &str) -> Result<bool> {
        self.run("has_access_to_company", |s| {
            s.has_access_to_company(admin, company)
        })
    }

    /// See [`AccessSession::has_access_indexed`].
    pub fn has_access_indexed(
        &self,
        index: &ResourceIndex,
        admin: &str,
        resource: &str,
    ) -> Result<bool> {
        self.run("has_access_indexed", |s| {
            s.has_access_indexed(index, admin, resource)
        })
    }

    /// See [`AccessSession::company_of_resource`]. Never folded: an unknown
    /// resource has no company to report.
    pub fn company_of_resource(&self, resource: &str) -> Result<String> {
        self.session()?.company_of_resource(resource)
    }

    /// Build a [`ResourceIndex`] from the current graph.
    pub fn build_index(&self) -> Result<ResourceIndex> {
        let session = self.session()?;
        ResourceIndex::build(session.snapshot())
    }
}

impl<S: GraphStore> From<S> for AccessResolver<S> {
    fn from(store: S) -> Self {
        Self::new(store)
    }
}

impl<S> AccessResolver<S> {
    /// Consume the resolver, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }
}

// ============================================================================
// Tests
// ============================================================================
