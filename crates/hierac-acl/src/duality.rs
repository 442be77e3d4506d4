//! Forward/reverse consistency checks.
//!
//! The forward queries (what can `a` see?) and the reverse queries (who can
//! see `c`?) are evaluated by different walks over the graph, one down from
//! grant targets and one up from the company. They must describe the same
//! relation:
//!
//! - `c ∈ accessible_companies(a)` ⇔ `a ∈ admins_for_company(c)` ⇔
//!   `has_access_to_company(a, c)`
//! - `has_access(a, r)` ⇔ `a ∈ admins_for_resource(r)`, and
//!   `accessible_resources(a)` lists exactly the accessible accounts
//! - an index-backed check agrees with the graph-backed one
//!
//! Each check enumerates every administrator against every company or
//! resource in the session's snapshot, so it is meant for test-sized graphs.

use std::collections::{HashMap, HashSet};
use std::fmt;

use hierac_graph::{GraphSnapshot, NodeLabel};

use crate::error::{Error, Result};
use crate::index::ResourceIndex;
use crate::resolver::AccessSession;

/// One disagreement between two ways of asking the same question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DualityViolation {
    /// Listed by `accessible_companies` but not by `admins_for_company`.
    CompanyForwardOnly {
        /// Administrator name
        admin: String,
        /// Company name
        company: String,
    },
    /// Listed by `admins_for_company` but not by `accessible_companies`.
    CompanyReverseOnly {
        /// Administrator name
        admin: String,
        /// Company name
        company: String,
    },
    /// `has_access` holds but `admins_for_resource` omits the administrator.
    ResourceForwardOnly {
        /// Administrator name
        admin: String,
        /// Resource name
        resource: String,
    },
    /// `admins_for_resource` lists the administrator but `has_access` fails.
    ResourceReverseOnly {
        /// Administrator name
        admin: String,
        /// Resource name
        resource: String,
    },
    /// A list and a boolean check disagree.
    CheckDisagrees {
        /// Administrator name
        admin: String,
        /// Company or resource name
        target: String,
        /// Whether the enumeration listed the target
        listed: bool,
        /// What the boolean check answered
        checked: bool,
    },
    /// An index-backed check disagrees with the graph-backed one.
    IndexDisagrees {
        /// Administrator name
        admin: String,
        /// Resource name
        resource: String,
        /// Index-backed answer
        indexed: bool,
        /// Graph-backed answer
        walked: bool,
    },
}

impl fmt::Display for DualityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompanyForwardOnly { admin, company } => write!(
                f,
                "{admin} sees {company}, but is not among the admins of {company}"
            ),
            Self::CompanyReverseOnly { admin, company } => write!(
                f,
                "{admin} is an admin of {company}, but does not see {company}"
            ),
            Self::ResourceForwardOnly { admin, resource } => write!(
                f,
                "{admin} has access to {resource}, but is not among its admins"
            ),
            Self::ResourceReverseOnly { admin, resource } => write!(
                f,
                "{admin} is an admin of {resource}, but has no access to it"
            ),
            Self::CheckDisagrees {
                admin,
                target,
                listed,
                checked,
            } => write!(
                f,
                "{admin} / {target}: listed = {listed}, but check answered {checked}"
            ),
            Self::IndexDisagrees {
                admin,
                resource,
                indexed,
                walked,
            } => write!(
                f,
                "{admin} / {resource}: indexed check answered {indexed}, graph answered {walked}"
            ),
        }
    }
}

/// Outcome of one or more duality checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DualityReport {
    /// Number of (administrator, target) pairs compared.
    pub pairs_checked: usize,
    /// Every disagreement found.
    pub violations: Vec<DualityViolation>,
}

impl DualityReport {
    /// Whether no violation was found.
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: DualityReport) {
        self.pairs_checked += other.pairs_checked;
        self.violations.extend(other.violations);
    }
}

impl fmt::Display for DualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} violations in {} pairs",
            self.violations.len(),
            self.pairs_checked
        )?;
        for violation in &self.violations {
            writeln!(f, "  - {violation}")?;
        }
        Ok(())
    }
}

/// Resources without an owning company, or whose name is shared by an
/// employee and an account, have no well-defined answer and are skipped.
fn undefined(e: &Error) -> bool {
    e.is_not_found() || matches!(e, Error::AmbiguousResource { .. })
}

fn skip_undefined<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if undefined(&e) => {
            log::debug!("Skipping undefined target: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Checks
// ============================================================================

/// Compare `accessible_companies`, `admins_for_company` and
/// `has_access_to_company` over every administrator and company.
pub fn check_company_duality<G: GraphSnapshot>(
    session: &AccessSession<G>,
) -> Result<DualityReport> {
    let admins = session.administrators()?;
    let companies = session.companies()?;

    let mut reverse: HashMap<&str, HashSet<String>> = HashMap::new();
    for company in &companies {
        let holders = session.admins_for_company(company)?;
        reverse.insert(company.as_str(), holders.into_iter().collect());
    }

    let mut report = DualityReport::default();
    for admin in &admins {
        let forward: HashSet<String> = session.accessible_companies(admin)?.into_iter().collect();
        for company in &companies {
            report.pairs_checked += 1;
            let listed = forward.contains(company);
            let reversed = reverse
                .get(company.as_str())
                .is_some_and(|holders| holders.contains(admin));
            let checked = session.has_access_to_company(admin, company)?;

            match (listed, reversed) {
                (true, false) => report.violations.push(DualityViolation::CompanyForwardOnly {
                    admin: admin.clone(),
                    company: company.clone(),
                }),
                (false, true) => report.violations.push(DualityViolation::CompanyReverseOnly {
                    admin: admin.clone(),
                    company: company.clone(),
                }),
                _ => {}
            }
            if listed != checked {
                report.violations.push(DualityViolation::CheckDisagrees {
                    admin: admin.clone(),
                    target: company.clone(),
                    listed,
                    checked,
                });
            }
        }
    }
    Ok(report)
}

/// Compare `has_access`, `admins_for_resource` and `accessible_resources`
/// over every administrator and resource.
pub fn check_resource_duality<G: GraphSnapshot>(
    session: &AccessSession<G>,
) -> Result<DualityReport> {
    let admins = session.administrators()?;
    let resources = session.resources()?;

    let mut reverse: HashMap<&str, HashSet<String>> = HashMap::new();
    for resource in &resources {
        if let Some(holders) = skip_undefined(session.admins_for_resource(resource))? {
            reverse.insert(resource.as_str(), holders.into_iter().collect());
        }
    }

    let mut report = DualityReport::default();
    for admin in &admins {
        let pairs = session.accessible_resources(admin)?;
        let listed: HashSet<&str> = pairs
            .iter()
            .flat_map(|pair| [pair.employee.as_str(), pair.account.as_str()])
            .collect();
        let listed_accounts: HashSet<&str> =
            pairs.iter().map(|pair| pair.account.as_str()).collect();

        for resource in &resources {
            let Some(holders) = reverse.get(resource.as_str()) else {
                continue;
            };
            let Some(checked) = skip_undefined(session.has_access(admin, resource))? else {
                continue;
            };
            report.pairs_checked += 1;
            let reversed = holders.contains(admin);

            match (checked, reversed) {
                (true, false) => report.violations.push(DualityViolation::ResourceForwardOnly {
                    admin: admin.clone(),
                    resource: resource.clone(),
                }),
                (false, true) => report.violations.push(DualityViolation::ResourceReverseOnly {
                    admin: admin.clone(),
                    resource: resource.clone(),
                }),
                _ => {}
            }

            // Every listed name must check out; every accessible account
            // must be listed. Employees without accounts are never listed.
            let is_listed = listed.contains(resource.as_str());
            let is_account = session
                .snapshot()
                .lookup(NodeLabel::Account, resource)
                .is_ok();
            let must_be_listed = checked && is_account;
            let missing = must_be_listed && !listed_accounts.contains(resource.as_str());
            if (is_listed && !checked) || missing {
                report.violations.push(DualityViolation::CheckDisagrees {
                    admin: admin.clone(),
                    target: resource.clone(),
                    listed: is_listed,
                    checked,
                });
            }
        }
    }
    Ok(report)
}

/// Compare the index-backed check with the graph-backed one over every
/// administrator and resource.
pub fn check_index_agreement<G: GraphSnapshot>(
    session: &AccessSession<G>,
    index: &ResourceIndex,
) -> Result<DualityReport> {
    let admins = session.administrators()?;
    let resources = session.resources()?;

    let mut report = DualityReport::default();
    for admin in &admins {
        for resource in &resources {
            let Some(walked) = skip_undefined(session.has_access(admin, resource))? else {
                continue;
            };
            report.pairs_checked += 1;
            let indexed = match session.has_access_indexed(index, admin, resource) {
                Ok(indexed) => indexed,
                // An index that cannot name the owner answers no
                Err(Error::IndexMiss { .. } | Error::AmbiguousResource { .. }) => false,
                Err(e) => return Err(e),
            };
            if indexed != walked {
                report.violations.push(DualityViolation::IndexDisagrees {
                    admin: admin.clone(),
                    resource: resource.clone(),
                    indexed,
                    walked,
                });
            }
        }
    }
    Ok(report)
}

/// Run every check on `session` and panic with a readable report on any
/// violation.
#[track_caller]
pub fn assert_consistent<G: GraphSnapshot>(session: &AccessSession<G>) {
    let report = ResourceIndex::build(session.snapshot()).and_then(|index| {
        let mut report = check_company_duality(session)?;
        report.merge(check_resource_duality(session)?);
        report.merge(check_index_agreement(session, &index)?);
        Ok(report)
    });
    match report {
        Ok(report) if report.is_consistent() => {}
        Ok(report) => panic!("access relation is inconsistent: {report}"),
        Err(e) => panic!("duality check failed: {e}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
