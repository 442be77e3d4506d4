//! Common fixtures for hierac-acl integration tests.

use hierac_acl::AccessResolver;
use hierac_graph::{EdgeEncoding, GraphData, OrgGraphBuilder};

/// Company hierarchy of the canonical organization as `(child, parent)`.
pub const HIERARCHY: [(&str, &str); 6] = [
    ("Spinoff", "Acme"),
    ("Skunkworkz", "Startup"),
    ("AcquiredLtd", "BigCompany"),
    ("Subsidiary", "AcquiredLtd"),
    ("One-ManShop", "Subsidiary"),
    ("DevShop", "Subsidiary"),
];

/// Employees as `(employee, company, accounts)`.
pub const STAFF: [(&str, &str, &[&str]); 11] = [
    ("Arnold", "Acme", &["Account-1", "Account-2"]),
    ("Charlie", "Acme", &["Account-3"]),
    ("Emily", "Spinoff", &["Account-4"]),
    ("Gordon", "Startup", &["Account-5"]),
    ("Lucy", "Skunkworkz", &["Account-6"]),
    ("Kate", "BigCompany", &["Account-7"]),
    ("Alister", "AcquiredLtd", &["Account-8"]),
    ("Mary", "Subsidiary", &["Account-9"]),
    ("Eve", "One-ManShop", &["Account-10"]),
    ("Bill", "DevShop", &["Account-11"]),
    ("Fred", "DevShop", &[]),
];

/// The canonical organization.
///
/// - Ben: inherit on Acme and Startup
/// - Sarah: direct on Acme, inherit on Startup, deny on Skunkworkz
/// - Liz: inherit on BigCompany, deny on AcquiredLtd, direct on One-ManShop
/// - Phil: inherit on Subsidiary
pub fn canonical_org(encoding: EdgeEncoding) -> GraphData {
    let mut builder = OrgGraphBuilder::new(encoding)
        .member_of("Ben", "Group1")
        .member_of("Ben", "Group3")
        .member_of("Sarah", "Group2")
        .member_of("Sarah", "Group3")
        .member_of("Liz", "Group4")
        .member_of("Liz", "Group5")
        .member_of("Liz", "Group6")
        .member_of("Phil", "Group7")
        .allow_inherit("Group1", "Acme")
        .allow_direct("Group2", "Acme")
        .deny("Group2", "Skunkworkz")
        .allow_inherit("Group3", "Startup")
        .allow_inherit("Group4", "BigCompany")
        .deny("Group5", "AcquiredLtd")
        .allow_direct("Group6", "One-ManShop")
        .allow_inherit("Group7", "Subsidiary");

    for (child, parent) in HIERARCHY {
        builder = builder.child_of(child, parent);
    }
    for (employee, company, accounts) in STAFF {
        builder = builder.works_for(employee, company);
        for account in accounts {
            builder = builder.has_account(employee, account);
        }
    }
    builder.build()
}

/// A resolver over the canonical organization.
pub fn canonical_resolver(encoding: EdgeEncoding) -> AccessResolver<GraphData> {
    AccessResolver::new(canonical_org(encoding))
}

/// Chain `L0 <- L1 <- ... <- L6`, with
///
/// - Deep: inherit on L0
/// - Far: inherit on L3, deny on L0
/// - Mixed: inherit on L0, direct on L5
pub fn chain_org(encoding: EdgeEncoding) -> GraphData {
    let mut builder = OrgGraphBuilder::new(encoding)
        .member_of("Deep", "Deep-Group")
        .allow_inherit("Deep-Group", "L0")
        .member_of("Far", "Far-Allow")
        .member_of("Far", "Far-Deny")
        .allow_inherit("Far-Allow", "L3")
        .deny("Far-Deny", "L0")
        .member_of("Mixed", "Mixed-Group")
        .allow_inherit("Mixed-Group", "L0")
        .allow_direct("Mixed-Group", "L5");
    for level in 1..=6 {
        builder = builder.child_of(&format!("L{level}"), &format!("L{}", level - 1));
    }
    builder.build()
}

/// Sort for order-insensitive comparison.
pub fn sorted<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items
}

/// Sorted owned names.
pub fn names(items: &[&str]) -> Vec<String> {
    sorted(items.iter().map(|s| s.to_string()).collect())
}
