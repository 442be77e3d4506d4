//! Forward queries over the canonical organization.

use hierac_acl::duality::assert_consistent;
use hierac_acl::{AccessCount, ResourcePair};
use hierac_graph::{Edge, EdgeEncoding, EdgeKind, NodeLabel, OrgGraphBuilder, SharedGraph};

use crate::common::{canonical_org, canonical_resolver, names, sorted};

fn pair(employee: &str, account: &str) -> ResourcePair {
    ResourcePair {
        employee: employee.to_string(),
        account: account.to_string(),
    }
}

// ============================================================================
// Accessible companies
// ============================================================================

#[test]
fn test_ben_sees_both_inherited_trees() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        assert_eq!(
            sorted(resolver.accessible_companies("Ben").unwrap()),
            names(&["Acme", "Spinoff", "Startup", "Skunkworkz"]),
            "{encoding:?}"
        );
    }
}

#[test]
fn test_sarah_denial_removes_skunkworkz() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        // Acme is direct, so Spinoff is not reached
        assert_eq!(
            sorted(resolver.accessible_companies("Sarah").unwrap()),
            names(&["Startup", "Acme"]),
            "{encoding:?}"
        );
    }
}

#[test]
fn test_liz_denial_leaves_direct_grant() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        assert_eq!(
            sorted(resolver.accessible_companies("Liz").unwrap()),
            names(&["BigCompany", "One-ManShop"]),
            "{encoding:?}"
        );
    }
}

#[test]
fn test_phil_inherits_from_subsidiary() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        assert_eq!(
            sorted(resolver.accessible_companies("Phil").unwrap()),
            names(&["Subsidiary", "One-ManShop", "DevShop"]),
            "{encoding:?}"
        );
    }
}

#[test]
fn test_results_have_no_duplicates() {
    let resolver = canonical_resolver(EdgeEncoding::DistinctKinds);
    for admin in ["Ben", "Sarah", "Liz", "Phil"] {
        let companies = resolver.accessible_companies(admin).unwrap();
        let mut deduped = companies.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(companies.len(), deduped.len(), "{admin}");
    }
}

// ============================================================================
// Accessible resources
// ============================================================================

#[test]
fn test_sarah_resources() {
    let resolver = canonical_resolver(EdgeEncoding::InheritAttribute);
    assert_eq!(
        sorted(resolver.accessible_resources("Sarah").unwrap()),
        sorted(vec![
            pair("Gordon", "Account-5"),
            pair("Arnold", "Account-1"),
            pair("Arnold", "Account-2"),
            pair("Charlie", "Account-3"),
        ])
    );
}

#[test]
fn test_phil_resources_skip_employees_without_accounts() {
    let resolver = canonical_resolver(EdgeEncoding::DistinctKinds);
    let pairs = resolver.accessible_resources("Phil").unwrap();
    assert_eq!(
        sorted(pairs.clone()),
        sorted(vec![
            pair("Mary", "Account-9"),
            pair("Eve", "Account-10"),
            pair("Bill", "Account-11"),
        ])
    );
    assert!(pairs.iter().all(|p| p.employee != "Fred"));
}

#[test]
fn test_accessible_accounts_for_company() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        assert_eq!(
            sorted(
                resolver
                    .accessible_accounts_for_company("Ben", "Acme")
                    .unwrap()
            ),
            names(&["Account-1", "Account-2", "Account-3", "Account-4"])
        );
        // Spinoff is not reachable through a direct grant on Acme
        assert_eq!(
            sorted(
                resolver
                    .accessible_accounts_for_company("Sarah", "Acme")
                    .unwrap()
            ),
            names(&["Account-1", "Account-2", "Account-3"])
        );
        // The denied middle of the tree is skipped, the direct leaf is kept
        assert_eq!(
            sorted(
                resolver
                    .accessible_accounts_for_company("Liz", "BigCompany")
                    .unwrap()
            ),
            names(&["Account-7", "Account-10"])
        );
        assert!(
            resolver
                .accessible_accounts_for_company("Phil", "Acme")
                .unwrap()
                .is_empty()
        );
    }
}

// ============================================================================
// Access checks
// ============================================================================

#[test]
fn test_liz_reaches_account_10_directly() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        assert!(resolver.has_access("Liz", "Account-10").unwrap());
        // The inherit grant on BigCompany is blocked by the AcquiredLtd denial
        assert_eq!(
            resolver.access_paths("Liz", "Account-10").unwrap(),
            AccessCount {
                inherit_paths: 0,
                direct_paths: 1
            }
        );
    }
}

#[test]
fn test_has_access_table() {
    let cases = [
        ("Ben", "Account-6", true),
        ("Sarah", "Account-6", false),
        ("Sarah", "Lucy", false),
        ("Sarah", "Account-4", false),
        ("Sarah", "Charlie", true),
        ("Liz", "Account-7", true),
        ("Liz", "Account-8", false),
        ("Liz", "Account-9", false),
        ("Liz", "Account-11", false),
        ("Phil", "Account-11", true),
        ("Phil", "Fred", true),
        ("Phil", "Account-7", false),
    ];
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        for (admin, resource, expected) in cases {
            assert_eq!(
                resolver.has_access(admin, resource).unwrap(),
                expected,
                "{admin} -> {resource} ({encoding:?})"
            );
        }
    }
}

#[test]
fn test_access_paths_counts_both_groups() {
    let resolver = canonical_resolver(EdgeEncoding::DistinctKinds);
    // Ben reaches Acme through Group1 only; Sarah through Group2 directly
    assert_eq!(
        resolver.access_paths("Ben", "Account-1").unwrap(),
        AccessCount {
            inherit_paths: 1,
            direct_paths: 0
        }
    );
    assert_eq!(
        resolver.access_paths("Sarah", "Account-1").unwrap(),
        AccessCount {
            inherit_paths: 0,
            direct_paths: 1
        }
    );
}

#[test]
fn test_company_of_resource() {
    let resolver = canonical_resolver(EdgeEncoding::DistinctKinds);
    assert_eq!(resolver.company_of_resource("Eve").unwrap(), "One-ManShop");
    assert_eq!(
        resolver.company_of_resource("Account-10").unwrap(),
        "One-ManShop"
    );
}

// ============================================================================
// Encodings
// ============================================================================

#[test]
fn test_mixed_encodings_in_one_graph() {
    let graph = OrgGraphBuilder::new(EdgeEncoding::DistinctKinds)
        .member_of("Ann", "G")
        .allow_inherit("G", "Acme")
        .raw_edge(
            (NodeLabel::Group, "G"),
            (NodeLabel::Company, "Startup"),
            Edge::allowed(false),
        )
        .child_of("Spinoff", "Acme")
        .child_of("Skunkworkz", "Startup")
        .build();
    let resolver = hierac_acl::AccessResolver::new(graph);
    assert_eq!(
        sorted(resolver.accessible_companies("Ann").unwrap()),
        names(&["Acme", "Spinoff", "Startup"])
    );
}

#[test]
fn test_allowed_edge_without_attribute_grants_nothing() {
    let graph = OrgGraphBuilder::default()
        .member_of("Ann", "G")
        .raw_edge(
            (NodeLabel::Group, "G"),
            (NodeLabel::Company, "Acme"),
            Edge::new(EdgeKind::Allowed),
        )
        .build();
    let resolver = hierac_acl::AccessResolver::new(graph);
    assert!(resolver.accessible_companies("Ann").unwrap().is_empty());
    assert!(resolver.admins_for_company("Acme").unwrap().is_empty());
    assert!(!resolver.has_access_to_company("Ann", "Acme").unwrap());
}

// ============================================================================
// Consistency
// ============================================================================

#[test]
fn test_canonical_org_is_consistent() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        let session = resolver.session().unwrap();
        assert_consistent(&session);
    }
}

#[test]
fn test_index_backed_checks_match() {
    let resolver = canonical_resolver(EdgeEncoding::InheritAttribute);
    let index = resolver.build_index().unwrap();
    assert_eq!(index.stats().employees, 11);
    assert_eq!(index.stats().accounts, 11);

    for admin in ["Ben", "Sarah", "Liz", "Phil"] {
        for resource in ["Account-4", "Account-6", "Account-8", "Account-10", "Fred"] {
            let indexed = resolver.has_access_indexed(&index, admin, resource);
            assert_eq!(
                indexed.unwrap(),
                resolver.has_access(admin, resource).unwrap(),
                "{admin} -> {resource}"
            );
        }
    }
}

#[test]
fn test_concurrent_queries_over_shared_graph() {
    let shared = SharedGraph::new(canonical_org(EdgeEncoding::DistinctKinds));
    let handles: Vec<_> = ["Ben", "Sarah", "Liz", "Phil"]
        .into_iter()
        .map(|admin| {
            let resolver = hierac_acl::AccessResolver::new(shared.clone());
            std::thread::spawn(move || {
                (
                    admin,
                    sorted(resolver.accessible_companies(admin).unwrap()),
                )
            })
        })
        .collect();

    let sequential = canonical_resolver(EdgeEncoding::DistinctKinds);
    for handle in handles {
        let (admin, companies) = handle.join().unwrap();
        assert_eq!(
            companies,
            sorted(sequential.accessible_companies(admin).unwrap())
        );
    }
}
