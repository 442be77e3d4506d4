//! Reverse queries over the canonical organization.

use hierac_acl::{AccessResolver, AclConfig, Error, OrEmpty};
use hierac_graph::EdgeEncoding;

use crate::common::{canonical_org, canonical_resolver, names, sorted};

#[test]
fn test_admins_for_acquired_ltd_is_empty() {
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        let admins = resolver.admins_for_company("AcquiredLtd").unwrap();
        assert!(admins.is_empty(), "{encoding:?}");
    }
}

#[test]
fn test_admins_for_every_company() {
    let expected: [(&str, &[&str]); 9] = [
        ("Acme", &["Ben", "Sarah"]),
        ("Spinoff", &["Ben"]),
        ("Startup", &["Ben", "Sarah"]),
        ("Skunkworkz", &["Ben"]),
        ("BigCompany", &["Liz"]),
        ("AcquiredLtd", &[]),
        ("Subsidiary", &["Phil"]),
        ("One-ManShop", &["Liz", "Phil"]),
        ("DevShop", &["Phil"]),
    ];
    for encoding in EdgeEncoding::ALL {
        let resolver = canonical_resolver(encoding);
        for (company, admins) in expected {
            assert_eq!(
                sorted(resolver.admins_for_company(company).unwrap()),
                names(admins),
                "{company} ({encoding:?})"
            );
        }
    }
}

#[test]
fn test_admins_for_resource() {
    let resolver = canonical_resolver(EdgeEncoding::InheritAttribute);
    assert_eq!(
        sorted(resolver.admins_for_resource("Account-10").unwrap()),
        names(&["Liz", "Phil"])
    );
    assert_eq!(
        sorted(resolver.admins_for_resource("Emily").unwrap()),
        names(&["Ben"])
    );
    assert_eq!(
        sorted(resolver.admins_for_resource("Account-3").unwrap()),
        names(&["Ben", "Sarah"])
    );
    let admins = resolver.admins_for_resource("Account-8").unwrap();
    assert!(admins.is_empty());
}

// ============================================================================
// Unknown and malformed names
// ============================================================================

#[test]
fn test_unknown_names_are_distinguishable_from_no_access() {
    let resolver = canonical_resolver(EdgeEncoding::DistinctKinds);

    let err = resolver.admins_for_company("Initech").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Company not found: Initech");

    let err = resolver.admins_for_resource("Account-99").unwrap_err();
    assert!(err.is_not_found());

    // A known company nobody can see is an empty answer, not an error
    let admins = resolver.admins_for_company("AcquiredLtd").unwrap();
    assert!(admins.is_empty());
}

#[test]
fn test_or_empty_at_the_boundary() {
    let resolver = canonical_resolver(EdgeEncoding::DistinctKinds);
    assert!(
        resolver
            .admins_for_company("Initech")
            .or_empty()
            .unwrap()
            .is_empty()
    );
    assert!(
        !resolver
            .has_access("Nobody", "Account-1")
            .or_empty()
            .unwrap()
    );
}

#[test]
fn test_folding_configured_on_the_resolver() {
    let config = AclConfig::default().with_fold_not_found(true);
    let resolver =
        AccessResolver::with_config(canonical_org(EdgeEncoding::DistinctKinds), config).unwrap();
    assert!(resolver.admins_for_company("Initech").unwrap().is_empty());
    let admins = resolver.admins_for_resource("Account-99").unwrap();
    assert!(admins.is_empty());
    assert!(resolver.accessible_resources("Nobody").unwrap().is_empty());
}

#[test]
fn test_malformed_names_fail_fast() {
    let config = AclConfig::default().with_fold_not_found(true);
    let resolver =
        AccessResolver::with_config(canonical_org(EdgeEncoding::DistinctKinds), config).unwrap();
    for name in ["", "   ", "Ac\u{0}me"] {
        let err = resolver.admins_for_company(name).unwrap_err();
        assert!(
            matches!(err, Error::Core(hierac_core::Error::InvalidArgument { .. })),
            "{name:?}: {err}"
        );
        assert!(!err.is_recoverable());
    }
}
