//! Hop-cap boundaries on a seven-level chain.

use hierac_acl::{AccessResolver, AclConfig};
use hierac_graph::{EdgeEncoding, EdgeKind, GraphSnapshot, NodeLabel, OrgGraphBuilder};

use crate::common::{chain_org, names, sorted};

#[test]
fn test_inherit_reaches_exactly_three_levels() {
    for encoding in EdgeEncoding::ALL {
        let resolver = AccessResolver::new(chain_org(encoding));
        assert_eq!(
            sorted(resolver.accessible_companies("Deep").unwrap()),
            names(&["L0", "L1", "L2", "L3"]),
            "{encoding:?}"
        );
    }
}

#[test]
fn test_denial_four_levels_up_does_not_block() {
    for encoding in EdgeEncoding::ALL {
        let resolver = AccessResolver::new(chain_org(encoding));
        // L3 is 3 hops below the denial on L0 and is blocked; L4 onwards is
        // out of the denial's reach
        assert_eq!(
            sorted(resolver.accessible_companies("Far").unwrap()),
            names(&["L4", "L5", "L6"]),
            "{encoding:?}"
        );
    }
}

#[test]
fn test_direct_grant_beyond_the_cap() {
    let resolver = AccessResolver::new(chain_org(EdgeEncoding::DistinctKinds));
    assert_eq!(
        sorted(resolver.accessible_companies("Mixed").unwrap()),
        names(&["L0", "L1", "L2", "L3", "L5"])
    );
    assert!(!resolver.has_access_to_company("Mixed", "L4").unwrap());
}

#[test]
fn test_reverse_queries_honor_the_cap() {
    let resolver = AccessResolver::new(chain_org(EdgeEncoding::InheritAttribute));
    assert_eq!(
        sorted(resolver.admins_for_company("L3").unwrap()),
        names(&["Deep", "Mixed"])
    );
    assert_eq!(
        sorted(resolver.admins_for_company("L4").unwrap()),
        names(&["Far"])
    );
    assert_eq!(
        sorted(resolver.admins_for_company("L5").unwrap()),
        names(&["Far", "Mixed"])
    );
    assert_eq!(
        sorted(resolver.admins_for_company("L0").unwrap()),
        names(&["Deep", "Mixed"])
    );
}

#[test]
fn test_wider_cap_reaches_further() {
    let config = AclConfig::default().with_max_hops(5);
    let resolver =
        AccessResolver::with_config(chain_org(EdgeEncoding::DistinctKinds), config).unwrap();
    assert_eq!(
        sorted(resolver.accessible_companies("Deep").unwrap()),
        names(&["L0", "L1", "L2", "L3", "L4", "L5"])
    );
    // With five hops the denial on L0 now covers L3..L5 as well
    assert_eq!(
        sorted(resolver.accessible_companies("Far").unwrap()),
        names(&["L6"])
    );
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let graph = OrgGraphBuilder::default()
        .member_of("Ann", "G")
        .allow_inherit("G", "A")
        .child_of("B", "A")
        .child_of("C", "B")
        .child_of("A", "C")
        .build();
    let resolver = AccessResolver::new(graph);
    assert_eq!(
        sorted(resolver.accessible_companies("Ann").unwrap()),
        names(&["A", "B", "C"])
    );
    assert_eq!(
        sorted(resolver.admins_for_company("B").unwrap()),
        names(&["Ann"])
    );

    let session = resolver.session().unwrap();
    let a = session
        .snapshot()
        .lookup(NodeLabel::Company, "A")
        .unwrap();
    let ancestors = session
        .snapshot()
        .ancestors_within_hops(a, EdgeKind::ChildOf, 3)
        .unwrap();
    assert_eq!(ancestors.len(), 3);
}
