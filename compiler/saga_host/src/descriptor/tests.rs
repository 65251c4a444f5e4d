use super::*;
use pretty_assertions::assert_eq;

#[test]
fn dsl_name_inserts_underscores_at_case_boundaries() {
    assert_eq!(dsl_name("HealthComponent"), "health_component");
    assert_eq!(dsl_name("maxPoints"), "max_points");
    assert_eq!(dsl_name("questItem2Reward"), "quest_item2_reward");
}

#[test]
fn dsl_name_leaves_flat_names_alone() {
    assert_eq!(dsl_name("health"), "health");
    assert_eq!(dsl_name("already_snake"), "already_snake");
}

#[test]
fn dsl_name_does_not_split_runs_of_capitals() {
    assert_eq!(dsl_name("HTTPServer"), "httpserver");
}

#[test]
fn enum_descriptor_reverse_lookup_matches_by_equality() {
    #[derive(Clone, PartialEq)]
    enum DamageKind {
        Physical,
        Fire,
    }

    let interner = SharedInterner::default();
    let descriptor = enum_descriptor(
        &interner,
        &[
            ("physical", DamageKind::Physical),
            ("fire", DamageKind::Fire),
        ],
    );

    assert_eq!(descriptor.variants.len(), 2);

    let fire: HostObject = Rc::new(DamageKind::Fire);
    let name = (descriptor.name_of)(&fire).map(|n| interner.lookup(n));
    assert_eq!(name, Some("fire"));

    // A value of a different host type does not match.
    let other: HostObject = Rc::new(42_i64);
    assert_eq!((descriptor.name_of)(&other), None);
}
