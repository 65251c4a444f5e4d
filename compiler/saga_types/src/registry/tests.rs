use super::*;
use pretty_assertions::assert_eq;

fn registry() -> TypeRegistry {
    TypeRegistry::new(&SharedInterner::default())
}

#[test]
fn basic_types_are_seeded_and_resolvable() {
    let reg = registry();
    for kind in BasicKind::ALL {
        let name = reg.interner().intern(kind.name());
        assert_eq!(reg.resolve_type(name), Some(reg.basic(kind)));
    }
}

#[test]
fn list_type_is_canonical_per_element_type() {
    let mut reg = registry();
    let int = reg.basic(BasicKind::Int);

    let a = reg.list_type(int);
    let b = reg.list_type(int);
    assert_eq!(a, b);
    assert_eq!(reg.type_name(a), "int[]");
}

#[test]
fn map_type_is_canonical_per_key_element_pair() {
    let mut reg = registry();
    let int = reg.basic(BasicKind::Int);
    let string = reg.basic(BasicKind::String);

    let a = reg.map_type(string, int);
    let b = reg.map_type(string, int);
    assert_eq!(a, b);
    assert_eq!(reg.type_name(a), "[string -> int]");

    // Swapped parameterization is a different type.
    let swapped = reg.map_type(int, string);
    assert_ne!(a, swapped);
}

#[test]
fn set_type_is_canonical_and_distinct_from_list() {
    let mut reg = registry();
    let float = reg.basic(BasicKind::Float);

    let set = reg.set_type(float);
    assert_eq!(set, reg.set_type(float));
    assert_ne!(set, reg.list_type(float));
    assert_eq!(reg.type_name(set), "float<>");
}

#[test]
fn function_types_share_identity_per_signature() {
    let mut reg = registry();
    let int = reg.basic(BasicKind::Int);
    let boolean = reg.basic(BasicKind::Bool);

    let a = reg.function_type(&[int, int], boolean);
    let b = reg.function_type(&[int, int], boolean);
    let c = reg.function_type(&[int], boolean);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(reg.type_name(a), "fn(int, int) -> bool");
}

#[test]
fn list_type_carries_native_methods() {
    let mut reg = registry();
    let int = reg.basic(BasicKind::Int);
    let list = reg.list_type(int);

    let scope = reg
        .type_data(list)
        .member_scope()
        .expect("list types have a member scope");

    let add = reg.interner().intern("add");
    let size = reg.interner().intern("size");
    let get = reg.interner().intern("get");
    for name in [add, size, get] {
        assert!(
            reg.symbols().resolve_local(scope, name).is_some(),
            "missing native method"
        );
    }

    // `get` takes an int and returns the element type.
    let get_sym = reg
        .symbols()
        .resolve_local(scope, get)
        .expect("get is bound");
    let fn_ty = reg.symbols().symbol(get_sym).ty.expect("get has a type");
    match reg.kind(fn_ty) {
        TypeKind::Function { params, ret } => {
            assert_eq!(params.as_slice(), &[int]);
            assert_eq!(*ret, int);
        }
        other => panic!("expected function type, got {other:?}"),
    }
}

#[test]
fn map_type_pre_creates_key_and_element_lists() {
    let mut reg = registry();
    let int = reg.basic(BasicKind::Int);
    let string = reg.basic(BasicKind::String);

    let _map = reg.map_type(string, int);
    assert!(reg.lookup_list_type(string).is_some());
    assert!(reg.lookup_list_type(int).is_some());
}

#[test]
fn aggregate_type_rejects_taken_names() {
    let mut reg = registry();
    let name = reg.interner().intern("health_component");

    let first = reg.aggregate_type(name);
    assert!(first.is_ok());

    match reg.aggregate_type(name) {
        Err(RegistryError::NameTaken { name }) => assert_eq!(name, "health_component"),
        other => panic!("expected NameTaken, got {other:?}"),
    }
}

#[test]
fn bind_member_rejects_duplicates() {
    let mut reg = registry();
    let int = reg.basic(BasicKind::Int);
    let name = reg.interner().intern("stats_component");
    let member = reg.interner().intern("strength");

    let ty = reg.aggregate_type(name).expect("fresh name");
    let first = reg.bind_member(ty, member, int, SymbolKind::Member);
    assert!(first.is_ok());

    match reg.bind_member(ty, member, int, SymbolKind::Member) {
        Err(RegistryError::DuplicateMember { member, .. }) => assert_eq!(member, "strength"),
        other => panic!("expected DuplicateMember, got {other:?}"),
    }
}

#[test]
fn enum_variants_bind_in_order() {
    let mut reg = registry();
    let name = reg.interner().intern("damage_kind");
    let ty = reg.enum_type(name).expect("fresh name");

    for variant in ["physical", "fire", "poison"] {
        let v = reg.interner().intern(variant);
        reg.bind_variant(ty, v).expect("fresh variant");
    }

    let members = reg.member_symbols(ty);
    let names: Vec<_> = members
        .iter()
        .map(|&id| reg.interner().lookup(reg.symbols().symbol(id).name))
        .collect();
    assert_eq!(names, ["physical", "fire", "poison"]);
}

#[test]
fn prototype_type_is_memoized_and_unnamed_in_scope() {
    let mut reg = registry();
    let name = reg.interner().intern("goblin");
    let base = reg.aggregate_type(name).expect("fresh name");

    let a = reg.prototype_type(base);
    let b = reg.prototype_type(base);
    assert_eq!(a, b);
    // The base keeps the global name.
    assert_eq!(reg.resolve_type(name), Some(base));
}
