use super::*;
use pretty_assertions::assert_eq;
use std::rc::Rc;

use saga_eval::{HostObject, Value};
use saga_ir::SharedInterner;
use saga_types::BasicKind;

use crate::descriptor::MemberDescriptor;
use crate::testing::{fixture, DamageKind, Health};

#[test]
fn register_type_binds_member_symbols() {
    let f = fixture();
    let scope = f
        .types
        .type_data(f.health_ty)
        .member_scope()
        .expect("aggregates have a member scope");

    let max_points = f.interner.intern("max_points");
    let on_death = f.interner.intern("on_death");
    let max_points_sym = f
        .types
        .symbols()
        .resolve_local(scope, max_points)
        .expect("data member is bound");
    let on_death_sym = f
        .types
        .symbols()
        .resolve_local(scope, on_death)
        .expect("callback member is bound");

    assert_eq!(
        f.types.symbols().symbol(max_points_sym).kind,
        SymbolKind::Member
    );
    assert_eq!(
        f.types.symbols().symbol(on_death_sym).kind,
        SymbolKind::Callback
    );
}

#[test]
fn registered_type_is_resolvable_by_dsl_name() {
    let f = fixture();
    let name = f.interner.intern("health_component");
    assert_eq!(f.types.resolve_type(name), Some(f.health_ty));
    assert_eq!(
        f.host.dsl_type_of(std::any::TypeId::of::<std::cell::RefCell<Health>>()),
        Some(f.health_ty)
    );
}

#[test]
fn duplicate_class_registration_is_rejected() {
    let mut f = fixture();
    let descriptor = TypeDescriptor::new(
        f.interner.intern("second_health"),
        Vec::new(),
        Construct::Structural,
    );
    match f
        .host
        .register_type::<std::cell::RefCell<Health>>(&mut f.types, descriptor)
    {
        Err(RegisterError::DuplicateClass { .. }) => {}
        other => panic!("expected DuplicateClass, got {other:?}"),
    }
}

#[test]
fn duplicate_type_name_is_rejected_via_the_type_registry() {
    let mut f = fixture();
    struct OtherComponent;
    let descriptor = TypeDescriptor::new(
        f.interner.intern("health_component"),
        Vec::new(),
        Construct::Structural,
    );
    match f
        .host
        .register_type::<OtherComponent>(&mut f.types, descriptor)
    {
        Err(RegisterError::Registry(_)) => {}
        other => panic!("expected a registry error, got {other:?}"),
    }
}

#[test]
fn constructor_descriptor_requires_setters() {
    let interner = SharedInterner::default();
    let mut types = TypeRegistry::new(&interner);
    let mut host = HostRegistry::new();
    let int = types.basic(BasicKind::Int);

    struct Bare;
    let descriptor = TypeDescriptor::new(
        interner.intern("bare_component"),
        vec![MemberDescriptor::data(interner.intern("points"), int)],
        Construct::Constructor {
            context_params: Vec::new(),
            invoke: Rc::new(|_args: &[Option<HostObject>]| Ok(Rc::new(Bare) as HostObject)),
        },
    );

    match host.register_type::<Bare>(&mut types, descriptor) {
        Err(RegisterError::MissingSetter { member, .. }) => assert_eq!(member, "points"),
        other => panic!("expected MissingSetter, got {other:?}"),
    }
}

#[test]
fn callback_member_must_have_a_function_type() {
    let interner = SharedInterner::default();
    let mut types = TypeRegistry::new(&interner);
    let mut host = HostRegistry::new();
    let int = types.basic(BasicKind::Int);

    struct Bare;
    let descriptor = TypeDescriptor::new(
        interner.intern("bare_component"),
        vec![MemberDescriptor::callback(
            interner.intern("on_hit"),
            int,
            crate::callback::CallbackShape::Consumer { arity: 0 },
        )],
        Construct::Structural,
    );

    match host.register_type::<Bare>(&mut types, descriptor) {
        Err(RegisterError::CallbackNotAFunction { member, .. }) => assert_eq!(member, "on_hit"),
        other => panic!("expected CallbackNotAFunction, got {other:?}"),
    }
}

#[test]
fn duplicate_descriptor_member_is_rejected() {
    let interner = SharedInterner::default();
    let mut types = TypeRegistry::new(&interner);
    let mut host = HostRegistry::new();
    let int = types.basic(BasicKind::Int);
    let member = interner.intern("points");

    struct Bare;
    let descriptor = TypeDescriptor::new(
        interner.intern("bare_component"),
        vec![
            MemberDescriptor::data(member, int),
            MemberDescriptor::data(member, int),
        ],
        Construct::Structural,
    );

    match host.register_type::<Bare>(&mut types, descriptor) {
        Err(RegisterError::DuplicateMember { member, .. }) => assert_eq!(member, "points"),
        other => panic!("expected DuplicateMember, got {other:?}"),
    }
}

#[test]
fn extension_property_symbol_carries_settable_flags() {
    let f = fixture();
    let scope = f
        .types
        .type_data(f.health_ty)
        .member_scope()
        .expect("aggregates have a member scope");
    let rank = f.interner.intern("rank");
    let symbol = f
        .types
        .symbols()
        .resolve_local(scope, rank)
        .expect("property is bound");

    match f.types.symbols().symbol(symbol).kind {
        SymbolKind::Property {
            settable, gettable, ..
        } => {
            assert!(settable);
            assert!(!gettable);
        }
        other => panic!("expected a property symbol, got {other:?}"),
    }
}

#[test]
fn extension_method_requires_a_function_type() {
    let mut f = fixture();
    let int = f.types.basic(BasicKind::Int);
    let method = crate::descriptor::ExtensionMethod {
        name: f.interner.intern("drain"),
        ty: int,
        invoke: Rc::new(|_obj: &HostObject, _args: &[Option<HostObject>]| {
            Ok(Rc::new(0_i64) as HostObject)
        }),
    };
    match f.host.register_method(&mut f.types, f.health_ty, method) {
        Err(RegisterError::NotAFunctionType { name }) => assert_eq!(name, "drain"),
        other => panic!("expected NotAFunctionType, got {other:?}"),
    }
}

#[test]
fn extension_method_with_function_type_binds() {
    let mut f = fixture();
    let int = f.types.basic(BasicKind::Int);
    let fn_ty = f.types.function_type(&[int], int);
    let method = crate::descriptor::ExtensionMethod {
        name: f.interner.intern("drain"),
        ty: fn_ty,
        invoke: Rc::new(|_obj: &HostObject, _args: &[Option<HostObject>]| {
            Ok(Rc::new(0_i64) as HostObject)
        }),
    };
    let id = f
        .host
        .register_method(&mut f.types, f.health_ty, method)
        .expect("function-typed extension method registers");
    assert!(f.host.extension_method(id).is_some());
}

#[test]
fn duplicate_translator_is_rejected() {
    let mut f = fixture();
    let translator: crate::TranslatorFn = Rc::new(|_obj, _t| Ok(Value::Int(0)));
    f.host
        .register_translator::<DamageKind>(translator.clone())
        .expect("first translator registers");
    match f.host.register_translator::<DamageKind>(translator) {
        Err(RegisterError::DuplicateTranslator { .. }) => {}
        other => panic!("expected DuplicateTranslator, got {other:?}"),
    }
}
