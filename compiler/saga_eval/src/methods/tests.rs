use super::*;
use pretty_assertions::assert_eq;
use saga_ir::SharedInterner;
use saga_types::BasicKind;

use crate::errors::EvalErrorKind;

fn registry() -> TypeRegistry {
    TypeRegistry::new(&SharedInterner::default())
}

#[test]
fn list_add_size_get() {
    let mut reg = registry();
    let list_ty = reg.list_type(reg.basic(BasicKind::Int));
    let list = Value::List(ListValue::new(list_ty));

    for i in [1, 2, 3] {
        let result =
            dispatch_collection_method(CollectionMethod::ListAdd, &list, &[Value::Int(i)], &reg)
                .expect("add succeeds");
        assert_eq!(result, Value::None);
    }

    let size = dispatch_collection_method(CollectionMethod::ListSize, &list, &[], &reg)
        .expect("size succeeds");
    assert_eq!(size, Value::Int(3));

    let second =
        dispatch_collection_method(CollectionMethod::ListGet, &list, &[Value::Int(1)], &reg)
            .expect("get succeeds");
    assert_eq!(second, Value::Int(2));
}

#[test]
fn list_get_out_of_bounds_is_an_error() {
    let mut reg = registry();
    let list_ty = reg.list_type(reg.basic(BasicKind::Int));
    let list = Value::List(ListValue::from_values(list_ty, vec![Value::Int(1)]));

    let err = dispatch_collection_method(CollectionMethod::ListGet, &list, &[Value::Int(5)], &reg)
        .expect_err("index 5 is out of bounds");
    assert!(matches!(
        err.kind,
        EvalErrorKind::IndexOutOfBounds { index: 5, len: 1 }
    ));

    let err = dispatch_collection_method(CollectionMethod::ListGet, &list, &[Value::Int(-1)], &reg)
        .expect_err("negative index is out of bounds");
    assert!(matches!(err.kind, EvalErrorKind::IndexOutOfBounds { .. }));
}

#[test]
fn wrong_arity_is_rejected_before_dispatch() {
    let mut reg = registry();
    let list_ty = reg.list_type(reg.basic(BasicKind::Int));
    let list = Value::List(ListValue::new(list_ty));

    let err = dispatch_collection_method(CollectionMethod::ListAdd, &list, &[], &reg)
        .expect_err("add needs one argument");
    assert!(matches!(
        err.kind,
        EvalErrorKind::WrongArgCount {
            expected: 1,
            found: 0,
            ..
        }
    ));
}

#[test]
fn wrong_receiver_is_rejected() {
    let reg = registry();
    let err =
        dispatch_collection_method(CollectionMethod::ListSize, &Value::Int(3), &[], &reg)
            .expect_err("int is not a list");
    assert!(matches!(err.kind, EvalErrorKind::WrongReceiver { .. }));
}

#[test]
fn set_add_reports_whether_the_value_was_new() {
    let mut reg = registry();
    let set_ty = reg.set_type(reg.basic(BasicKind::String));
    let set = Value::Set(SetValue::new(set_ty));

    let first = dispatch_collection_method(
        CollectionMethod::SetAdd,
        &set,
        &[Value::string("sword")],
        &reg,
    )
    .expect("add succeeds");
    assert_eq!(first, Value::Bool(true));

    let second = dispatch_collection_method(
        CollectionMethod::SetAdd,
        &set,
        &[Value::string("sword")],
        &reg,
    )
    .expect("add succeeds");
    assert_eq!(second, Value::Bool(false));

    let contains = dispatch_collection_method(
        CollectionMethod::SetContains,
        &set,
        &[Value::string("sword")],
        &reg,
    )
    .expect("contains succeeds");
    assert_eq!(contains, Value::Bool(true));
}

#[test]
fn map_add_and_projections() {
    let mut reg = registry();
    let string = reg.basic(BasicKind::String);
    let int = reg.basic(BasicKind::Int);
    let map_ty = reg.map_type(string, int);
    let map = Value::Map(MapValue::new(map_ty));

    for (k, v) in [("sword", 10), ("shield", 25)] {
        dispatch_collection_method(
            CollectionMethod::MapAdd,
            &map,
            &[Value::string(k), Value::Int(v)],
            &reg,
        )
        .expect("add succeeds");
    }

    let size = dispatch_collection_method(CollectionMethod::MapSize, &map, &[], &reg)
        .expect("size succeeds");
    assert_eq!(size, Value::Int(2));

    let keys = dispatch_collection_method(CollectionMethod::MapGetKeys, &map, &[], &reg)
        .expect("get_keys succeeds");
    match keys {
        Value::List(l) => {
            assert_eq!(l.ty, reg.lookup_list_type(string).expect("key list exists"));
            assert_eq!(l.len(), 2);
        }
        other => panic!("expected list of keys, got {other:?}"),
    }

    let elements = dispatch_collection_method(CollectionMethod::MapGetElements, &map, &[], &reg)
        .expect("get_elements succeeds");
    match elements {
        Value::List(l) => {
            let mut values = l.values();
            values.sort_by_key(|v| match v {
                Value::Int(i) => *i,
                _ => 0,
            });
            assert_eq!(values, vec![Value::Int(10), Value::Int(25)]);
        }
        other => panic!("expected list of elements, got {other:?}"),
    }
}
