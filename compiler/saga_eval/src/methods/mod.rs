//! Native method dispatch for container values.
//!
//! The ten container methods are a closed set bound on generic type
//! scopes by the registry; dispatch here is a direct `match` over the
//! method enum - no reflection, no name lookup at call time. The method
//! table itself lives in `saga_ir::builtin_methods`, shared with the
//! registry so signatures and behavior cannot drift apart.

use saga_ir::CollectionMethod;
use saga_types::{TypeKind, TypeRegistry};

use crate::errors::{self, EvalResult};
use crate::value::{ListValue, MapValue, SetValue, Value};

/// Execute a native container method against a receiver value.
pub fn dispatch_collection_method(
    method: CollectionMethod,
    receiver: &Value,
    args: &[Value],
    registry: &TypeRegistry,
) -> EvalResult {
    let def = method.def();
    if args.len() != def.params.len() {
        return Err(errors::wrong_arg_count(
            def.name,
            def.params.len(),
            args.len(),
        ));
    }

    match method {
        CollectionMethod::ListAdd => {
            let list = as_list(receiver, def.name)?;
            list.push(args[0].clone());
            Ok(Value::None)
        }
        CollectionMethod::ListSize => {
            let list = as_list(receiver, def.name)?;
            Ok(Value::Int(len_to_int(list.len())))
        }
        CollectionMethod::ListGet => {
            let list = as_list(receiver, def.name)?;
            let index = match &args[0] {
                Value::Int(i) => *i,
                other => {
                    return Err(errors::type_mismatch("int", other.kind_name()));
                }
            };
            usize::try_from(index)
                .ok()
                .and_then(|i| list.get(i))
                .ok_or_else(|| errors::index_out_of_bounds(index, list.len()))
        }
        CollectionMethod::SetAdd => {
            let set = as_set(receiver, def.name)?;
            Ok(Value::Bool(set.insert(args[0].clone())))
        }
        CollectionMethod::SetSize => {
            let set = as_set(receiver, def.name)?;
            Ok(Value::Int(len_to_int(set.len())))
        }
        CollectionMethod::SetContains => {
            let set = as_set(receiver, def.name)?;
            Ok(Value::Bool(set.contains(&args[0])))
        }
        CollectionMethod::MapAdd => {
            let map = as_map(receiver, def.name)?;
            map.insert(args[0].clone(), args[1].clone());
            Ok(Value::None)
        }
        CollectionMethod::MapSize => {
            let map = as_map(receiver, def.name)?;
            Ok(Value::Int(len_to_int(map.len())))
        }
        CollectionMethod::MapGetKeys => {
            let map = as_map(receiver, def.name)?;
            let key_ty = match registry.kind(map.ty) {
                TypeKind::Map { key, .. } => *key,
                _ => return Err(errors::internal("map value with non-map type")),
            };
            let list_ty = registry
                .lookup_list_type(key_ty)
                .ok_or_else(|| errors::internal("key list type was not created with the map"))?;
            Ok(Value::List(ListValue::from_values(list_ty, map.keys())))
        }
        CollectionMethod::MapGetElements => {
            let map = as_map(receiver, def.name)?;
            let element_ty = match registry.kind(map.ty) {
                TypeKind::Map { element, .. } => *element,
                _ => return Err(errors::internal("map value with non-map type")),
            };
            let list_ty = registry.lookup_list_type(element_ty).ok_or_else(|| {
                errors::internal("element list type was not created with the map")
            })?;
            Ok(Value::List(ListValue::from_values(list_ty, map.elements())))
        }
    }
}

fn as_list<'v>(receiver: &'v Value, method: &str) -> Result<&'v ListValue, crate::EvalError> {
    match receiver {
        Value::List(l) => Ok(l),
        other => Err(errors::wrong_receiver(method, other.kind_name())),
    }
}

fn as_set<'v>(receiver: &'v Value, method: &str) -> Result<&'v SetValue, crate::EvalError> {
    match receiver {
        Value::Set(s) => Ok(s),
        other => Err(errors::wrong_receiver(method, other.kind_name())),
    }
}

fn as_map<'v>(receiver: &'v Value, method: &str) -> Result<&'v MapValue, crate::EvalError> {
    match receiver {
        Value::Map(m) => Ok(m),
        other => Err(errors::wrong_receiver(method, other.kind_name())),
    }
}

fn len_to_int(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
