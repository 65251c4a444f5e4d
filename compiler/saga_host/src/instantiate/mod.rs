//! The value-to-object instantiator.
//!
//! Converts interpreted value trees into host objects, dispatching on
//! the value's declared type kind:
//!
//! 1. directly convertible kinds (basic, list, set, map, enum,
//!    function) go through dedicated routines - no constructor search
//! 2. adapted aggregates invoke their registered builder function with
//!    positionally assembled, marshalled arguments
//! 3. plain aggregates bound to a descriptor construct through the
//!    context-only constructor, then write back exactly the *dirty*
//!    members - implicit defaults stay whatever the constructor set
//! 4. record aggregates construct once from all members in declaration
//!    order, and never partially
//! 5. prototype-kind values are not instantiated here at all; their
//!    materialization belongs to the interpreter's native `instantiate`
//!    entry point
//!
//! The context map is flat and caller-bracketed: push the owning
//! entity, instantiate its component values, remove it. The
//! instantiator never pushes or pops on its own, and conversion never
//! retries - a failure propagates so the caller can halt that one
//! content item.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use saga_eval::{
    AggregateValue, EnumValue, FunctionValue, HostObject, ListValue, MapValue, MemorySpace,
    SetValue, Value, NAME_MEMBER,
};
use saga_ir::Name;
use saga_types::{ExtensionId, SymbolKind, TypeKind};
use tracing::trace;

use crate::callback::{CallbackAdapterBuilder, CallbackShape};
use crate::descriptor::{BuilderParam, Construct, ConstructFn, MemberSpec, TypeDescriptor};
use crate::env::HostEnv;
use crate::error::InstantiateError;

/// Converts values into host objects for one interpreter session.
pub struct Instantiator {
    env: HostEnv,
    /// Named host objects currently in scope for context parameters.
    /// Shared mutable state with no locking; correctness is the
    /// caller's push-before-use / remove-after-use discipline.
    context: FxHashMap<Name, HostObject>,
}

impl Instantiator {
    pub fn new(env: HostEnv) -> Self {
        Instantiator {
            env,
            context: FxHashMap::default(),
        }
    }

    /// The session environment.
    pub fn env(&self) -> &HostEnv {
        &self.env
    }

    /// Push a host object into the context under a name.
    pub fn push_context(&mut self, name: &str, member: HostObject) {
        let name = self.env.interner.intern(name);
        self.context.insert(name, member);
    }

    /// Remove a context entry.
    pub fn remove_context(&mut self, name: &str) {
        let name = self.env.interner.intern(name);
        self.context.remove(&name);
    }

    /// Convert a value into a host object.
    ///
    /// `Ok(None)` means the value has no host counterpart: `none`
    /// values, purely structural aggregates, and prototype-kind values
    /// (whose materialization is the interpreter's job).
    pub fn instantiate(&self, value: &Value) -> Result<Option<HostObject>, InstantiateError> {
        convert(&self.env, &self.context, value)
    }

    /// Convert a list value into an ordered host collection.
    pub fn instantiate_list(
        &self,
        list: &ListValue,
    ) -> Result<Vec<HostObject>, InstantiateError> {
        convert_list(&self.env, &self.context, list)
    }

    /// Convert a set value into an unordered host collection.
    pub fn instantiate_set(&self, set: &SetValue) -> Result<Vec<HostObject>, InstantiateError> {
        convert_set(&self.env, &self.context, set)
    }

    /// Convert a map value into host key/element pairs.
    pub fn instantiate_map(
        &self,
        map: &MapValue,
    ) -> Result<Vec<(HostObject, HostObject)>, InstantiateError> {
        convert_map(&self.env, &self.context, map)
    }
}

/// Conversion core, shared with callback adapters (which run it with an
/// empty context).
pub(crate) fn convert(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    value: &Value,
) -> Result<Option<HostObject>, InstantiateError> {
    match value {
        Value::None => Ok(None),
        Value::Bool(b) => Ok(Some(Rc::new(*b))),
        Value::Int(i) => Ok(Some(Rc::new(*i))),
        Value::Float(x) => Ok(Some(Rc::new(*x))),
        Value::Str(s) => Ok(Some(Rc::new(s.as_str().to_owned()))),
        Value::Graph(handle) => Ok(Some(handle.clone())),
        Value::List(list) => {
            let converted: HostObject = Rc::new(convert_list(env, context, list)?);
            Ok(Some(converted))
        }
        Value::Set(set) => {
            let converted: HostObject = Rc::new(convert_set(env, context, set)?);
            Ok(Some(converted))
        }
        Value::Map(map) => {
            let converted: HostObject = Rc::new(convert_map(env, context, map)?);
            Ok(Some(converted))
        }
        Value::Enum(value) => convert_enum(env, value).map(Some),
        Value::Function(value) => convert_function(env, value).map(Some),
        Value::Aggregate(value) => convert_aggregate(env, context, value),
    }
}

fn convert_list(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    list: &ListValue,
) -> Result<Vec<HostObject>, InstantiateError> {
    let mut out = Vec::with_capacity(list.len());
    for value in list.values() {
        let converted = convert(env, context, &value)?
            .ok_or(InstantiateError::UnconvertibleElement { container: "list" })?;
        out.push(converted);
    }
    Ok(out)
}

fn convert_set(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    set: &SetValue,
) -> Result<Vec<HostObject>, InstantiateError> {
    let mut out = Vec::with_capacity(set.len());
    for value in set.values() {
        let converted = convert(env, context, &value)?
            .ok_or(InstantiateError::UnconvertibleElement { container: "set" })?;
        out.push(converted);
    }
    Ok(out)
}

fn convert_map(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    map: &MapValue,
) -> Result<Vec<(HostObject, HostObject)>, InstantiateError> {
    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map.entries() {
        let key = convert(env, context, &key)?
            .ok_or(InstantiateError::UnconvertibleElement { container: "map" })?;
        let value = convert(env, context, &value)?
            .ok_or(InstantiateError::UnconvertibleElement { container: "map" })?;
        out.push((key, value));
    }
    Ok(out)
}

fn convert_enum(env: &HostEnv, value: &EnumValue) -> Result<HostObject, InstantiateError> {
    let enum_name = env.types.borrow().type_name(value.ty);
    let variant_name = env.types.borrow().symbols().symbol(value.variant).name;
    let Some(descriptor) = env.host.borrow().enum_descriptor(value.ty) else {
        return Err(InstantiateError::MissingEnumDescriptor {
            enum_name: enum_name.to_owned(),
        });
    };
    // Exact name match against the host variant list. The type builder
    // guarantees variant symbols mirror the host variants, so a miss is
    // an invariant violation, not author error.
    descriptor
        .variants
        .iter()
        .find(|(name, _)| *name == variant_name)
        .map(|(_, handle)| handle.clone())
        .ok_or_else(|| InstantiateError::UnknownEnumVariant {
            enum_name: enum_name.to_owned(),
            variant: env.interner.lookup(variant_name).to_owned(),
        })
}

fn convert_function(env: &HostEnv, value: &FunctionValue) -> Result<HostObject, InstantiateError> {
    let shape = CallbackShape::infer(value.ty, &env.types.borrow()).ok_or_else(|| {
        InstantiateError::CallbackShapeMismatch {
            member: "<function>".to_owned(),
            detail: "the value's declared type is not a function type".to_owned(),
        }
    })?;
    let adapter = CallbackAdapterBuilder::new(env.clone()).build(value, shape, "<function>")?;
    Ok(Rc::new(adapter))
}

fn convert_aggregate(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    value: &AggregateValue,
) -> Result<Option<HostObject>, InstantiateError> {
    // A memory space that already encapsulates a host object needs no
    // second construction.
    if let Some(host) = &value.host {
        return Ok(Some(host.clone()));
    }

    let kind = env.types.borrow().kind(value.ty).clone();
    match kind {
        TypeKind::Prototype { .. } => Ok(None),
        TypeKind::AggregateAdapted { builder, .. } => {
            convert_via_builder(env, context, value, builder)
        }
        TypeKind::Aggregate { .. } => {
            let Some(descriptor) = env.host.borrow().descriptor(value.ty) else {
                // Purely structural content type: no host counterpart.
                return Ok(None);
            };
            match descriptor.construct.clone() {
                Construct::Structural => Ok(None),
                Construct::Record { invoke } => {
                    build_record(env, context, value, &descriptor, &invoke)
                }
                Construct::Constructor {
                    context_params,
                    invoke,
                } => build_class(env, context, value, &descriptor, &context_params, &invoke),
            }
        }
        _ => Err(InstantiateError::Internal {
            detail: format!(
                "aggregate value declared with non-aggregate type '{}'",
                env.types.borrow().type_name(value.ty)
            ),
        }),
    }
}

fn convert_via_builder(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    value: &AggregateValue,
    builder: saga_types::BuilderId,
) -> Result<Option<HostObject>, InstantiateError> {
    let type_name = env.types.borrow().type_name(value.ty);
    let Some(descriptor) = env.host.borrow().builder(builder) else {
        return Err(InstantiateError::NoBuilder {
            type_name: type_name.to_owned(),
        });
    };
    trace!(type_name, "instantiating through builder");

    let mut args = Vec::with_capacity(descriptor.params.len());
    {
        let space = value.space.borrow();
        for param in &descriptor.params {
            match param {
                BuilderParam::Member { name, .. } => {
                    let Some(member_value) = space.resolve(*name) else {
                        return Err(InstantiateError::MissingBuilderMember {
                            type_name: type_name.to_owned(),
                            parameter: env.interner.lookup(*name).to_owned(),
                        });
                    };
                    args.push(convert(env, context, &member_value)?);
                }
                BuilderParam::Context { key, .. } => {
                    // Absent context entries marshal as unset, exactly
                    // like unassigned members.
                    args.push(context.get(key).cloned());
                }
                BuilderParam::DefinitionName => {
                    let name_member = env.interner.intern(NAME_MEMBER);
                    let name_value = space.resolve(name_member).unwrap_or(Value::None);
                    args.push(convert(env, context, &name_value)?);
                }
            }
        }
    }

    (descriptor.invoke)(&args)
        .map(Some)
        .map_err(|detail| InstantiateError::BuilderFailed {
            type_name: type_name.to_owned(),
            detail,
        })
}

fn build_record(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    value: &AggregateValue,
    descriptor: &TypeDescriptor,
    invoke: &ConstructFn,
) -> Result<Option<HostObject>, InstantiateError> {
    let type_name = env.types.borrow().type_name(value.ty);
    trace!(type_name, "instantiating as record");

    let mut args = Vec::with_capacity(descriptor.members.len());
    {
        let space = value.space.borrow();
        // All-arguments construction in member declaration order; a
        // missing or unassigned field means no record at all.
        for member in &descriptor.members {
            let member_name = env.interner.lookup(member.name);
            let member_value = space.resolve(member.name).filter(|v| !v.is_none());
            let Some(member_value) = member_value else {
                return Err(InstantiateError::MissingRecordField {
                    type_name: type_name.to_owned(),
                    field: member_name.to_owned(),
                });
            };
            match &member.spec {
                MemberSpec::Callback(shape) => {
                    let adapter = build_member_adapter(env, &member_value, *shape, member_name)?;
                    let handle: HostObject = Rc::new(adapter);
                    args.push(Some(handle));
                }
                MemberSpec::Data => {
                    args.push(convert(env, context, &member_value)?);
                }
            }
        }
    }

    (invoke)(&args)
        .map(Some)
        .map_err(|detail| InstantiateError::ConstructorFailed {
            type_name: type_name.to_owned(),
            detail,
        })
}

fn build_class(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    value: &AggregateValue,
    descriptor: &TypeDescriptor,
    context_params: &[Name],
    invoke: &ConstructFn,
) -> Result<Option<HostObject>, InstantiateError> {
    let type_name = env.types.borrow().type_name(value.ty);
    trace!(type_name, "instantiating as class");

    // Context-only construction; the member values come afterwards.
    let args: Vec<Option<HostObject>> = context_params
        .iter()
        .map(|key| context.get(key).cloned())
        .collect();
    let instance =
        (invoke)(&args).map_err(|detail| InstantiateError::ConstructorFailed {
            type_name: type_name.to_owned(),
            detail,
        })?;

    {
        let space = value.space.borrow();
        for member in &descriptor.members {
            let member_name = env.interner.lookup(member.name);
            let Some(member_value) = space.resolve_local(member.name) else {
                continue;
            };
            match &member.spec {
                MemberSpec::Data => {
                    // Only write members the program explicitly
                    // assigned; everything else keeps the
                    // constructor-set default.
                    if !space.is_dirty(member.name) || member_value.is_none() {
                        continue;
                    }
                    let Some(converted) = convert(env, context, &member_value)? else {
                        continue;
                    };
                    set_member(env, descriptor, member.name, &instance, converted, type_name)?;
                }
                MemberSpec::Callback(shape) => {
                    if member_value.is_none() {
                        continue;
                    }
                    let adapter = build_member_adapter(env, &member_value, *shape, member_name)?;
                    set_member(
                        env,
                        descriptor,
                        member.name,
                        &instance,
                        Rc::new(adapter),
                        type_name,
                    )?;
                }
            }
        }

        set_properties(env, context, value, &space, &instance, type_name)?;
    }

    Ok(Some(instance))
}

fn set_member(
    env: &HostEnv,
    descriptor: &TypeDescriptor,
    member: Name,
    instance: &HostObject,
    converted: HostObject,
    type_name: &str,
) -> Result<(), InstantiateError> {
    let member_name = env.interner.lookup(member);
    let setter = descriptor
        .members
        .iter()
        .find(|m| m.name == member)
        .and_then(|m| m.set.as_ref())
        .ok_or_else(|| InstantiateError::FieldSetFailed {
            type_name: type_name.to_owned(),
            member: member_name.to_owned(),
            detail: "no setter registered".to_owned(),
        })?;
    setter(instance, converted).map_err(|detail| InstantiateError::FieldSetFailed {
        type_name: type_name.to_owned(),
        member: member_name.to_owned(),
        detail,
    })
}

/// Set every settable extension property whose member holds an explicit
/// value.
fn set_properties(
    env: &HostEnv,
    context: &FxHashMap<Name, HostObject>,
    value: &AggregateValue,
    space: &MemorySpace,
    instance: &HostObject,
    type_name: &str,
) -> Result<(), InstantiateError> {
    let settable: Vec<(Name, ExtensionId)> = {
        let types = env.types.borrow();
        types
            .member_symbols(value.ty)
            .into_iter()
            .filter_map(|id| {
                let symbol = types.symbols().symbol(id);
                match symbol.kind {
                    SymbolKind::Property {
                        id, settable: true, ..
                    } => Some((symbol.name, id)),
                    _ => None,
                }
            })
            .collect()
    };

    for (name, id) in settable {
        let Some(property) = env.host.borrow().property(id) else {
            continue;
        };
        // Only apply properties the program explicitly assigned; seeded
        // defaults, unset members, and empty aggregates mean "nothing
        // to apply".
        if !space.is_dirty(name) {
            continue;
        }
        let Some(member_value) = space.resolve_local(name) else {
            continue;
        };
        let empty_aggregate =
            matches!(&member_value, Value::Aggregate(a) if a.is_empty());
        if member_value.is_none() || empty_aggregate {
            continue;
        }
        let Some(converted) = convert(env, context, &member_value)? else {
            continue;
        };
        let Some(set) = &property.set else { continue };
        set(instance, converted).map_err(|detail| InstantiateError::PropertyFailed {
            type_name: type_name.to_owned(),
            property: env.interner.lookup(name).to_owned(),
            detail,
        })?;
    }
    Ok(())
}

fn build_member_adapter(
    env: &HostEnv,
    value: &Value,
    shape: CallbackShape,
    member: &str,
) -> Result<crate::callback::CallbackAdapter, InstantiateError> {
    let Value::Function(function) = value else {
        return Err(InstantiateError::CallbackShapeMismatch {
            member: member.to_owned(),
            detail: format!("expected a function value, found {}", value.kind_name()),
        });
    };
    CallbackAdapterBuilder::new(env.clone()).build(function, shape, member)
}
