//! Host-to-DSL value translation.
//!
//! Converts live host objects into values the interpreter can work
//! with. A custom translator registered for the object's concrete class
//! wins; otherwise translation is driven by the target type's kind.
//! Aggregates become values that *encapsulate* the host object: the
//! memory space is a snapshot read through the descriptor's member
//! getters, and the instantiator short-circuits the value back to the
//! original object, so a host-to-DSL-to-host round trip is
//! identity-preserving.

use std::rc::Rc;

use saga_eval::{
    AggregateValue, EnumValue, ListValue, LocalScope, MapValue, MemorySpace, SetValue, Value,
};
use saga_eval::HostObject;
use saga_types::{BasicKind, TypeIdx, TypeKind};

use crate::env::HostEnv;
use crate::error::TranslateError;

/// A custom host-to-DSL translator for one host class.
///
/// Receives the translator so element-wise recursion uses the same
/// path.
pub type TranslatorFn = Rc<dyn Fn(&HostObject, &ObjectTranslator) -> Result<Value, TranslateError>>;

/// Translates host objects into values.
pub struct ObjectTranslator {
    env: HostEnv,
}

impl ObjectTranslator {
    pub fn new(env: HostEnv) -> Self {
        ObjectTranslator { env }
    }

    /// The session environment.
    pub fn env(&self) -> &HostEnv {
        &self.env
    }

    /// Translate a host object, optionally against a known target type.
    ///
    /// Without a target type the registry's host-class mapping supplies
    /// one; an object of an unregistered class fails with
    /// [`TranslateError::UnknownHostType`].
    pub fn translate(
        &self,
        object: &HostObject,
        target: Option<TypeIdx>,
    ) -> Result<Value, TranslateError> {
        let class = (**object).type_id();

        if let Some(translator) = self.env.host.borrow().translator(class) {
            return translator(object, self);
        }

        let target = match target {
            Some(ty) => ty,
            None => self
                .env
                .host
                .borrow()
                .dsl_type_of(class)
                .ok_or(TranslateError::UnknownHostType)?,
        };

        let kind = self.env.types.borrow().kind(target).clone();
        match kind {
            TypeKind::Basic(BasicKind::None) => Ok(Value::None),
            TypeKind::Basic(BasicKind::Bool) => downcast_copy::<bool>(object).map(Value::Bool),
            TypeKind::Basic(BasicKind::Int) => downcast_copy::<i64>(object).map(Value::Int),
            TypeKind::Basic(BasicKind::Float) => downcast_copy::<f64>(object).map(Value::Float),
            TypeKind::Basic(BasicKind::String) => object
                .downcast_ref::<String>()
                .map(|s| Value::string(s.clone()))
                .ok_or(TranslateError::DowncastFailed { expected: "String" }),
            TypeKind::Basic(BasicKind::Graph) => Ok(Value::Graph(object.clone())),
            TypeKind::List { element, .. } => {
                // An element-wise copy, not a live view.
                let items = downcast_slice(object)?;
                let list = ListValue::new(target);
                for item in items {
                    list.push(self.translate(item, Some(element))?);
                }
                Ok(Value::List(list))
            }
            TypeKind::Set { element, .. } => {
                let items = downcast_slice(object)?;
                let set = SetValue::new(target);
                for item in items {
                    set.insert(self.translate(item, Some(element))?);
                }
                Ok(Value::Set(set))
            }
            TypeKind::Map { key, element, .. } => {
                let entries = object
                    .downcast_ref::<Vec<(HostObject, HostObject)>>()
                    .ok_or(TranslateError::DowncastFailed {
                        expected: "Vec<(HostObject, HostObject)>",
                    })?;
                let map = MapValue::new(target);
                for (k, v) in entries {
                    map.insert(
                        self.translate(k, Some(key))?,
                        self.translate(v, Some(element))?,
                    );
                }
                Ok(Value::Map(map))
            }
            TypeKind::Aggregate { .. } | TypeKind::AggregateAdapted { .. } => {
                self.translate_aggregate(object, target)
            }
            TypeKind::Enum { .. } => self.translate_enum(object, target),
            TypeKind::Function { .. } => Err(TranslateError::UnsupportedKind { kind: "function" }),
            TypeKind::Prototype { .. } => {
                Err(TranslateError::UnsupportedKind { kind: "prototype" })
            }
        }
    }

    /// Wrap a host object in an encapsulating aggregate value.
    ///
    /// The memory space mirrors the object's current member values
    /// through the descriptor getters; nothing is marked dirty, because
    /// the program assigned none of it.
    fn translate_aggregate(
        &self,
        object: &HostObject,
        target: TypeIdx,
    ) -> Result<Value, TranslateError> {
        let mut space = {
            let types = self.env.types.borrow();
            MemorySpace::from_aggregate(target, &types)
        };

        if let Some(descriptor) = self.env.host.borrow().descriptor(target) {
            for member in &descriptor.members {
                let Some(get) = &member.get else { continue };
                let Some(member_host) = get(object) else { continue };
                let value = self.translate(&member_host, Some(member.ty))?;
                let types = self.env.types.borrow();
                space
                    .seed(member.name, value, &types)
                    .map_err(|err| TranslateError::MemberMismatch {
                        member: self.env.interner.lookup(member.name).to_owned(),
                        detail: err.to_string(),
                    })?;
            }
        }

        Ok(Value::Aggregate(AggregateValue::encapsulating(
            target,
            LocalScope::new(space),
            object.clone(),
        )))
    }

    fn translate_enum(&self, object: &HostObject, target: TypeIdx) -> Result<Value, TranslateError> {
        let enum_name = self.env.types.borrow().type_name(target);
        let Some(descriptor) = self.env.host.borrow().enum_descriptor(target) else {
            return Err(TranslateError::UnknownEnumValue {
                enum_name: enum_name.to_owned(),
            });
        };
        let Some(variant_name) = (descriptor.name_of)(object) else {
            return Err(TranslateError::UnknownEnumValue {
                enum_name: enum_name.to_owned(),
            });
        };

        let types = self.env.types.borrow();
        let variant = types
            .type_data(target)
            .member_scope()
            .and_then(|scope| types.symbols().resolve_local(scope, variant_name))
            .ok_or_else(|| TranslateError::UnknownEnumValue {
                enum_name: enum_name.to_owned(),
            })?;
        Ok(Value::Enum(EnumValue::new(target, variant)))
    }
}

fn downcast_copy<T: Copy + 'static>(object: &HostObject) -> Result<T, TranslateError> {
    object
        .downcast_ref::<T>()
        .copied()
        .ok_or(TranslateError::DowncastFailed {
            expected: std::any::type_name::<T>(),
        })
}

fn downcast_slice(object: &HostObject) -> Result<&Vec<HostObject>, TranslateError> {
    object
        .downcast_ref::<Vec<HostObject>>()
        .ok_or(TranslateError::DowncastFailed {
            expected: "Vec<HostObject>",
        })
}
