//! Host type descriptors.
//!
//! The registration-time replacement for reflection: every host-visible
//! type is described once, explicitly, by a descriptor built from
//! closures over [`HostObject`]. Constructors, builders, getters, and
//! setters downcast internally; after registration the instantiator
//! never inspects a host type again.
//!
//! Marshalling conventions for the closures: basic values travel as
//! `i64` / `f64` / `bool` / `String`, lists and sets as
//! `Vec<HostObject>`, maps as `Vec<(HostObject, HostObject)>`, callback
//! slots as [`crate::CallbackAdapter`], and registered component/enum
//! types as whatever concrete type their descriptor was registered
//! under.

use std::rc::Rc;

use saga_eval::HostObject;
use saga_ir::{Name, SharedInterner};
use saga_types::TypeIdx;

use crate::callback::CallbackShape;

/// Reads a member's current value off a live host object.
///
/// `None` means the member is unset on the host side and is skipped
/// when mirroring host state into a memory space.
pub type GetterFn = Rc<dyn Fn(&HostObject) -> Option<HostObject>>;

/// Writes a marshalled value onto a live host object.
pub type SetterFn = Rc<dyn Fn(&HostObject, HostObject) -> Result<(), String>>;

/// Builds a host object from positional marshalled arguments.
///
/// `None` arguments are unset members or absent context entries.
pub type ConstructFn = Rc<dyn Fn(&[Option<HostObject>]) -> Result<HostObject, String>>;

/// How a member is sourced at instantiation time.
#[derive(Clone, Debug)]
pub enum MemberSpec {
    /// Plain data, marshalled from the member's value.
    Data,
    /// A callback slot, converted through the callback adapter with the
    /// declared shape.
    Callback(CallbackShape),
}

/// One member of a host-bound type.
#[derive(Clone)]
pub struct MemberDescriptor {
    pub name: Name,
    pub ty: TypeIdx,
    pub spec: MemberSpec,
    pub get: Option<GetterFn>,
    pub set: Option<SetterFn>,
}

impl MemberDescriptor {
    /// A data member with no accessors (record fields need none).
    pub fn data(name: Name, ty: TypeIdx) -> Self {
        MemberDescriptor {
            name,
            ty,
            spec: MemberSpec::Data,
            get: None,
            set: None,
        }
    }

    /// A callback slot with the declared host shape.
    pub fn callback(name: Name, ty: TypeIdx, shape: CallbackShape) -> Self {
        MemberDescriptor {
            name,
            ty,
            spec: MemberSpec::Callback(shape),
            get: None,
            set: None,
        }
    }

    /// Attach a getter.
    #[must_use]
    pub fn with_getter(mut self, get: GetterFn) -> Self {
        self.get = Some(get);
        self
    }

    /// Attach a setter.
    #[must_use]
    pub fn with_setter(mut self, set: SetterFn) -> Self {
        self.set = Some(set);
        self
    }
}

/// How instances of a host-bound type are produced.
#[derive(Clone)]
pub enum Construct {
    /// Host class style: a constructor whose every parameter is a
    /// context entry, followed by dirty-member write-back through the
    /// member setters. A parameter list mixing context and non-context
    /// parameters is unrepresentable here on purpose - registration is
    /// where that mistake is caught, not instantiation.
    Constructor {
        context_params: Vec<Name>,
        invoke: ConstructFn,
    },
    /// Record style: one all-arguments invocation, members passed
    /// positionally in declaration order, nothing written afterwards.
    Record { invoke: ConstructFn },
    /// Purely structural: no host counterpart, instantiation yields no
    /// object.
    Structural,
}

/// Descriptor of a host-bound aggregate type.
#[derive(Clone)]
pub struct TypeDescriptor {
    pub name: Name,
    pub members: Vec<MemberDescriptor>,
    pub construct: Construct,
}

impl TypeDescriptor {
    pub fn new(name: Name, members: Vec<MemberDescriptor>, construct: Construct) -> Self {
        TypeDescriptor {
            name,
            members,
            construct,
        }
    }
}

/// One parameter of a registered builder function, in positional order.
#[derive(Clone, Debug)]
pub enum BuilderParam {
    /// Marshalled from the memory-space member of this name.
    Member { name: Name, ty: TypeIdx },
    /// Resolved from the instantiator's context map under this key.
    Context { key: Name, ty: TypeIdx },
    /// The implicit definition-name member (`$name`).
    DefinitionName,
}

/// Descriptor of a builder function producing an adapted aggregate type.
#[derive(Clone)]
pub struct BuilderDescriptor {
    pub name: Name,
    pub params: Vec<BuilderParam>,
    pub invoke: ConstructFn,
}

/// Descriptor of a host enum: ordered variant handles plus the reverse
/// lookup used when translating host values into the DSL.
#[derive(Clone)]
pub struct EnumDescriptor {
    pub variants: Vec<(Name, HostObject)>,
    pub name_of: Rc<dyn Fn(&HostObject) -> Option<Name>>,
}

/// Build an enum descriptor from the host enum's variants.
///
/// The reverse lookup compares by equality, so the host enum only needs
/// `PartialEq + Clone`.
pub fn enum_descriptor<T>(interner: &SharedInterner, variants: &[(&str, T)]) -> EnumDescriptor
where
    T: PartialEq + Clone + 'static,
{
    let named: Vec<(Name, T)> = variants
        .iter()
        .map(|(name, value)| (interner.intern(name), value.clone()))
        .collect();
    let handles: Vec<(Name, HostObject)> = named
        .iter()
        .map(|(name, value)| (*name, Rc::new(value.clone()) as HostObject))
        .collect();
    let name_of = Rc::new(move |object: &HostObject| {
        let value = object.downcast_ref::<T>()?;
        named
            .iter()
            .find(|(_, v)| v == value)
            .map(|(name, _)| *name)
    });
    EnumDescriptor {
        variants: handles,
        name_of,
    }
}

/// An extension property: gettable/settable behavior attached to a
/// host-bound type without modifying it.
#[derive(Clone)]
pub struct ExtensionProperty {
    pub name: Name,
    pub ty: TypeIdx,
    pub get: Option<Rc<dyn Fn(&HostObject) -> Result<HostObject, String>>>,
    pub set: Option<SetterFn>,
}

/// An extension method: callable behavior attached to a host-bound type
/// without modifying it. `ty` must be a function type.
#[derive(Clone)]
pub struct ExtensionMethod {
    pub name: Name,
    pub ty: TypeIdx,
    pub invoke: Rc<dyn Fn(&HostObject, &[Option<HostObject>]) -> Result<HostObject, String>>,
}

/// Convert a host-side camel-case name to its DSL spelling: a lower or
/// digit character followed by an upper-case character gets an
/// underscore between them, and everything is lowercased.
pub fn dsl_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_joins = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_joins {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_joins = false;
        } else {
            prev_joins = c.is_lowercase() || c.is_ascii_digit() || c == '_';
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests;
