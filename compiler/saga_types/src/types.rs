//! The Saga type lattice.
//!
//! Types are stored in the registry's arena and addressed by `TypeIdx`.
//! `TypeIdx` equality is type identity: generic and function types are
//! memoized by canonical name, so two structurally equal parameterizations
//! share one index. Function-type compatibility checks rely on this.

use saga_ir::Name;
use smallvec::SmallVec;

use crate::symbol::ScopeId;

/// Index of a type in the registry's type arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct TypeIdx(pub(crate) u32);

impl TypeIdx {
    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque handle to a host-registered builder function.
///
/// The host registry owns the builder; the adapted aggregate type only
/// carries the id so the type system stays independent of host closures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct BuilderId(pub u32);

/// Which basic type a `TypeKind::Basic` is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BasicKind {
    None,
    Bool,
    Int,
    Float,
    String,
    Graph,
}

impl BasicKind {
    /// All basic kinds, in seeding order.
    pub const ALL: [BasicKind; 6] = [
        BasicKind::None,
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Float,
        BasicKind::String,
        BasicKind::Graph,
    ];

    /// The DSL-visible type name.
    pub const fn name(self) -> &'static str {
        match self {
            BasicKind::None => "none",
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Float => "float",
            BasicKind::String => "string",
            BasicKind::Graph => "graph",
        }
    }

    /// Position in [`BasicKind::ALL`], used by the registry's seed table.
    pub(crate) const fn index(self) -> usize {
        match self {
            BasicKind::None => 0,
            BasicKind::Bool => 1,
            BasicKind::Int => 2,
            BasicKind::Float => 3,
            BasicKind::String => 4,
            BasicKind::Graph => 5,
        }
    }
}

/// The kind of a type.
///
/// A closed tagged union: everything that used to be an `instanceof`
/// check in a dynamic dispatch chain is a `match` over this enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// A primitive type.
    Basic(BasicKind),
    /// A named, scoped collection of member symbols. May be bound to a
    /// host type descriptor or left purely structural (user-declared
    /// content types with no host counterpart).
    Aggregate { scope: ScopeId },
    /// An aggregate whose instantiation is delegated to a registered
    /// builder function instead of a constructor.
    AggregateAdapted { scope: ScopeId, builder: BuilderId },
    /// Generic list type, canonical per element type.
    List { element: TypeIdx, scope: ScopeId },
    /// Generic set type, canonical per element type.
    Set { element: TypeIdx, scope: ScopeId },
    /// Generic map type, canonical per key/element type pair.
    Map {
        key: TypeIdx,
        element: TypeIdx,
        scope: ScopeId,
    },
    /// Function type; equal iff return and parameter types are identical
    /// by reference, which memoization turns into index equality.
    Function {
        params: SmallVec<[TypeIdx; 4]>,
        ret: TypeIdx,
    },
    /// Name-indexed set of variant symbols, linked to a host enum
    /// descriptor that is consulted only at instantiation time.
    Enum { scope: ScopeId },
    /// An object prototype. Materialization is the interpreter's native
    /// `instantiate` entry point's job; the instantiator no-ops on these.
    Prototype { base: TypeIdx },
}

/// A type in the registry arena: canonical name plus kind.
#[derive(Clone, Debug)]
pub struct TypeData {
    pub name: Name,
    pub kind: TypeKind,
}

impl TypeData {
    /// The member scope of this type, if it has one.
    pub fn member_scope(&self) -> Option<ScopeId> {
        match self.kind {
            TypeKind::Aggregate { scope }
            | TypeKind::AggregateAdapted { scope, .. }
            | TypeKind::List { scope, .. }
            | TypeKind::Set { scope, .. }
            | TypeKind::Map { scope, .. }
            | TypeKind::Enum { scope } => Some(scope),
            TypeKind::Basic(_) | TypeKind::Function { .. } | TypeKind::Prototype { .. } => None,
        }
    }

    /// A short label for the kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Basic(_) => "basic",
            TypeKind::Aggregate { .. } => "aggregate",
            TypeKind::AggregateAdapted { .. } => "adapted aggregate",
            TypeKind::List { .. } => "list",
            TypeKind::Set { .. } => "set",
            TypeKind::Map { .. } => "map",
            TypeKind::Function { .. } => "function",
            TypeKind::Enum { .. } => "enum",
            TypeKind::Prototype { .. } => "prototype",
        }
    }
}
