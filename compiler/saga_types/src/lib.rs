//! Saga type system.
//!
//! This crate implements the static half of the Saga content-definition
//! language:
//!
//! - `symbol`: name/type/declaring-scope triples in an arena-backed
//!   `SymbolTable` with nested scopes for aggregate members
//! - `types`: the closed `TypeKind` lattice (basic, aggregate, adapted
//!   aggregate, list/set/map, function, enum, prototype)
//! - `registry`: the memoizing `TypeRegistry` - canonical generic and
//!   function types with identity equality, basic-type seeding, and
//!   native-method pre-binding on container member scopes
//! - `binder`: the `TypeBinder` that walks definition nodes and produces
//!   aggregate/item types against the global scope, accumulating soft
//!   errors and failing fast only on invariant violations
//!
//! Types are created once during the binding pass and live as long as the
//! registry; identity (`TypeIdx` equality) is the reference equality the
//! function-type compatibility check relies on.

mod binder;
mod error;
mod registry;
pub mod symbol;
pub mod types;

pub use binder::{TypeBinder, ITEM_BASE_TYPE};
pub use error::{BindError, FatalBindError, RegistryError};
pub use registry::TypeRegistry;
pub use symbol::{ExtensionId, ScopeId, SymbolData, SymbolId, SymbolKind, SymbolTable};
pub use types::{BasicKind, BuilderId, TypeData, TypeIdx, TypeKind};
