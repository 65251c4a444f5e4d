//! Saga runtime value model.
//!
//! Tagged runtime values mirroring the type lattice, produced by the
//! (external) interpreter and consumed by the host instantiation layer:
//!
//! - `Value`: the closed value union, with factory-enforced heap types
//! - `MemorySpace`: ordered member storage with per-slot dirty tracking
//!   and a parent-link chain for nested member resolution
//! - `dispatch_collection_method`: direct match-based dispatch for the
//!   native methods pre-bound on container types
//! - `Callable` / `DslInvoker`: the seam through which host-facing
//!   callback adapters invoke user-defined DSL functions
//!
//! Everything here is single-threaded by design: values share structure
//! through `Rc`-backed `Heap<T>` and `LocalScope<T>`, never across
//! threads.

mod callable;
pub mod errors;
pub mod memory;
mod methods;
mod shared;
pub mod value;

pub use callable::{Callable, DslInvoker};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use memory::{MemorySpace, Slot, SpaceRef, NAME_MEMBER};
pub use methods::dispatch_collection_method;
pub use shared::LocalScope;
pub use value::{
    AggregateValue, EnumValue, FunctionValue, Heap, HostObject, ListValue, MapValue, SetValue,
    Value,
};
