//! Saga host-object instantiation layer.
//!
//! The bridge between interpreted values and the game engine's object
//! model:
//!
//! - `descriptor` / `registry`: explicit, registration-time type
//!   descriptors (constructors, builders, enums, extension
//!   properties/methods, translators) replacing runtime reflection
//! - `instantiate`: the `Instantiator`, converting value trees into
//!   host objects with context-parameter injection and dirty-member
//!   write-back
//! - `callback`: host-callable adapters around DSL callables
//! - `translate`: the reverse path, wrapping live host objects into
//!   values the interpreter can touch
//!
//! Single-threaded and synchronous throughout; registries are
//! populated during startup registration and read-only afterwards.

pub mod callback;
pub mod descriptor;
mod env;
pub mod error;
pub mod instantiate;
pub mod registry;
pub mod translate;

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test fixtures use expect for clarity")]
pub(crate) mod testing;

pub use callback::{CallbackAdapter, CallbackAdapterBuilder, CallbackShape, MAX_CALLBACK_ARITY};
pub use descriptor::{
    dsl_name, enum_descriptor, BuilderDescriptor, BuilderParam, Construct, ConstructFn,
    EnumDescriptor, ExtensionMethod, ExtensionProperty, GetterFn, MemberDescriptor, MemberSpec,
    SetterFn, TypeDescriptor,
};
pub use env::{HostEnv, SharedHost, SharedTypes};
pub use error::{InstantiateError, RegisterError, TranslateError};
pub use instantiate::Instantiator;
pub use registry::HostRegistry;
pub use translate::{ObjectTranslator, TranslatorFn};
