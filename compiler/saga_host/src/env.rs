//! Session-shared environment handles.

use std::rc::Rc;

use saga_eval::{DslInvoker, LocalScope};
use saga_ir::SharedInterner;
use saga_types::TypeRegistry;

use crate::registry::HostRegistry;

/// Shared handle to the type registry.
pub type SharedTypes = LocalScope<TypeRegistry>;

/// Shared handle to the host registry.
pub type SharedHost = LocalScope<HostRegistry>;

/// The host-facing runtime environment of one interpreter session.
///
/// Bundles the registries (populated during the single-threaded binding
/// and registration phase, read-only afterwards), the interner, and the
/// invoker seam to the expression evaluator. Cloning shares all four;
/// callback adapters carry a clone so they stay callable for as long as
/// the host keeps them.
#[derive(Clone)]
pub struct HostEnv {
    pub types: SharedTypes,
    pub host: SharedHost,
    pub interner: SharedInterner,
    pub invoker: Rc<dyn DslInvoker>,
}

impl HostEnv {
    /// Wrap fully registered registries into a session environment.
    pub fn new(types: TypeRegistry, host: HostRegistry, invoker: Rc<dyn DslInvoker>) -> Self {
        let interner = types.interner().clone();
        HostEnv {
            types: LocalScope::new(types),
            host: LocalScope::new(host),
            interner,
            invoker,
        }
    }
}
