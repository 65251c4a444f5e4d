//! Callable handles and the interpreter seam.

use saga_ir::CollectionMethod;
use saga_types::{ExtensionId, SymbolId};

use crate::errors::EvalError;
use crate::value::Value;

/// A callable handle carried by a function value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Callable {
    /// A user-defined DSL function, identified by its function symbol.
    User(SymbolId),
    /// A native container method.
    Native(CollectionMethod),
    /// A host-registered extension method.
    Extension(ExtensionId),
}

/// The seam through which this crate's consumers invoke DSL callables.
///
/// The expression evaluator lives outside this subsystem; callback
/// adapters hand it the callable and the translated argument values and
/// get the return value back. Invocation is synchronous on the calling
/// thread.
pub trait DslInvoker {
    fn invoke(&self, callable: &Callable, args: Vec<Value>) -> Result<Value, EvalError>;
}
