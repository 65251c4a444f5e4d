//! Callback adapters.
//!
//! A callback adapter is the host-callable wrapper around a DSL
//! callable. Host code invokes it with host-typed arguments; the
//! adapter translates them into values along the usual host-to-DSL
//! path, invokes the callable synchronously on the calling thread, and
//! converts the returned value back (or discards it, for consumer
//! shapes).
//!
//! Shapes are matched at adapter-build time, not call time: the
//! supported host functional shapes are consumers and functions of
//! arity zero through three; higher-order parameters (a function over a
//! list of X) fall out of element-wise list translation.

use rustc_hash::FxHashMap;
use saga_eval::{dispatch_collection_method, Callable, FunctionValue, HostObject};
use saga_types::{BasicKind, TypeIdx, TypeKind, TypeRegistry};

use crate::env::HostEnv;
use crate::error::InstantiateError;
use crate::instantiate::convert;
use crate::translate::ObjectTranslator;

/// Highest argument count the host's functional shapes use.
pub const MAX_CALLBACK_ARITY: usize = 3;

/// The host functional-interface shape a callback slot expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallbackShape {
    /// The host discards the return value.
    Consumer { arity: usize },
    /// The host consumes the translated return value.
    Function { arity: usize },
}

impl CallbackShape {
    /// Number of host arguments the shape takes.
    pub const fn arity(self) -> usize {
        match self {
            CallbackShape::Consumer { arity } | CallbackShape::Function { arity } => arity,
        }
    }

    /// Derive a shape from a function type: `none`-returning functions
    /// become consumers. Returns `None` for non-function types.
    pub fn infer(fn_ty: TypeIdx, registry: &TypeRegistry) -> Option<CallbackShape> {
        match registry.kind(fn_ty) {
            TypeKind::Function { params, ret } => {
                let arity = params.len();
                if *ret == registry.basic(BasicKind::None) {
                    Some(CallbackShape::Consumer { arity })
                } else {
                    Some(CallbackShape::Function { arity })
                }
            }
            _ => None,
        }
    }
}

/// Builds callback adapters, validating shapes against function types.
pub struct CallbackAdapterBuilder {
    env: HostEnv,
}

impl CallbackAdapterBuilder {
    pub fn new(env: HostEnv) -> Self {
        CallbackAdapterBuilder { env }
    }

    /// Build an adapter around a function value.
    ///
    /// `slot` names the callback slot for diagnostics. Fails when the
    /// declared shape cannot be satisfied by the callable's function
    /// type: arity mismatch, arity beyond the supported maximum, or a
    /// function shape over a `none` return.
    pub fn build(
        &self,
        value: &FunctionValue,
        shape: CallbackShape,
        slot: &str,
    ) -> Result<CallbackAdapter, InstantiateError> {
        let (params, ret) = {
            let types = self.env.types.borrow();
            match types.kind(value.ty) {
                TypeKind::Function { params, ret } => (params.to_vec(), *ret),
                _ => {
                    return Err(InstantiateError::CallbackShapeMismatch {
                        member: slot.to_owned(),
                        detail: "the value's declared type is not a function type".to_owned(),
                    })
                }
            }
        };

        if shape.arity() > MAX_CALLBACK_ARITY {
            return Err(InstantiateError::CallbackShapeMismatch {
                member: slot.to_owned(),
                detail: format!(
                    "arity {} exceeds the supported maximum of {MAX_CALLBACK_ARITY}",
                    shape.arity()
                ),
            });
        }
        if params.len() != shape.arity() {
            return Err(InstantiateError::CallbackShapeMismatch {
                member: slot.to_owned(),
                detail: format!(
                    "shape takes {} argument(s) but the function takes {}",
                    shape.arity(),
                    params.len()
                ),
            });
        }
        if matches!(shape, CallbackShape::Function { .. })
            && ret == self.env.types.borrow().basic(BasicKind::None)
        {
            return Err(InstantiateError::CallbackShapeMismatch {
                member: slot.to_owned(),
                detail: "function shape requires a non-none return type".to_owned(),
            });
        }

        Ok(CallbackAdapter {
            env: self.env.clone(),
            callable: value.callable,
            params,
            shape,
        })
    }
}

/// A host-callable wrapper around a DSL callable.
pub struct CallbackAdapter {
    env: HostEnv,
    callable: Callable,
    /// Declared parameter types, used to translate host arguments.
    params: Vec<TypeIdx>,
    shape: CallbackShape,
}

impl std::fmt::Debug for CallbackAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackAdapter")
            .field("params", &self.params)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl CallbackAdapter {
    /// The shape the adapter was built for.
    pub fn shape(&self) -> CallbackShape {
        self.shape
    }

    /// Invoke the wrapped callable with host-typed arguments.
    ///
    /// Returns the converted return value, or `None` for consumer
    /// shapes.
    pub fn call(&self, args: &[HostObject]) -> Result<Option<HostObject>, InstantiateError> {
        if args.len() != self.params.len() {
            return Err(InstantiateError::CallbackArity {
                expected: self.params.len(),
                found: args.len(),
            });
        }

        let translator = ObjectTranslator::new(self.env.clone());
        let mut values = Vec::with_capacity(args.len());
        for (arg, &ty) in args.iter().zip(&self.params) {
            values.push(translator.translate(arg, Some(ty))?);
        }

        let result = match &self.callable {
            Callable::Native(method) => {
                let Some((receiver, rest)) = values.split_first() else {
                    return Err(InstantiateError::CallbackFailed {
                        detail: "a native-method callback needs a receiver argument".to_owned(),
                    });
                };
                dispatch_collection_method(*method, receiver, rest, &self.env.types.borrow())
                    .map_err(|err| InstantiateError::CallbackFailed {
                        detail: err.to_string(),
                    })?
            }
            callable => {
                self.env
                    .invoker
                    .invoke(callable, values)
                    .map_err(|err| InstantiateError::CallbackFailed {
                        detail: err.to_string(),
                    })?
            }
        };

        match self.shape {
            CallbackShape::Consumer { .. } => Ok(None),
            // Return translation runs with an empty context map: a
            // callback result cannot reach into whatever instantiation
            // happened to be in flight when the adapter was built.
            CallbackShape::Function { .. } => convert(&self.env, &FxHashMap::default(), &result),
        }
    }
}
