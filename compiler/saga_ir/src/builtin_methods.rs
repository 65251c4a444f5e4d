//! Shared method metadata for the generic container types.
//!
//! Single source of truth for the native methods pre-bound on list, set,
//! and map types, shared by the type registry (which binds method symbols
//! with memoized function types) and the evaluator (which dispatches on
//! the method enum). Keeping one table prevents the two sides from
//! drifting apart.

/// Native method on a generic container type.
///
/// The set is closed: these are the only operations bound on container
/// member scopes, and the evaluator dispatches on this enum directly
/// rather than by name.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CollectionMethod {
    ListAdd,
    ListSize,
    ListGet,
    SetAdd,
    SetSize,
    SetContains,
    MapAdd,
    MapSize,
    MapGetKeys,
    MapGetElements,
}

/// Parameter shape of a native method, relative to the receiver type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParamSpec {
    /// The container's element type.
    Element,
    /// The map's key type.
    Key,
    /// Integer parameter (list indexing).
    Int,
}

/// Return shape of a native method, relative to the receiver type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReturnSpec {
    /// Returns `none`.
    None,
    /// Returns `bool`.
    Bool,
    /// Returns `int`.
    Int,
    /// Returns the container's element type.
    Element,
    /// Returns a list of the map's key type.
    KeyList,
    /// Returns a list of the container's element type.
    ElementList,
}

/// Definition of a native container method.
#[derive(Copy, Clone, Debug)]
pub struct MethodDef {
    /// The DSL-visible method name.
    pub name: &'static str,
    /// Parameter shapes (excluding the receiver).
    pub params: &'static [ParamSpec],
    /// Return shape.
    pub returns: ReturnSpec,
}

impl CollectionMethod {
    /// Methods bound on every list type.
    pub const LIST: &'static [CollectionMethod] = &[
        CollectionMethod::ListAdd,
        CollectionMethod::ListSize,
        CollectionMethod::ListGet,
    ];

    /// Methods bound on every set type.
    pub const SET: &'static [CollectionMethod] = &[
        CollectionMethod::SetAdd,
        CollectionMethod::SetSize,
        CollectionMethod::SetContains,
    ];

    /// Methods bound on every map type.
    pub const MAP: &'static [CollectionMethod] = &[
        CollectionMethod::MapAdd,
        CollectionMethod::MapSize,
        CollectionMethod::MapGetKeys,
        CollectionMethod::MapGetElements,
    ];

    /// The method's definition (name, parameter shapes, return shape).
    pub const fn def(self) -> MethodDef {
        match self {
            CollectionMethod::ListAdd => MethodDef {
                name: "add",
                params: &[ParamSpec::Element],
                returns: ReturnSpec::None,
            },
            CollectionMethod::ListSize => MethodDef {
                name: "size",
                params: &[],
                returns: ReturnSpec::Int,
            },
            CollectionMethod::ListGet => MethodDef {
                name: "get",
                params: &[ParamSpec::Int],
                returns: ReturnSpec::Element,
            },
            CollectionMethod::SetAdd => MethodDef {
                name: "add",
                params: &[ParamSpec::Element],
                returns: ReturnSpec::Bool,
            },
            CollectionMethod::SetSize => MethodDef {
                name: "size",
                params: &[],
                returns: ReturnSpec::Int,
            },
            CollectionMethod::SetContains => MethodDef {
                name: "contains",
                params: &[ParamSpec::Element],
                returns: ReturnSpec::Bool,
            },
            CollectionMethod::MapAdd => MethodDef {
                name: "add",
                params: &[ParamSpec::Key, ParamSpec::Element],
                returns: ReturnSpec::None,
            },
            CollectionMethod::MapSize => MethodDef {
                name: "size",
                params: &[],
                returns: ReturnSpec::Int,
            },
            CollectionMethod::MapGetKeys => MethodDef {
                name: "get_keys",
                params: &[],
                returns: ReturnSpec::KeyList,
            },
            CollectionMethod::MapGetElements => MethodDef {
                name: "get_elements",
                params: &[],
                returns: ReturnSpec::ElementList,
            },
        }
    }

    /// The DSL-visible method name.
    pub const fn name(self) -> &'static str {
        self.def().name
    }

    /// Number of parameters (excluding the receiver).
    pub const fn arity(self) -> usize {
        self.def().params.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_method_defs() {
        assert_eq!(CollectionMethod::ListAdd.name(), "add");
        assert_eq!(CollectionMethod::ListAdd.arity(), 1);
        assert_eq!(CollectionMethod::ListGet.def().returns, ReturnSpec::Element);
        assert_eq!(CollectionMethod::ListSize.arity(), 0);
    }

    #[test]
    fn map_methods_cover_keys_and_elements() {
        assert_eq!(
            CollectionMethod::MapGetKeys.def().returns,
            ReturnSpec::KeyList
        );
        assert_eq!(
            CollectionMethod::MapGetElements.def().returns,
            ReturnSpec::ElementList
        );
        assert_eq!(CollectionMethod::MapAdd.arity(), 2);
    }

    #[test]
    fn method_tables_are_disjoint_per_receiver() {
        for m in CollectionMethod::LIST {
            assert!(!CollectionMethod::SET.contains(m));
            assert!(!CollectionMethod::MAP.contains(m));
        }
    }
}
