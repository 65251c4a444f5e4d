//! The memoizing type registry.
//!
//! Owns the type arena and the symbol table. Basic types are seeded at
//! construction; generic list/set/map types and function types are
//! created lazily and cached by canonical name, so repeated requests for
//! the same parameterization return the same `TypeIdx`. That identity
//! equality is what function-type compatibility checks rely on.
//!
//! Each generic container type is pre-populated at creation with its
//! native method symbols (`add`, `size`, `get`/`contains`, `get_keys`,
//! `get_elements`), typed with memoized function types. The method set
//! comes from `saga_ir::builtin_methods`, the table shared with the
//! evaluator's dispatch.
//!
//! The registry is populated during the single-threaded binding and
//! registration phase and is read-only afterwards.

use rustc_hash::FxHashMap;
use saga_ir::{CollectionMethod, Name, ParamSpec, ReturnSpec, SharedInterner};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::RegistryError;
use crate::symbol::{ScopeId, SymbolId, SymbolKind, SymbolTable};
use crate::types::{BasicKind, BuilderId, TypeData, TypeIdx, TypeKind};

/// Registry of all types known to a session.
pub struct TypeRegistry {
    interner: SharedInterner,
    symbols: SymbolTable,
    types: Vec<TypeData>,
    /// Canonical-name cache for memoized type construction.
    by_name: FxHashMap<Name, TypeIdx>,
    basics: [TypeIdx; 6],
}

impl TypeRegistry {
    /// Create a registry with the basic types seeded into the global
    /// scope.
    pub fn new(interner: &SharedInterner) -> Self {
        let mut registry = TypeRegistry {
            interner: interner.clone(),
            symbols: SymbolTable::new(),
            types: Vec::with_capacity(64),
            by_name: FxHashMap::default(),
            basics: [TypeIdx(0); 6],
        };
        for kind in BasicKind::ALL {
            let name = registry.interner.intern(kind.name());
            let idx = registry.push_type(name, TypeKind::Basic(kind));
            registry.bind_global_type(name, idx);
            registry.basics[kind.index()] = idx;
        }
        registry
    }

    // === Accessors ===

    /// The interner this registry resolves names through.
    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The symbol table.
    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Mutable access to the symbol table.
    ///
    /// The interpreter binds object-definition symbols into the global
    /// scope through this; the registry's own invariants only cover the
    /// symbols it creates itself.
    #[inline]
    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// The global scope.
    #[inline]
    pub fn global_scope(&self) -> ScopeId {
        self.symbols.global_scope()
    }

    /// The basic type for a kind.
    #[inline]
    pub fn basic(&self, kind: BasicKind) -> TypeIdx {
        self.basics[kind.index()]
    }

    /// The type data for an index.
    #[inline]
    pub fn type_data(&self, idx: TypeIdx) -> &TypeData {
        &self.types[idx.0 as usize]
    }

    /// The kind of a type.
    #[inline]
    pub fn kind(&self, idx: TypeIdx) -> &TypeKind {
        &self.type_data(idx).kind
    }

    /// The canonical name of a type, as a string.
    pub fn type_name(&self, idx: TypeIdx) -> &'static str {
        self.interner.lookup(self.type_data(idx).name)
    }

    /// Number of types in the arena.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Resolve a name in the global scope.
    pub fn resolve_global(&self, name: Name) -> Option<SymbolId> {
        self.symbols.resolve(self.symbols.global_scope(), name)
    }

    /// Resolve a name in the global scope to a type.
    ///
    /// Returns `None` when the name is unbound or bound to a non-type
    /// symbol.
    pub fn resolve_type(&self, name: Name) -> Option<TypeIdx> {
        let id = self.resolve_global(name)?;
        match self.symbols.symbol(id).kind {
            SymbolKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Member symbols of a type, in declaration order.
    ///
    /// Empty for types without a member scope.
    pub fn member_symbols(&self, ty: TypeIdx) -> Vec<SymbolId> {
        match self.type_data(ty).member_scope() {
            Some(scope) => self.symbols.scope_symbols(scope).collect(),
            None => Vec::new(),
        }
    }

    /// Probe the canonical cache for an existing list type.
    ///
    /// Non-constructing counterpart of [`TypeRegistry::list_type`], for
    /// read-only callers (the evaluator's `get_keys`/`get_elements`
    /// dispatch, whose return types were created with the map type).
    pub fn lookup_list_type(&self, element: TypeIdx) -> Option<TypeIdx> {
        let name = self
            .interner
            .intern(&format!("{}[]", self.type_name(element)));
        self.by_name.get(&name).copied()
    }

    // === Generic type construction (memoized) ===

    /// The list type over an element type.
    pub fn list_type(&mut self, element: TypeIdx) -> TypeIdx {
        let name = self
            .interner
            .intern(&format!("{}[]", self.type_name(element)));
        if let Some(&idx) = self.by_name.get(&name) {
            return idx;
        }
        trace!(name = self.interner.lookup(name), "creating list type");
        let scope = self.symbols.new_scope(self.symbols.global_scope());
        let idx = self.push_type(name, TypeKind::List { element, scope });
        self.bind_global_type(name, idx);
        self.bind_native_methods(idx, CollectionMethod::LIST, element, element);
        idx
    }

    /// The set type over an element type.
    pub fn set_type(&mut self, element: TypeIdx) -> TypeIdx {
        let name = self
            .interner
            .intern(&format!("{}<>", self.type_name(element)));
        if let Some(&idx) = self.by_name.get(&name) {
            return idx;
        }
        trace!(name = self.interner.lookup(name), "creating set type");
        let scope = self.symbols.new_scope(self.symbols.global_scope());
        let idx = self.push_type(name, TypeKind::Set { element, scope });
        self.bind_global_type(name, idx);
        self.bind_native_methods(idx, CollectionMethod::SET, element, element);
        idx
    }

    /// The map type over a key/element type pair.
    pub fn map_type(&mut self, key: TypeIdx, element: TypeIdx) -> TypeIdx {
        let name = self.interner.intern(&format!(
            "[{} -> {}]",
            self.type_name(key),
            self.type_name(element)
        ));
        if let Some(&idx) = self.by_name.get(&name) {
            return idx;
        }
        trace!(name = self.interner.lookup(name), "creating map type");
        let scope = self.symbols.new_scope(self.symbols.global_scope());
        let idx = self.push_type(
            name,
            TypeKind::Map {
                key,
                element,
                scope,
            },
        );
        self.bind_global_type(name, idx);
        self.bind_native_methods(idx, CollectionMethod::MAP, element, key);
        idx
    }

    /// The function type over parameter types and a return type.
    ///
    /// Memoized like the container types, so two function types are
    /// equal iff their return type and all parameter types are identical
    /// by index.
    pub fn function_type(&mut self, params: &[TypeIdx], ret: TypeIdx) -> TypeIdx {
        let canonical = {
            let names: Vec<&str> = params.iter().map(|&p| self.type_name(p)).collect();
            format!("fn({}) -> {}", names.join(", "), self.type_name(ret))
        };
        let name = self.interner.intern(&canonical);
        if let Some(&idx) = self.by_name.get(&name) {
            return idx;
        }
        let idx = self.push_type(
            name,
            TypeKind::Function {
                params: SmallVec::from_slice(params),
                ret,
            },
        );
        self.bind_global_type(name, idx);
        idx
    }

    // === Named type construction ===

    /// Create a structural aggregate type bound in the global scope.
    pub fn aggregate_type(&mut self, name: Name) -> Result<TypeIdx, RegistryError> {
        self.named_type(name, |scope| TypeKind::Aggregate { scope })
    }

    /// Create an adapted aggregate type whose instantiation is delegated
    /// to the registered builder function.
    pub fn adapted_type(&mut self, name: Name, builder: BuilderId) -> Result<TypeIdx, RegistryError> {
        self.named_type(name, |scope| TypeKind::AggregateAdapted { scope, builder })
    }

    /// Create an enum type bound in the global scope.
    pub fn enum_type(&mut self, name: Name) -> Result<TypeIdx, RegistryError> {
        self.named_type(name, |scope| TypeKind::Enum { scope })
    }

    /// The prototype type over a base type.
    ///
    /// Prototype types are memoized but not bound as global symbols; the
    /// base type keeps the name.
    pub fn prototype_type(&mut self, base: TypeIdx) -> TypeIdx {
        let name = self
            .interner
            .intern(&format!("prototype<{}>", self.type_name(base)));
        if let Some(&idx) = self.by_name.get(&name) {
            return idx;
        }
        self.push_type(name, TypeKind::Prototype { base })
    }

    /// Bind a member symbol on an aggregate, adapted, or enum type.
    pub fn bind_member(
        &mut self,
        owner: TypeIdx,
        name: Name,
        ty: TypeIdx,
        kind: SymbolKind,
    ) -> Result<SymbolId, RegistryError> {
        let scope = self
            .type_data(owner)
            .member_scope()
            .ok_or_else(|| RegistryError::NoMemberScope {
                type_name: self.type_name(owner).to_owned(),
            })?;
        self.symbols
            .bind(scope, name, Some(ty), kind)
            .map_err(|dup| RegistryError::DuplicateMember {
                type_name: self.type_name(owner).to_owned(),
                member: self.interner.lookup(dup.name).to_owned(),
            })
    }

    /// Bind a variant symbol on an enum type.
    pub fn bind_variant(&mut self, owner: TypeIdx, name: Name) -> Result<SymbolId, RegistryError> {
        let scope = match self.kind(owner) {
            TypeKind::Enum { scope } => *scope,
            _ => {
                return Err(RegistryError::NotAnEnum {
                    type_name: self.type_name(owner).to_owned(),
                })
            }
        };
        self.symbols
            .bind(scope, name, Some(owner), SymbolKind::EnumVariant)
            .map_err(|dup| RegistryError::DuplicateMember {
                type_name: self.type_name(owner).to_owned(),
                member: self.interner.lookup(dup.name).to_owned(),
            })
    }

    // === Internals ===

    fn named_type(
        &mut self,
        name: Name,
        make_kind: impl FnOnce(ScopeId) -> TypeKind,
    ) -> Result<TypeIdx, RegistryError> {
        if self.resolve_global(name).is_some() {
            return Err(RegistryError::NameTaken {
                name: self.interner.lookup(name).to_owned(),
            });
        }
        debug!(name = self.interner.lookup(name), "creating named type");
        let scope = self.symbols.new_scope(self.symbols.global_scope());
        let idx = self.push_type(name, make_kind(scope));
        self.bind_global_type(name, idx);
        Ok(idx)
    }

    fn push_type(&mut self, name: Name, kind: TypeKind) -> TypeIdx {
        let raw = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type arena overflow: {} types", self.types.len()));
        let idx = TypeIdx(raw);
        self.types.push(TypeData { name, kind });
        self.by_name.insert(name, idx);
        idx
    }

    fn bind_global_type(&mut self, name: Name, idx: TypeIdx) {
        let bound = self.symbols.bind(
            self.symbols.global_scope(),
            name,
            Some(idx),
            SymbolKind::Type(idx),
        );
        // Callers either checked the global scope first or hold a
        // canonical name no user symbol can spell.
        debug_assert!(bound.is_ok(), "global type name collision");
    }

    fn bind_native_methods(
        &mut self,
        owner: TypeIdx,
        methods: &[CollectionMethod],
        element: TypeIdx,
        key: TypeIdx,
    ) {
        for &method in methods {
            let def = method.def();
            let params: SmallVec<[TypeIdx; 4]> = def
                .params
                .iter()
                .map(|p| match p {
                    ParamSpec::Element => element,
                    ParamSpec::Key => key,
                    ParamSpec::Int => self.basic(BasicKind::Int),
                })
                .collect();
            let ret = match def.returns {
                ReturnSpec::None => self.basic(BasicKind::None),
                ReturnSpec::Bool => self.basic(BasicKind::Bool),
                ReturnSpec::Int => self.basic(BasicKind::Int),
                ReturnSpec::Element => element,
                ReturnSpec::KeyList => self.list_type(key),
                ReturnSpec::ElementList => self.list_type(element),
            };
            let fn_ty = self.function_type(&params, ret);
            let scope = match self.type_data(owner).member_scope() {
                Some(scope) => scope,
                None => continue,
            };
            let name = self.interner.intern(def.name);
            let bound = self
                .symbols
                .bind(scope, name, Some(fn_ty), SymbolKind::NativeMethod(method));
            debug_assert!(bound.is_ok(), "native method bound twice");
        }
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
