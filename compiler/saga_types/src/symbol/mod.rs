//! Symbol and scope model.
//!
//! Symbols are name/type/declaring-scope triples stored in an arena;
//! scopes form a parent chain so aggregate member scopes can shadow and
//! fall back to the global scope. Both are addressed by compact index
//! newtypes, which keeps symbols `Copy`-cheap to pass around and makes
//! identity comparisons trivial.

use rustc_hash::FxHashMap;
use saga_ir::{CollectionMethod, Name};

use crate::types::TypeIdx;

/// Index of a scope in the symbol table's scope arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope, created with the table.
    pub const GLOBAL: ScopeId = ScopeId(0);

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Index of a symbol in the symbol table's symbol arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque handle to a host-registered extension artifact (property or
/// extension method).
///
/// The host registry owns the artifact; symbols only carry the id so the
/// type system stays independent of host-side closures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ExtensionId(pub u32);

/// What a symbol stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// A type bound as a symbol (its `ty` is the type itself).
    Type(TypeIdx),
    /// A data member of an aggregate type.
    Member,
    /// A callback slot member of an aggregate type.
    Callback,
    /// A variant of an enum type.
    EnumVariant,
    /// A native method pre-bound on a container type's member scope.
    NativeMethod(CollectionMethod),
    /// An extension property attached to a host-bound type.
    Property {
        id: ExtensionId,
        settable: bool,
        gettable: bool,
    },
    /// An extension method attached to a host-bound type.
    ExtensionMethod(ExtensionId),
}

/// A symbol: name, declaring scope, optional data type, kind.
///
/// Immutable after creation.
#[derive(Clone, Debug)]
pub struct SymbolData {
    pub name: Name,
    pub scope: ScopeId,
    pub ty: Option<TypeIdx>,
    pub kind: SymbolKind,
}

struct ScopeData {
    parent: Option<ScopeId>,
    bindings: FxHashMap<Name, SymbolId>,
    /// Symbols in declaration order (record construction depends on it).
    order: Vec<SymbolId>,
}

/// Error returned by [`SymbolTable::bind`] when the name is already
/// bound in the target scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DuplicateSymbol {
    pub name: Name,
    pub existing: SymbolId,
}

/// Arena of scopes and symbols.
pub struct SymbolTable {
    scopes: Vec<ScopeData>,
    symbols: Vec<SymbolData>,
}

impl SymbolTable {
    /// Create a table with an empty global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![ScopeData {
                parent: None,
                bindings: FxHashMap::default(),
                order: Vec::new(),
            }],
            symbols: Vec::new(),
        }
    }

    /// The global scope.
    #[inline]
    pub fn global_scope(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Create a new scope with the given parent.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        let idx = u32::try_from(self.scopes.len())
            .unwrap_or_else(|_| panic!("scope arena overflow: {} scopes", self.scopes.len()));
        self.scopes.push(ScopeData {
            parent: Some(parent),
            bindings: FxHashMap::default(),
            order: Vec::new(),
        });
        ScopeId(idx)
    }

    /// Parent of a scope, if any.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0 as usize].parent
    }

    /// Bind a new symbol into a scope.
    ///
    /// Fails if the name is already bound in that scope (parent scopes
    /// are not consulted; shadowing across scopes is allowed).
    pub fn bind(
        &mut self,
        scope: ScopeId,
        name: Name,
        ty: Option<TypeIdx>,
        kind: SymbolKind,
    ) -> Result<SymbolId, DuplicateSymbol> {
        if let Some(&existing) = self.scopes[scope.0 as usize].bindings.get(&name) {
            return Err(DuplicateSymbol { name, existing });
        }
        let idx = u32::try_from(self.symbols.len())
            .unwrap_or_else(|_| panic!("symbol arena overflow: {} symbols", self.symbols.len()));
        let id = SymbolId(idx);
        self.symbols.push(SymbolData {
            name,
            scope,
            ty,
            kind,
        });
        let data = &mut self.scopes[scope.0 as usize];
        data.bindings.insert(name, id);
        data.order.push(id);
        Ok(id)
    }

    /// Resolve a name, walking the parent chain.
    pub fn resolve(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            let data = &self.scopes[s.0 as usize];
            if let Some(&id) = data.bindings.get(&name) {
                return Some(id);
            }
            current = data.parent;
        }
        None
    }

    /// Resolve a name in a single scope, without consulting parents.
    pub fn resolve_local(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        self.scopes[scope.0 as usize].bindings.get(&name).copied()
    }

    /// The symbol data for an id.
    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.0 as usize]
    }

    /// Symbols bound in a scope, in declaration order.
    pub fn scope_symbols(&self, scope: ScopeId) -> impl Iterator<Item = SymbolId> + '_ {
        self.scopes[scope.0 as usize].order.iter().copied()
    }

    /// Number of symbols bound in a scope.
    pub fn scope_len(&self, scope: ScopeId) -> usize {
        self.scopes[scope.0 as usize].order.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
