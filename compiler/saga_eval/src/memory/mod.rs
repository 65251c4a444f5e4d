//! Memory spaces: ordered member storage with dirty tracking.
//!
//! An aggregate value owns a memory space mapping member names to value
//! slots. Each slot records whether the program explicitly assigned it
//! (the dirty flag) - the instantiator only writes dirty members back to
//! host objects, so constructor defaults survive unless the author spoke
//! up. Spaces form a parent-link chain for nested member resolution
//! (component values nested inside an owning content-type value).
//!
//! Slots are declared with a type; `set` rejects a value of a different
//! type, so a space never holds a value that disagrees with its member
//! symbol.

use rustc_hash::FxHashMap;
use saga_ir::Name;
use saga_types::{SymbolKind, TypeIdx, TypeRegistry};

use crate::errors::{self, EvalError};
use crate::shared::LocalScope;
use crate::value::Value;

/// Name of the implicit definition-name member seeded into every
/// aggregate memory space. The interpreter assigns the object
/// definition's name to it; builder parameters can request it.
pub const NAME_MEMBER: &str = "$name";

/// Shared handle to a memory space.
pub type SpaceRef = LocalScope<MemorySpace>;

/// A single member slot.
#[derive(Clone, Debug)]
pub struct Slot {
    pub value: Value,
    /// True once the program explicitly assigned this member.
    pub dirty: bool,
    /// The member symbol's declared type.
    pub declared: TypeIdx,
}

/// Ordered mapping from member name to value slot.
#[derive(Default)]
pub struct MemorySpace {
    /// Slots in declaration order (record construction relies on it).
    slots: Vec<(Name, Slot)>,
    /// Position index for O(1) lookup.
    index: FxHashMap<Name, usize>,
    parent: Option<SpaceRef>,
}

impl MemorySpace {
    /// Create an empty space with no parent.
    pub fn new() -> Self {
        MemorySpace::default()
    }

    /// Create an empty space with a parent link.
    pub fn with_parent(parent: SpaceRef) -> Self {
        MemorySpace {
            slots: Vec::new(),
            index: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Create a space seeded with one default slot per member of the
    /// aggregate type, plus the implicit `$name` slot.
    ///
    /// Seeded slots are not dirty: they hold implicit defaults until the
    /// program assigns them.
    pub fn from_aggregate(ty: TypeIdx, registry: &TypeRegistry) -> Self {
        let mut space = MemorySpace::new();
        let name_member = registry.interner().intern(NAME_MEMBER);
        space.declare_slot(
            name_member,
            registry.basic(saga_types::BasicKind::String),
            Value::string(""),
        );
        for id in registry.member_symbols(ty) {
            let symbol = registry.symbols().symbol(id);
            match symbol.kind {
                SymbolKind::Member | SymbolKind::Callback | SymbolKind::Property { .. } => {
                    if let Some(member_ty) = symbol.ty {
                        space.declare_slot(
                            symbol.name,
                            member_ty,
                            Value::default_for(member_ty, registry),
                        );
                    }
                }
                // Methods and variants carry behavior, not storage.
                SymbolKind::Type(_)
                | SymbolKind::EnumVariant
                | SymbolKind::NativeMethod(_)
                | SymbolKind::ExtensionMethod(_) => {}
            }
        }
        space
    }

    /// Declare a slot with the default value for its type.
    ///
    /// A re-declaration of an existing name is a no-op.
    pub fn declare(&mut self, name: Name, declared: TypeIdx, registry: &TypeRegistry) {
        self.declare_slot(name, declared, Value::default_for(declared, registry));
    }

    fn declare_slot(&mut self, name: Name, declared: TypeIdx, value: Value) {
        if self.index.contains_key(&name) {
            return;
        }
        self.index.insert(name, self.slots.len());
        self.slots.push((
            name,
            Slot {
                value,
                dirty: false,
                declared,
            },
        ));
    }

    /// Resolve a member, walking the parent chain.
    pub fn resolve(&self, name: Name) -> Option<Value> {
        if let Some(&i) = self.index.get(&name) {
            return Some(self.slots[i].1.value.clone());
        }
        self.parent.as_ref().and_then(|p| p.borrow().resolve(name))
    }

    /// Resolve a member in this space only.
    pub fn resolve_local(&self, name: Name) -> Option<Value> {
        self.index.get(&name).map(|&i| self.slots[i].1.value.clone())
    }

    /// True if the member exists locally and was explicitly assigned.
    pub fn is_dirty(&self, name: Name) -> bool {
        self.index
            .get(&name)
            .is_some_and(|&i| self.slots[i].1.dirty)
    }

    /// Assign a member, marking the slot dirty - even when re-assigning
    /// an equal value, because an explicit assignment is authorial
    /// intent either way.
    ///
    /// Rejects values whose type differs from the slot's declared type
    /// (`None` is always accepted).
    pub fn set(&mut self, name: Name, value: Value, registry: &TypeRegistry) -> Result<(), EvalError> {
        self.write(name, value, registry, true)
    }

    /// Write a member without marking it dirty.
    ///
    /// Used when mirroring existing host state into a space: the values
    /// reflect the host object, not an assignment by the program.
    pub fn seed(
        &mut self,
        name: Name,
        value: Value,
        registry: &TypeRegistry,
    ) -> Result<(), EvalError> {
        self.write(name, value, registry, false)
    }

    fn write(
        &mut self,
        name: Name,
        value: Value,
        registry: &TypeRegistry,
        dirty: bool,
    ) -> Result<(), EvalError> {
        let Some(&i) = self.index.get(&name) else {
            return Err(errors::undefined_member(registry.interner().lookup(name)));
        };
        let slot = &mut self.slots[i].1;
        if !value.is_none() {
            let got = value.type_of(registry);
            if got != slot.declared {
                return Err(errors::type_mismatch(
                    registry.type_name(slot.declared),
                    registry.type_name(got),
                ));
            }
        }
        slot.value = value;
        if dirty {
            slot.dirty = true;
        }
        Ok(())
    }

    /// Slots in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (Name, &Slot)> {
        self.slots.iter().map(|(name, slot)| (*name, slot))
    }

    /// True if any slot was explicitly assigned.
    pub fn has_dirty(&self) -> bool {
        self.slots.iter().any(|(_, slot)| slot.dirty)
    }

    /// Number of declared slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no slots are declared.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
