//! Definition nodes consumed by the type binder.
//!
//! Saga content programs declare structured game content: content-type
//! definitions composed of component entries, and item-prototype
//! definitions composed of property entries. Expression and statement
//! nodes are the interpreter's concern and are not modelled here; the
//! binder only needs the definition skeleton.

use crate::{Name, Span};

/// A parsed content module: the list of definitions the binder visits.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub defs: Vec<DefNode>,
}

/// A top-level definition.
#[derive(Clone, Debug)]
pub enum DefNode {
    /// `entity_type goblin { health_component { max_points: 20 }, ... }`
    ContentType(ContentTypeDef),
    /// `item_type healing_potion { description: "...", ... }`
    ItemType(ItemTypeDef),
}

/// A content-type definition: a named collection of component entries.
#[derive(Clone, Debug)]
pub struct ContentTypeDef {
    pub name: Name,
    pub span: Span,
    pub components: Vec<ComponentDef>,
}

/// One component entry inside a content-type definition.
///
/// The entry's name doubles as the component's type name and is resolved
/// against the global scope at bind time.
#[derive(Clone, Debug)]
pub struct ComponentDef {
    pub type_name: Name,
    pub span: Span,
    pub properties: Vec<PropertyDef>,
}

/// An item-prototype definition: a named set of properties of the
/// well-known item base type.
#[derive(Clone, Debug)]
pub struct ItemTypeDef {
    pub name: Name,
    pub span: Span,
    pub properties: Vec<PropertyDef>,
}

/// A single `name: value` property entry.
///
/// The value expression is opaque to binding; only the property name
/// participates in symbol resolution.
#[derive(Clone, Debug)]
pub struct PropertyDef {
    pub name: Name,
    pub span: Span,
}

impl Module {
    /// Create a module from a list of definitions.
    pub fn new(defs: Vec<DefNode>) -> Self {
        Module { defs }
    }
}
