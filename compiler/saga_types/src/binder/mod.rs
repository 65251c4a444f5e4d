//! The type binder.
//!
//! Walks a module's definition nodes and creates aggregate/item types in
//! the registry's global scope. Soft errors (duplicate definitions,
//! unresolved component names) are accumulated so a single mistake does
//! not block the remaining definitions; a malformed item base type or an
//! unknown item property is fatal to binding.

use saga_ir::{ComponentDef, ContentTypeDef, DefNode, ItemTypeDef, Module};
use tracing::debug;

use crate::error::{BindError, FatalBindError};
use crate::registry::TypeRegistry;
use crate::symbol::SymbolKind;
use crate::types::{TypeIdx, TypeKind};

/// Name of the well-known base type item-prototype definitions extend.
pub const ITEM_BASE_TYPE: &str = "quest_item";

/// Binds definition nodes into types against a registry's global scope.
pub struct TypeBinder {
    errors: Vec<BindError>,
}

impl TypeBinder {
    pub fn new() -> Self {
        TypeBinder { errors: Vec::new() }
    }

    /// Bind all definitions in the module.
    ///
    /// Returns the collected soft errors; `Err` only for fatal
    /// invariant violations (see [`FatalBindError`]).
    pub fn bind(
        mut self,
        registry: &mut TypeRegistry,
        module: &Module,
    ) -> Result<Vec<BindError>, FatalBindError> {
        for def in &module.defs {
            match def {
                DefNode::ContentType(d) => self.bind_content_type(registry, d),
                DefNode::ItemType(d) => self.bind_item_type(registry, d)?,
            }
        }
        Ok(self.errors)
    }

    fn bind_content_type(&mut self, registry: &mut TypeRegistry, def: &ContentTypeDef) {
        if registry.resolve_global(def.name).is_some() {
            self.errors.push(BindError::DuplicateDefinition {
                name: def.name,
                span: def.span,
            });
            return;
        }
        let ty = match registry.aggregate_type(def.name) {
            Ok(ty) => ty,
            Err(_) => {
                self.errors.push(BindError::DuplicateDefinition {
                    name: def.name,
                    span: def.span,
                });
                return;
            }
        };
        debug!(
            name = registry.interner().lookup(def.name),
            "bound content type"
        );
        for component in &def.components {
            self.bind_component(registry, ty, component);
        }
    }

    fn bind_component(
        &mut self,
        registry: &mut TypeRegistry,
        owner: TypeIdx,
        component: &ComponentDef,
    ) {
        // Resolve the component's type name in the global scope - not in
        // the new type's own scope, so non-recursive content types cannot
        // reference themselves through a member.
        let Some(symbol) = registry.resolve_global(component.type_name) else {
            self.errors.push(BindError::UnresolvedComponent {
                name: component.type_name,
                span: component.span,
            });
            return;
        };
        let SymbolKind::Type(component_ty) = registry.symbols().symbol(symbol).kind else {
            self.errors.push(BindError::NotAType {
                name: component.type_name,
                span: component.span,
            });
            return;
        };
        if registry
            .bind_member(owner, component.type_name, component_ty, SymbolKind::Member)
            .is_err()
        {
            self.errors.push(BindError::DuplicateMember {
                type_name: registry.type_data(owner).name,
                member: component.type_name,
                span: component.span,
            });
        }
    }

    fn bind_item_type(
        &mut self,
        registry: &mut TypeRegistry,
        def: &ItemTypeDef,
    ) -> Result<(), FatalBindError> {
        if registry.resolve_global(def.name).is_some() {
            self.errors.push(BindError::DuplicateDefinition {
                name: def.name,
                span: def.span,
            });
            return Ok(());
        }

        let base_name = registry.interner().intern(ITEM_BASE_TYPE);
        let Some(base_symbol) = registry.resolve_global(base_name) else {
            return Err(FatalBindError::MissingBaseType {
                base: ITEM_BASE_TYPE.to_owned(),
            });
        };
        let SymbolKind::Type(base_ty) = registry.symbols().symbol(base_symbol).kind else {
            return Err(FatalBindError::BaseNotAType {
                base: ITEM_BASE_TYPE.to_owned(),
            });
        };
        let base_scope = match registry.kind(base_ty) {
            TypeKind::Aggregate { scope } | TypeKind::AggregateAdapted { scope, .. } => *scope,
            _ => {
                return Err(FatalBindError::BaseNotAType {
                    base: ITEM_BASE_TYPE.to_owned(),
                })
            }
        };

        let item_ty = match registry.aggregate_type(def.name) {
            Ok(ty) => ty,
            Err(_) => {
                self.errors.push(BindError::DuplicateDefinition {
                    name: def.name,
                    span: def.span,
                });
                return Ok(());
            }
        };
        debug!(
            name = registry.interner().lookup(def.name),
            "bound item type"
        );

        for property in &def.properties {
            // Properties are validated against the base type's own
            // scope, never the global one.
            let Some(property_symbol) = registry
                .symbols()
                .resolve_local(base_scope, property.name)
            else {
                return Err(FatalBindError::UnknownProperty {
                    property: registry.interner().lookup(property.name).to_owned(),
                    base: ITEM_BASE_TYPE.to_owned(),
                });
            };
            let Some(property_ty) = registry.symbols().symbol(property_symbol).ty else {
                return Err(FatalBindError::UnknownProperty {
                    property: registry.interner().lookup(property.name).to_owned(),
                    base: ITEM_BASE_TYPE.to_owned(),
                });
            };

            // The item type is its own independent data type: bind a
            // fresh member symbol rather than sharing the base's.
            if registry
                .bind_member(item_ty, property.name, property_ty, SymbolKind::Member)
                .is_err()
            {
                self.errors.push(BindError::DuplicateMember {
                    type_name: registry.type_data(item_ty).name,
                    member: property.name,
                    span: property.span,
                });
            }
        }
        Ok(())
    }
}

impl Default for TypeBinder {
    fn default() -> Self {
        Self::new()
    }
}
