//! The host registry.
//!
//! Registration-time tables in place of runtime reflection: type
//! descriptors, builder functions, host enum descriptors, extension
//! properties/methods, and host-to-DSL translators, keyed by `TypeIdx`,
//! `BuilderId`, `ExtensionId`, and the host class's
//! `std::any::TypeId`.
//!
//! Registration also binds the corresponding symbols through the type
//! registry, so the binder and interpreter see host-bound types exactly
//! like structural ones. Populated once during startup, read-only
//! afterwards.

use std::any::{type_name, TypeId as ClassId};

use rustc_hash::{FxHashMap, FxHashSet};
use saga_types::{BuilderId, ExtensionId, SymbolKind, TypeIdx, TypeKind, TypeRegistry};
use saga_ir::Name;
use tracing::debug;

use crate::descriptor::{
    BuilderDescriptor, BuilderParam, Construct, EnumDescriptor, ExtensionMethod,
    ExtensionProperty, MemberSpec, TypeDescriptor,
};
use crate::error::RegisterError;
use crate::translate::TranslatorFn;

/// Registry of everything the host side contributes to a session.
#[derive(Default)]
pub struct HostRegistry {
    descriptors: FxHashMap<TypeIdx, TypeDescriptor>,
    enums: FxHashMap<TypeIdx, EnumDescriptor>,
    builders: Vec<BuilderDescriptor>,
    /// Host class -> DSL type, for translation without a target type.
    class_types: FxHashMap<ClassId, TypeIdx>,
    translators: FxHashMap<ClassId, TranslatorFn>,
    properties: Vec<ExtensionProperty>,
    methods: Vec<ExtensionMethod>,
}

impl HostRegistry {
    pub fn new() -> Self {
        HostRegistry::default()
    }

    /// Register a host-bound aggregate type.
    ///
    /// `T` is the concrete type the descriptor's closures store inside
    /// the `HostObject` (e.g. `RefCell<Health>` for a mutable
    /// component). Creates the aggregate type, binds its member
    /// symbols, and stores the descriptor.
    pub fn register_type<T: 'static>(
        &mut self,
        types: &mut TypeRegistry,
        descriptor: TypeDescriptor,
    ) -> Result<TypeIdx, RegisterError> {
        self.validate_descriptor(types, &descriptor)?;
        let class = ClassId::of::<T>();
        if self.class_types.contains_key(&class) {
            return Err(RegisterError::DuplicateClass {
                class: type_name::<T>().to_owned(),
            });
        }

        let ty = types.aggregate_type(descriptor.name)?;
        for member in &descriptor.members {
            let kind = match member.spec {
                MemberSpec::Data => SymbolKind::Member,
                MemberSpec::Callback(_) => SymbolKind::Callback,
            };
            types.bind_member(ty, member.name, member.ty, kind)?;
        }
        debug!(
            name = types.interner().lookup(descriptor.name),
            "registered host type"
        );

        self.class_types.insert(class, ty);
        self.descriptors.insert(ty, descriptor);
        Ok(ty)
    }

    /// Register a builder function, producing an adapted aggregate type.
    ///
    /// `T` is the concrete type the builder stores inside the returned
    /// `HostObject`. Every member parameter becomes a member symbol on
    /// the adapted type, in builder parameter order.
    pub fn register_builder<T: 'static>(
        &mut self,
        types: &mut TypeRegistry,
        descriptor: BuilderDescriptor,
    ) -> Result<TypeIdx, RegisterError> {
        let class = ClassId::of::<T>();
        if self.class_types.contains_key(&class) {
            return Err(RegisterError::DuplicateClass {
                class: type_name::<T>().to_owned(),
            });
        }

        let raw = u32::try_from(self.builders.len())
            .unwrap_or_else(|_| panic!("builder arena overflow: {}", self.builders.len()));
        let id = BuilderId(raw);
        let ty = types.adapted_type(descriptor.name, id)?;
        for param in &descriptor.params {
            match param {
                BuilderParam::Member { name, ty: member_ty }
                | BuilderParam::Context {
                    key: name,
                    ty: member_ty,
                } => {
                    types.bind_member(ty, *name, *member_ty, SymbolKind::Member)?;
                }
                // The implicit `$name` slot is seeded by every memory
                // space already.
                BuilderParam::DefinitionName => {}
            }
        }
        debug!(
            name = types.interner().lookup(descriptor.name),
            "registered builder type"
        );

        self.builders.push(descriptor);
        self.class_types.insert(class, ty);
        Ok(ty)
    }

    /// Register a host enum under the given DSL name.
    ///
    /// `T` is the host enum type itself.
    pub fn register_enum<T: 'static>(
        &mut self,
        types: &mut TypeRegistry,
        name: Name,
        descriptor: EnumDescriptor,
    ) -> Result<TypeIdx, RegisterError> {
        let class = ClassId::of::<T>();
        if self.class_types.contains_key(&class) {
            return Err(RegisterError::DuplicateClass {
                class: type_name::<T>().to_owned(),
            });
        }

        let ty = types.enum_type(name)?;
        for (variant, _) in &descriptor.variants {
            types.bind_variant(ty, *variant)?;
        }

        self.enums.insert(ty, descriptor);
        self.class_types.insert(class, ty);
        Ok(ty)
    }

    /// Attach an extension property to an already-registered type.
    pub fn register_property(
        &mut self,
        types: &mut TypeRegistry,
        extended: TypeIdx,
        property: ExtensionProperty,
    ) -> Result<ExtensionId, RegisterError> {
        let raw = u32::try_from(self.properties.len())
            .unwrap_or_else(|_| panic!("property arena overflow: {}", self.properties.len()));
        let id = ExtensionId(raw);
        let kind = SymbolKind::Property {
            id,
            settable: property.set.is_some(),
            gettable: property.get.is_some(),
        };
        types.bind_member(extended, property.name, property.ty, kind)?;
        self.properties.push(property);
        Ok(id)
    }

    /// Attach an extension method to an already-registered type.
    pub fn register_method(
        &mut self,
        types: &mut TypeRegistry,
        extended: TypeIdx,
        method: ExtensionMethod,
    ) -> Result<ExtensionId, RegisterError> {
        if !matches!(types.kind(method.ty), TypeKind::Function { .. }) {
            return Err(RegisterError::NotAFunctionType {
                name: types.interner().lookup(method.name).to_owned(),
            });
        }
        let raw = u32::try_from(self.methods.len())
            .unwrap_or_else(|_| panic!("method arena overflow: {}", self.methods.len()));
        let id = ExtensionId(raw);
        types.bind_member(extended, method.name, method.ty, SymbolKind::ExtensionMethod(id))?;
        self.methods.push(method);
        Ok(id)
    }

    /// Register a custom host-to-DSL translator for a host class.
    pub fn register_translator<T: 'static>(
        &mut self,
        translator: TranslatorFn,
    ) -> Result<(), RegisterError> {
        let class = ClassId::of::<T>();
        if self.translators.contains_key(&class) {
            return Err(RegisterError::DuplicateTranslator {
                class: type_name::<T>().to_owned(),
            });
        }
        self.translators.insert(class, translator);
        Ok(())
    }

    // === Lookup ===
    //
    // Accessors clone the stored artifact (cheap: descriptors are
    // vectors of `Rc` closures) so callers never hold a registry borrow
    // across recursive conversion.

    pub fn descriptor(&self, ty: TypeIdx) -> Option<TypeDescriptor> {
        self.descriptors.get(&ty).cloned()
    }

    pub fn enum_descriptor(&self, ty: TypeIdx) -> Option<EnumDescriptor> {
        self.enums.get(&ty).cloned()
    }

    pub fn builder(&self, id: BuilderId) -> Option<BuilderDescriptor> {
        self.builders.get(id.0 as usize).cloned()
    }

    pub fn property(&self, id: ExtensionId) -> Option<ExtensionProperty> {
        self.properties.get(id.0 as usize).cloned()
    }

    pub fn extension_method(&self, id: ExtensionId) -> Option<ExtensionMethod> {
        self.methods.get(id.0 as usize).cloned()
    }

    pub fn translator(&self, class: ClassId) -> Option<TranslatorFn> {
        self.translators.get(&class).cloned()
    }

    pub fn dsl_type_of(&self, class: ClassId) -> Option<TypeIdx> {
        self.class_types.get(&class).copied()
    }

    fn validate_descriptor(
        &self,
        types: &TypeRegistry,
        descriptor: &TypeDescriptor,
    ) -> Result<(), RegisterError> {
        let type_name = types.interner().lookup(descriptor.name);
        let mut seen = FxHashSet::default();
        for member in &descriptor.members {
            if !seen.insert(member.name) {
                return Err(RegisterError::DuplicateMember {
                    type_name: type_name.to_owned(),
                    member: types.interner().lookup(member.name).to_owned(),
                });
            }
            if matches!(member.spec, MemberSpec::Callback(_))
                && !matches!(types.kind(member.ty), TypeKind::Function { .. })
            {
                return Err(RegisterError::CallbackNotAFunction {
                    type_name: type_name.to_owned(),
                    member: types.interner().lookup(member.name).to_owned(),
                });
            }
            // Constructor-built types write dirty members back through
            // setters after construction; a member without one would be
            // silently unassignable.
            if matches!(descriptor.construct, Construct::Constructor { .. })
                && member.set.is_none()
            {
                return Err(RegisterError::MissingSetter {
                    type_name: type_name.to_owned(),
                    member: types.interner().lookup(member.name).to_owned(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
