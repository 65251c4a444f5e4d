//! Error types for host registration, instantiation, and translation.
//!
//! Everything here is the fatal tier: registration rejects malformed
//! descriptors immediately, and a failed conversion propagates to the
//! caller so loading of that single content item halts. Every variant
//! carries the offending type/member/field/parameter name.

use std::fmt;

use saga_types::RegistryError;

/// Error raised while registering host types, builders, enums,
/// extensions, or translators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// The underlying type-registry operation failed.
    Registry(RegistryError),
    /// Two members of one descriptor share a name.
    DuplicateMember { type_name: String, member: String },
    /// A callback member's declared type is not a function type.
    CallbackNotAFunction { type_name: String, member: String },
    /// A constructor-built type declares a member without a setter, so
    /// dirty write-back would have nowhere to go.
    MissingSetter { type_name: String, member: String },
    /// An extension method's declared type is not a function type.
    NotAFunctionType { name: String },
    /// A descriptor for this host class is already registered.
    DuplicateClass { class: String },
    /// A translator for this host class is already registered.
    DuplicateTranslator { class: String },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::Registry(err) => err.fmt(f),
            RegisterError::DuplicateMember { type_name, member } => {
                write!(f, "descriptor for '{type_name}' declares member '{member}' twice")
            }
            RegisterError::CallbackNotAFunction { type_name, member } => {
                write!(
                    f,
                    "callback member '{member}' of '{type_name}' is not declared with a function type"
                )
            }
            RegisterError::MissingSetter { type_name, member } => {
                write!(
                    f,
                    "member '{member}' of constructor-built type '{type_name}' has no setter"
                )
            }
            RegisterError::NotAFunctionType { name } => {
                write!(f, "extension method '{name}' is not declared with a function type")
            }
            RegisterError::DuplicateClass { class } => {
                write!(f, "a descriptor for host class '{class}' is already registered")
            }
            RegisterError::DuplicateTranslator { class } => {
                write!(f, "a translator for host class '{class}' is already registered")
            }
        }
    }
}

impl std::error::Error for RegisterError {}

impl From<RegistryError> for RegisterError {
    fn from(err: RegistryError) -> Self {
        RegisterError::Registry(err)
    }
}

/// Error raised while converting a value tree into host objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstantiateError {
    /// A builder parameter has no matching member in the value's memory
    /// space.
    MissingBuilderMember { type_name: String, parameter: String },
    /// A record field is missing or unassigned; records are never
    /// partially constructed.
    MissingRecordField { type_name: String, field: String },
    /// The chosen enum variant does not exist in the host enum
    /// descriptor. Binding should have made this impossible.
    UnknownEnumVariant { enum_name: String, variant: String },
    /// No host enum descriptor is registered for the enum type.
    MissingEnumDescriptor { enum_name: String },
    /// The adapted type references a builder that was never registered.
    NoBuilder { type_name: String },
    /// The builder function itself failed; wrapped, never retried.
    BuilderFailed { type_name: String, detail: String },
    /// The constructor invocation failed; wrapped, never retried.
    ConstructorFailed { type_name: String, detail: String },
    /// Writing a dirty member back onto the constructed object failed.
    FieldSetFailed {
        type_name: String,
        member: String,
        detail: String,
    },
    /// Setting an extension property failed.
    PropertyFailed {
        type_name: String,
        property: String,
        detail: String,
    },
    /// A callback slot's declared shape cannot be satisfied.
    CallbackShapeMismatch { member: String, detail: String },
    /// A callback adapter was invoked with the wrong number of host
    /// arguments.
    CallbackArity { expected: usize, found: usize },
    /// The wrapped callable failed during a callback invocation.
    CallbackFailed { detail: String },
    /// A container element converted to nothing.
    UnconvertibleElement { container: &'static str },
    /// Translating a host argument into a value failed.
    Translate(TranslateError),
    /// An internal invariant did not hold.
    Internal { detail: String },
}

impl fmt::Display for InstantiateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstantiateError::MissingBuilderMember { type_name, parameter } => {
                write!(
                    f,
                    "builder parameter '{parameter}' cannot be resolved in the memory space of '{type_name}'"
                )
            }
            InstantiateError::MissingRecordField { type_name, field } => {
                write!(
                    f,
                    "record field '{field}' of '{type_name}' cannot be resolved in the supplied memory space"
                )
            }
            InstantiateError::UnknownEnumVariant { enum_name, variant } => {
                write!(f, "enum '{enum_name}' has no variant named '{variant}'")
            }
            InstantiateError::MissingEnumDescriptor { enum_name } => {
                write!(f, "no host descriptor registered for enum '{enum_name}'")
            }
            InstantiateError::NoBuilder { type_name } => {
                write!(f, "no builder registered for adapted type '{type_name}'")
            }
            InstantiateError::BuilderFailed { type_name, detail } => {
                write!(f, "builder for '{type_name}' failed: {detail}")
            }
            InstantiateError::ConstructorFailed { type_name, detail } => {
                write!(f, "constructing '{type_name}' failed: {detail}")
            }
            InstantiateError::FieldSetFailed {
                type_name,
                member,
                detail,
            } => {
                write!(f, "setting member '{member}' of '{type_name}' failed: {detail}")
            }
            InstantiateError::PropertyFailed {
                type_name,
                property,
                detail,
            } => {
                write!(f, "setting property '{property}' of '{type_name}' failed: {detail}")
            }
            InstantiateError::CallbackShapeMismatch { member, detail } => {
                write!(f, "callback slot '{member}': {detail}")
            }
            InstantiateError::CallbackArity { expected, found } => {
                write!(
                    f,
                    "callback adapter invoked with {found} argument(s), expected {expected}"
                )
            }
            InstantiateError::CallbackFailed { detail } => {
                write!(f, "callback invocation failed: {detail}")
            }
            InstantiateError::UnconvertibleElement { container } => {
                write!(f, "a {container} element converted to no host object")
            }
            InstantiateError::Translate(err) => err.fmt(f),
            InstantiateError::Internal { detail } => {
                write!(f, "internal invariant violated: {detail}")
            }
        }
    }
}

impl std::error::Error for InstantiateError {}

impl From<TranslateError> for InstantiateError {
    fn from(err: TranslateError) -> Self {
        InstantiateError::Translate(err)
    }
}

/// Error raised while translating a host object into a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslateError {
    /// No DSL type is registered for the object's host class and no
    /// target type was supplied.
    UnknownHostType,
    /// The host object does not hold the expected marshalled
    /// representation.
    DowncastFailed { expected: &'static str },
    /// The host enum value does not correspond to a registered variant.
    UnknownEnumValue { enum_name: String },
    /// A member getter produced a value of the wrong type.
    MemberMismatch { member: String, detail: String },
    /// Host objects of this kind have no value translation.
    UnsupportedKind { kind: &'static str },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::UnknownHostType => {
                write!(f, "no DSL type registered for the host object's class")
            }
            TranslateError::DowncastFailed { expected } => {
                write!(f, "host object does not hold the expected `{expected}`")
            }
            TranslateError::UnknownEnumValue { enum_name } => {
                write!(
                    f,
                    "host value does not match any registered variant of enum '{enum_name}'"
                )
            }
            TranslateError::MemberMismatch { member, detail } => {
                write!(f, "member '{member}' snapshot failed: {detail}")
            }
            TranslateError::UnsupportedKind { kind } => {
                write!(f, "host objects of {kind} kind have no value translation")
            }
        }
    }
}

impl std::error::Error for TranslateError {}
