//! Runtime values.
//!
//! # Heap Enforcement
//!
//! All heap allocations go through factory methods: `Heap<T>` has a
//! crate-private constructor, so values with shared structure can only
//! be built through `Value`/`ListValue`/... factories. Cloning a value
//! clones an `Rc`, never the payload.
//!
//! # Host handles
//!
//! `HostObject` is the host side's "object" - a reference-counted
//! `dyn Any`. Graph values and encapsulated aggregates carry one;
//! equality on host handles is pointer equality.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use saga_types::{BasicKind, SymbolId, TypeIdx, TypeKind, TypeRegistry};

use crate::callable::Callable;
use crate::memory::{MemorySpace, SpaceRef};
use crate::shared::LocalScope;

/// A host-side object reference.
pub type HostObject = Rc<dyn Any>;

/// Factory-enforced shared heap allocation.
///
/// `Rc`-backed: the runtime is single-threaded, values never cross
/// threads.
#[repr(transparent)]
pub struct Heap<T>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }

    /// True if both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

/// Runtime value.
///
/// A closed tagged union mirroring the type lattice. Basic values carry
/// their payload directly; composite values carry their declared type
/// index plus shared internal state.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Heap<String>),
    /// Opaque host graph handle (dependency graphs are parsed and owned
    /// by the host).
    Graph(HostObject),
    Aggregate(AggregateValue),
    List(ListValue),
    Set(SetValue),
    Map(MapValue),
    Function(FunctionValue),
    Enum(EnumValue),
}

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a graph value from a host handle.
    #[inline]
    pub fn graph(handle: HostObject) -> Self {
        Value::Graph(handle)
    }

    /// True for `Value::None`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Truthiness used by conditional evaluation.
    ///
    /// Basic values follow their type's predicate (`none` never, `bool`
    /// itself, numbers non-zero, strings non-empty, graphs present);
    /// composite values are truthy when present.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Graph(_)
            | Value::Aggregate(_)
            | Value::List(_)
            | Value::Set(_)
            | Value::Map(_)
            | Value::Function(_)
            | Value::Enum(_) => true,
        }
    }

    /// The value's declared type.
    pub fn type_of(&self, registry: &TypeRegistry) -> TypeIdx {
        match self {
            Value::None => registry.basic(BasicKind::None),
            Value::Bool(_) => registry.basic(BasicKind::Bool),
            Value::Int(_) => registry.basic(BasicKind::Int),
            Value::Float(_) => registry.basic(BasicKind::Float),
            Value::Str(_) => registry.basic(BasicKind::String),
            Value::Graph(_) => registry.basic(BasicKind::Graph),
            Value::Aggregate(a) => a.ty,
            Value::List(l) => l.ty,
            Value::Set(s) => s.ty,
            Value::Map(m) => m.ty,
            Value::Function(f) => f.ty,
            Value::Enum(e) => e.ty,
        }
    }

    /// The default value for a declared type, used to seed memory-space
    /// slots: basic zero-values, empty containers, `None` otherwise.
    pub fn default_for(ty: TypeIdx, registry: &TypeRegistry) -> Value {
        match registry.kind(ty) {
            TypeKind::Basic(kind) => match kind {
                BasicKind::None | BasicKind::Graph => Value::None,
                BasicKind::Bool => Value::Bool(false),
                BasicKind::Int => Value::Int(0),
                BasicKind::Float => Value::Float(0.0),
                BasicKind::String => Value::string(""),
            },
            TypeKind::List { .. } => Value::List(ListValue::new(ty)),
            TypeKind::Set { .. } => Value::Set(SetValue::new(ty)),
            TypeKind::Map { .. } => Value::Map(MapValue::new(ty)),
            TypeKind::Aggregate { .. }
            | TypeKind::AggregateAdapted { .. }
            | TypeKind::Function { .. }
            | TypeKind::Enum { .. }
            | TypeKind::Prototype { .. } => Value::None,
        }
    }

    /// A short label for the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Graph(_) => "graph",
            Value::Aggregate(_) => "aggregate",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Enum(_) => "enum",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Graph(a), Value::Graph(b)) => Rc::ptr_eq(a, b),
            (Value::Aggregate(a), Value::Aggregate(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Graph(_) => write!(f, "<graph>"),
            Value::Aggregate(a) => write!(f, "<aggregate {:?}>", a.ty),
            Value::List(l) => write!(f, "{:?}", l.values()),
            Value::Set(s) => write!(f, "{:?}", s.values()),
            Value::Map(m) => write!(f, "{:?}", m.entries()),
            Value::Function(func) => write!(f, "<fn {:?}>", func.callable),
            Value::Enum(e) => write!(f, "<enum {:?}.{:?}>", e.ty, e.variant),
        }
    }
}

/// An aggregate value: declared type plus an attached memory space.
///
/// `host` is set when the value encapsulates an already-constructed host
/// object; the instantiator short-circuits such values back to the host
/// object instead of constructing a second one.
#[derive(Clone)]
pub struct AggregateValue {
    pub ty: TypeIdx,
    pub space: SpaceRef,
    pub host: Option<HostObject>,
}

impl AggregateValue {
    /// Create a value with a freshly seeded memory space.
    pub fn new(ty: TypeIdx, registry: &TypeRegistry) -> Self {
        AggregateValue {
            ty,
            space: LocalScope::new(MemorySpace::from_aggregate(ty, registry)),
            host: None,
        }
    }

    /// Create a value over an existing memory space.
    pub fn with_space(ty: TypeIdx, space: SpaceRef) -> Self {
        AggregateValue {
            ty,
            space,
            host: None,
        }
    }

    /// Create a value that encapsulates a live host object.
    pub fn encapsulating(ty: TypeIdx, space: SpaceRef, host: HostObject) -> Self {
        AggregateValue {
            ty,
            space,
            host: Some(host),
        }
    }

    /// True when nothing was explicitly assigned and no host object is
    /// attached.
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && !self.space.borrow().has_dirty()
    }
}

impl PartialEq for AggregateValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.space.ptr_eq(&other.space)
    }
}

/// A list value: insertion-ordered elements.
#[derive(Clone)]
pub struct ListValue {
    pub ty: TypeIdx,
    items: Heap<RefCell<Vec<Value>>>,
}

impl ListValue {
    pub fn new(ty: TypeIdx) -> Self {
        ListValue {
            ty,
            items: Heap::new(RefCell::new(Vec::new())),
        }
    }

    pub fn from_values(ty: TypeIdx, values: Vec<Value>) -> Self {
        ListValue {
            ty,
            items: Heap::new(RefCell::new(values)),
        }
    }

    /// Append a value, preserving insertion order.
    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Snapshot of the elements in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl PartialEq for ListValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && (self.items.ptr_eq(&other.items) || self.values() == other.values())
    }
}

/// A set value: equality-deduplicated elements, order not guaranteed.
#[derive(Clone)]
pub struct SetValue {
    pub ty: TypeIdx,
    items: Heap<RefCell<Vec<Value>>>,
}

impl SetValue {
    pub fn new(ty: TypeIdx) -> Self {
        SetValue {
            ty,
            items: Heap::new(RefCell::new(Vec::new())),
        }
    }

    pub fn from_values(ty: TypeIdx, values: Vec<Value>) -> Self {
        let set = SetValue::new(ty);
        for v in values {
            set.insert(v);
        }
        set
    }

    /// Insert a value; returns false when an equal value was already
    /// present.
    pub fn insert(&self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.items.borrow_mut().push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.borrow().iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Snapshot of the elements; ordering carries no meaning.
    pub fn values(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        if self.ty != other.ty || self.len() != other.len() {
            return false;
        }
        self.items.ptr_eq(&other.items) || self.values().iter().all(|v| other.contains(v))
    }
}

/// A map value: equality-keyed entries, order not guaranteed.
#[derive(Clone)]
pub struct MapValue {
    pub ty: TypeIdx,
    entries: Heap<RefCell<Vec<(Value, Value)>>>,
}

impl MapValue {
    pub fn new(ty: TypeIdx) -> Self {
        MapValue {
            ty,
            entries: Heap::new(RefCell::new(Vec::new())),
        }
    }

    pub fn from_entries(ty: TypeIdx, entries: Vec<(Value, Value)>) -> Self {
        let map = MapValue::new(ty);
        for (k, v) in entries {
            map.insert(k, v);
        }
        map
    }

    /// Insert an entry, replacing the element under an equal key.
    /// Returns the replaced element, if any.
    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = self.entries.borrow_mut();
        for entry in entries.iter_mut() {
            if entry.0 == key {
                return Some(std::mem::replace(&mut entry.1, value));
            }
        }
        entries.push((key, value));
        None
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of the keys.
    pub fn keys(&self) -> Vec<Value> {
        self.entries.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the elements.
    pub fn elements(&self) -> Vec<Value> {
        self.entries.borrow().iter().map(|(_, v)| v.clone()).collect()
    }

    /// Snapshot of the entries.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        if self.ty != other.ty || self.len() != other.len() {
            return false;
        }
        self.entries.ptr_eq(&other.entries)
            || self
                .entries()
                .iter()
                .all(|(k, v)| other.get(k).as_ref() == Some(v))
    }
}

/// A function value: a callable handle plus its static function type.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionValue {
    pub ty: TypeIdx,
    pub callable: Callable,
}

impl FunctionValue {
    pub fn new(ty: TypeIdx, callable: Callable) -> Self {
        FunctionValue { ty, callable }
    }
}

/// An enum value: the chosen variant symbol of an enum type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub ty: TypeIdx,
    pub variant: SymbolId,
}

impl EnumValue {
    pub fn new(ty: TypeIdx, variant: SymbolId) -> Self {
        EnumValue { ty, variant }
    }
}
