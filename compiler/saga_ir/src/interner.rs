//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked into
//! `&'static str` storage; the interner lives for the whole session,
//! matching the documented lifetime of the type registry it backs. A
//! single map suffices here: binding and interpretation run on one
//! thread.

// Arc is the implementation of SharedInterner - all construction goes
// through the handle type.
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::Name;

struct InternerInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw`.
    strings: Vec<&'static str>,
}

impl InternerInner {
    fn new() -> Self {
        let mut inner = InternerInner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        // Name::EMPTY must resolve to the empty string.
        inner.map.insert("", 0);
        inner.strings.push("");
        inner
    }
}

/// Shared handle to the string interner.
///
/// Cloning the handle shares the underlying storage.
#[derive(Clone)]
pub struct SharedInterner(Arc<RwLock<InternerInner>>);

impl SharedInterner {
    /// Intern a string, returning its `Name`.
    ///
    /// Interning the same content twice returns the same `Name`.
    pub fn intern(&self, s: &str) -> Name {
        {
            let inner = self.0.read();
            if let Some(&idx) = inner.map.get(s) {
                return Name::from_raw(idx);
            }
        }

        let mut inner = self.0.write();
        // Re-check under the write lock: another intern of the same
        // content may have won the race between the two lock scopes.
        if let Some(&idx) = inner.map.get(s) {
            return Name::from_raw(idx);
        }

        let idx = u32::try_from(inner.strings.len())
            .unwrap_or_else(|_| panic!("interner overflow: {} strings", inner.strings.len()));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        inner.map.insert(leaked, idx);
        inner.strings.push(leaked);
        Name::from_raw(idx)
    }

    /// Look up the string content of a `Name`.
    ///
    /// Returns the empty string for a `Name` that was never interned
    /// through this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        let inner = self.0.read();
        inner
            .strings
            .get(name.raw() as usize)
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings (including the pre-interned empty
    /// string).
    pub fn len(&self) -> usize {
        self.0.read().strings.len()
    }

    /// True if only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        SharedInterner(Arc::new(RwLock::new(InternerInner::new())))
    }
}

impl std::fmt::Debug for SharedInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedInterner({} strings)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn intern_is_idempotent() {
        let interner = SharedInterner::default();
        let a = interner.intern("health_component");
        let b = interner.intern("health_component");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_contents_get_distinct_names() {
        let interner = SharedInterner::default();
        let a = interner.intern("goblin");
        let b = interner.intern("troll");
        assert_ne!(a, b);
    }

    #[test]
    fn lookup_returns_content() {
        let interner = SharedInterner::default();
        let name = interner.intern("quest_item");
        assert_eq!(interner.lookup(name), "quest_item");
    }

    #[test]
    fn empty_is_pre_interned() {
        let interner = SharedInterner::default();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn cloned_handles_share_storage() {
        let interner = SharedInterner::default();
        let clone = interner.clone();
        let a = interner.intern("shared");
        let b = clone.intern("shared");
        assert_eq!(a, b);
    }
}
