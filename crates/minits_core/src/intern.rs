//! Name interning.
//!
//! Identifiers and property names are interned so the checker compares
//! them as integers and can hash them cheaply inside type keys.

use crate::error::{Error, Result};
use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// An interned name. Comparing two atoms is an integer comparison.
///
/// Ordering follows interning order, not alphabetical order; it is only
/// used to put member lists into a canonical order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Atom(Spur);

impl Atom {
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.0)
    }
}

/// Shared string interner.
///
/// Cloning is cheap: every clone points at the same table, so the syntax
/// tree builder and the type table can hand atoms to each other.
#[derive(Clone)]
pub struct Interner {
    rodeo: Arc<ThreadedRodeo>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern a name, returning the existing atom if it was seen before.
    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        Atom::from_spur(self.rodeo.get_or_intern(s))
    }

    #[inline]
    pub fn intern_static(&self, s: &'static str) -> Atom {
        Atom::from_spur(self.rodeo.get_or_intern_static(s))
    }

    /// Look up a name without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.rodeo.get(s).map(Atom::from_spur)
    }

    /// Like [`Interner::get`], but reports a missing name as an error.
    pub fn lookup(&self, s: &str) -> Result<Atom> {
        self.get(s).ok_or_else(|| Error::UnknownName(s.to_string()))
    }

    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.rodeo.resolve(&atom.as_spur())
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let interner = Interner::new();
        let a = interner.intern("firstName");
        let b = interner.intern("firstName");
        let c = interner.intern("lastName");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "firstName");
        assert_eq!(interner.resolve(c), "lastName");
    }

    #[test]
    fn test_clones_share_the_table() {
        let interner = Interner::new();
        let other = interner.clone();
        let a = interner.intern("pages");
        assert_eq!(other.get("pages"), Some(a));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_lookup_missing_name() {
        let interner = Interner::new();
        assert!(interner.lookup("rhymes").is_err());
        let a = interner.intern_static("rhymes");
        assert_eq!(interner.lookup("rhymes").ok(), Some(a));
    }
}
