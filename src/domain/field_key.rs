//! Field keys (§3): the abstraction of a heap cell attached to an object.

use super::intern::{InternId, Interner};

/// An interned attribute name. Two equal names intern to the same id, so
/// `FieldKey::Attr` equality is a plain integer comparison (P4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrNameId(pub InternId);

/// Interns attribute names used by [`FieldKey::Attr`].
#[derive(Debug, Default)]
pub struct AttrNameTable(Interner<String>);

impl AttrNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: impl Into<String>) -> AttrNameId {
        AttrNameId(self.0.intern(name.into()))
    }

    pub fn resolve(&self, id: AttrNameId) -> &str {
        self.0.resolve(id.0)
    }
}

/// Tagged union of the ways a heap cell can be addressed. `Copy`, total
/// structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// A named attribute access, `base.name`.
    Attr(AttrNameId),
    /// A list/tuple/set element.
    Elem,
    /// A mapping value.
    Value,
    /// Dynamically named or reflective access — conservatively joined with
    /// every concrete field of the same object (Rule I5).
    Unknown,
}

impl FieldKey {
    pub fn is_attr(self) -> bool {
        matches!(self, FieldKey::Attr(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_attr_names_intern_to_equal_keys() {
        let mut names = AttrNameTable::new();
        let a = FieldKey::Attr(names.intern("x"));
        let b = FieldKey::Attr(names.intern("x"));
        let c = FieldKey::Attr(names.intern("y"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn non_attr_keys_are_singletons() {
        assert_eq!(FieldKey::Elem, FieldKey::Elem);
        assert_ne!(FieldKey::Elem, FieldKey::Value);
        assert_ne!(FieldKey::Value, FieldKey::Unknown);
    }
}
