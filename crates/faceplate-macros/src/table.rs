//! Macro table: ordered name/value pairs with merge semantics.

use std::collections::BTreeMap;
use std::fmt;

use smol_str::SmolStr;

/// A table of macro definitions.
///
/// Names are case-sensitive word-character identifiers; values are
/// arbitrary strings and may themselves contain macro references, which
/// stay unexpanded until [`resolve`](crate::resolve::resolve) runs.
/// Name enumeration is lexicographic, so dumps and serialized forms are
/// deterministic. Equality and hashing are by content.
///
/// A table handed to a child scope (directly or through
/// [`merge`](Macros::merge)) should be treated as immutable from then
/// on; `merge` never mutates its inputs, so layering display macros
/// under widget macros is safe without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Macros {
    entries: BTreeMap<SmolStr, String>,
}

impl Macros {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a macro, overwriting any existing value for the same name.
    ///
    /// The value is stored verbatim; it may contain unresolved macro
    /// syntax.
    pub fn add(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Returns the value for `name`, or `None` if undefined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns all macro names in ascending lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(SmolStr::as_str)
    }

    /// Returns all `(name, value)` pairs in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of macros in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no macros.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges two tables into a new one; `addition` wins on name
    /// collisions. Neither input is modified.
    #[must_use]
    pub fn merge(base: &Macros, addition: &Macros) -> Macros {
        if addition.is_empty() {
            return base.clone();
        }
        if base.is_empty() {
            return addition.clone();
        }
        let mut merged = base.clone();
        merged.entries.extend(
            addition
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        merged
    }

    /// Returns true if `name` is a valid macro name: one or more ASCII
    /// letters, digits, or underscores.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
    }
}

impl fmt::Display for Macros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.entries {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name} = '{value}'")?;
            first = false;
        }
        Ok(())
    }
}
