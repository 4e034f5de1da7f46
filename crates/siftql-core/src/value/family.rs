//! Type-family classification for declared field types.
//!
//! Families are coarse routing categories. They drive the free-text heuristic
//! table and operator applicability, never value conversion itself.

///
/// TypeFamily
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeFamily {
    Textual,
    Character,
    Bool,
    Numeric,
    Temporal,
    Year,
    Identifier,
    Bytes,
    Enum,
    Collection,
    Record,
    Custom,
}

impl TypeFamily {
    /// Families whose values carry a meaningful textual rendering for
    /// substring matching.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::Textual)
    }
}
