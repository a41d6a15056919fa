//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products and orders are entities: two records with the same id are the same
/// record even if a later write changed their attributes.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
