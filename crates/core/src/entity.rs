//! Entity trait: identity + continuity across snapshots.

/// Entity marker + minimal interface.
///
/// Snapshots of the same entity taken at different times share an identifier;
/// callers use it to check that related records belong together.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
