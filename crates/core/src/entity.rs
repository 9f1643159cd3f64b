//! Entity trait: a record whose identity survives state changes.

/// Anything addressable by a store-assigned identifier.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
