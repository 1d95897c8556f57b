//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Derived analytics
/// (purchase cycles, computed metrics) are value objects: two computations over
/// the same history must produce equal values, which is what makes results
/// reproducible and auditable.
///
/// The trait requires:
/// - **Clone**: values are copied, not shared
/// - **PartialEq**: compared by attribute values
/// - **Debug**: printable in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
