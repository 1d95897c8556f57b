//! Inventory domain records consumed by the intelligence engine.
//!
//! These are immutable snapshots fetched by callers from storage: the stocked
//! item, its purchase orders and its append-only audit log. This crate only
//! models and validates them (no IO, no HTTP, no storage).

pub mod audit;
pub mod item;
pub mod order;

pub use audit::{AuditAction, AuditEvent};
pub use item::StockedItem;
pub use order::{OrderStatus, PurchaseOrderRecord, received_in_order};
