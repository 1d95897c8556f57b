//! Tracing/logging setup shared by processes that host the engine.
//!
//! The engine crates only emit `tracing` events; installing a subscriber is
//! the host's decision.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide logging with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init();
}

pub use self::tracing::{LogFormat, try_init};
