//! `clinicops-intelligence`
//!
//! **Responsibility:** the Inventory Intelligence Engine.
//!
//! Reconstructs an item's purchase cycles from its received orders and audit
//! log, and derives a forecast: usage rate, reorder timing, a capital-capped
//! replenishment quantity and a confidence label.
//!
//! This crate:
//! - never queries storage (callers pass snapshots in),
//! - never mutates domain state,
//! - returns the intermediate values behind each decision in
//!   [`MetricsDebug`] so results can be audited.

pub mod anomaly;
pub mod batch;
pub mod consumption;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod governance;
pub mod job;
pub mod metrics;
pub mod options;
pub mod stats;

pub use batch::{BatchOutcome, compute_batch};
pub use cycle::{AnomalyReason, ConsumptionSource, PurchaseCycle, StockSnapshot};
pub use engine::compute_metrics;
pub use error::ForecastError;
pub use governance::{BUFFER_DAYS, CRITICALITY_FACTOR, ROLLING_WINDOW};
pub use job::{IntelligenceJob, ItemForecastJob};
pub use metrics::{AnomalyRecord, Confidence, ItemMetrics, MetricsDebug, StockStatus};
pub use options::ForecastOptions;
