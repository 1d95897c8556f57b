use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinicops_core::{ItemId, ValueObject};

use crate::cycle::{AnomalyReason, ConsumptionSource, PurchaseCycle};

/// Stock position classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    /// Stock runs out within the lead time.
    Critical,
    /// Stock runs out within lead time plus the buffer.
    OrderSoon,
    Healthy,
    /// More than two predicted cycles of stock, or no measurable usage.
    Overstock,
    /// Not enough valid history to forecast.
    Dormant,
}

/// How much the evidence behind a forecast can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// An excluded cycle, as kept in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyRecord {
    pub reason: AnomalyReason,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub order_quantity: i64,
    pub quantity_consumed: i64,
    pub source: ConsumptionSource,
}

impl AnomalyRecord {
    pub fn from_cycle(cycle: &PurchaseCycle) -> Option<Self> {
        cycle.anomaly.map(|reason| Self {
            reason,
            start_date: cycle.start_date,
            end_date: cycle.end_date,
            order_quantity: cycle.order_quantity,
            quantity_consumed: cycle.quantity_consumed,
            source: cycle.source,
        })
    }
}

/// Explanation block: the intermediate values behind each decision.
///
/// Part of the public result so a forecast can be audited after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDebug {
    pub raw_cycle_count: usize,
    pub valid_cycle_count: usize,
    /// End dates of the cycles in the rolling window, newest first.
    pub cycles_used: Vec<DateTime<Utc>>,
    pub anomalies: Vec<AnomalyRecord>,
    pub raw_recommendation_float: f64,
    pub capital_cap_float: f64,
    pub cap_applied: bool,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub days_until_reorder: Option<f64>,
}

/// Forecast for one stocked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetrics {
    pub item_id: ItemId,
    /// Units per day over the rolling window (duration weighted).
    pub daily_usage_rate: f64,
    /// Coefficient of variation (%) of window daily rates.
    pub stability_index: f64,
    /// Median window cycle length, in days.
    pub predicted_cycle_duration: f64,
    pub lead_time: i64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    /// `None` when there is no usage to run down the stock.
    pub days_until_reorder: Option<f64>,
    /// `None` when there is no usage to run down the stock.
    pub days_remaining: Option<f64>,
    pub recommended_quantity: u64,
    pub status: StockStatus,
    pub confidence: Confidence,
    pub anomalies_detected: usize,
    pub debug: MetricsDebug,
}

impl ValueObject for ItemMetrics {}

impl ItemMetrics {
    pub fn is_dormant(&self) -> bool {
        self.status == StockStatus::Dormant
    }

    /// Whether a reorder alert should be raised.
    pub fn needs_reorder(&self) -> bool {
        matches!(self.status, StockStatus::Critical | StockStatus::OrderSoon)
    }
}
