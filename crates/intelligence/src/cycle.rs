//! Cycle builder: consecutive received orders become purchase cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinicops_core::ValueObject;
use clinicops_inventory::PurchaseOrderRecord;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Where a cycle's consumption figure came from, strongest evidence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionSource {
    ConsumedLogs,
    Snapshot,
    FallbackOrderQty,
}

/// Why a cycle was excluded from aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyReason {
    PanicBuy,
    UnderConsumption,
}

/// Stock levels bracketing a cycle, read from the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub start_stock: i64,
    pub end_stock: i64,
}

/// The bare interval between two anchor orders, before consumption is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleShell {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Calendar days between the anchors (fractional).
    pub duration_days: f64,
    /// Quantity of the order that closes the cycle.
    pub order_quantity: i64,
}

/// A purchase cycle with its resolved consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCycle {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_days: f64,
    pub order_quantity: i64,
    pub quantity_consumed: i64,
    pub source: ConsumptionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<StockSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<AnomalyReason>,
}

impl ValueObject for PurchaseCycle {}

impl PurchaseCycle {
    /// Units per day; undefined for zero-duration cycles.
    pub fn daily_rate(&self) -> Option<f64> {
        if self.duration_days > 0.0 {
            Some(self.quantity_consumed as f64 / self.duration_days)
        } else {
            None
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.anomaly.is_some()
    }

    /// Valid and long enough to have a rate.
    pub fn is_window_eligible(&self) -> bool {
        !self.is_excluded() && self.daily_rate().is_some()
    }
}

/// Build one cycle per consecutive pair of received orders.
///
/// `orders` must be ascending by timestamp (see
/// [`clinicops_inventory::received_in_order`]). Fewer than two orders yield no
/// cycles.
pub fn build_cycles(orders: &[&PurchaseOrderRecord]) -> Vec<CycleShell> {
    orders
        .windows(2)
        .map(|pair| {
            let (open, close) = (pair[0], pair[1]);
            let elapsed = close.timestamp - open.timestamp;
            CycleShell {
                start_date: open.timestamp,
                end_date: close.timestamp,
                duration_days: elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY,
                order_quantity: close.ordered_quantity,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use clinicops_core::ItemId;

    fn test_time(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap() + Duration::days(day)
    }

    fn orders(item_id: ItemId, points: &[(i64, i64)]) -> Vec<PurchaseOrderRecord> {
        points
            .iter()
            .map(|&(day, qty)| PurchaseOrderRecord::received(item_id, qty, test_time(day)))
            .collect()
    }

    #[test]
    fn n_orders_make_n_minus_one_cycles() {
        let item_id = ItemId::new();
        let history = orders(item_id, &[(0, 10), (10, 20), (25, 30), (30, 40)]);
        let refs: Vec<&PurchaseOrderRecord> = history.iter().collect();

        let cycles = build_cycles(&refs);
        assert_eq!(cycles.len(), 3);
        assert_eq!(cycles[0].duration_days, 10.0);
        assert_eq!(cycles[1].duration_days, 15.0);
        assert_eq!(cycles[2].duration_days, 5.0);
        // closing order quantity travels with the cycle
        assert_eq!(cycles[0].order_quantity, 20);
        assert_eq!(cycles[2].order_quantity, 40);
        assert_eq!(cycles[1].start_date, test_time(10));
        assert_eq!(cycles[1].end_date, test_time(25));
    }

    #[test]
    fn zero_or_one_order_make_no_cycles() {
        let item_id = ItemId::new();
        assert!(build_cycles(&[]).is_empty());
        let single = orders(item_id, &[(0, 10)]);
        assert!(build_cycles(&[&single[0]]).is_empty());
    }

    #[test]
    fn durations_are_calendar_fractional_days() {
        let item_id = ItemId::new();
        let mut history = orders(item_id, &[(0, 10), (0, 10)]);
        history[1].timestamp = test_time(0) + Duration::hours(36);
        let refs: Vec<&PurchaseOrderRecord> = history.iter().collect();
        assert_eq!(build_cycles(&refs)[0].duration_days, 1.5);
    }

    #[test]
    fn zero_duration_cycle_has_no_rate() {
        let cycle = PurchaseCycle {
            start_date: test_time(0),
            end_date: test_time(0),
            duration_days: 0.0,
            order_quantity: 10,
            quantity_consumed: 10,
            source: ConsumptionSource::FallbackOrderQty,
            snapshot: None,
            anomaly: None,
        };
        assert_eq!(cycle.daily_rate(), None);
        assert!(!cycle.is_window_eligible());
    }
}
