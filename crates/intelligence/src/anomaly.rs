//! Anomaly filter.
//!
//! Cycles are tagged, never dropped: an excluded cycle keeps its data and
//! carries the reason, so the audit trail and the valid set come from the same
//! list.

use tracing::warn;

use crate::cycle::{AnomalyReason, ConsumptionSource, PurchaseCycle};
use crate::stats::median;

/// An order this many times the median order quantity is a panic buy.
pub const PANIC_BUY_MULTIPLIER: f64 = 10.0;

/// A snapshot cycle that ends above this share of its starting stock drew
/// down too little to describe normal usage.
pub const UNDER_CONSUMPTION_RETENTION: f64 = 0.40;

/// Tag implausible cycles.
///
/// `anchor_quantities` are the quantities of *all* received orders (the
/// opening order included), which the panic-buy median is taken over.
/// First matching rule wins; panic buying is checked first.
pub fn flag_anomalies(cycles: Vec<PurchaseCycle>, anchor_quantities: &[i64]) -> Vec<PurchaseCycle> {
    let quantities: Vec<f64> = anchor_quantities.iter().map(|&q| q as f64).collect();
    let median_quantity = median(&quantities).filter(|m| *m > 0.0);

    cycles
        .into_iter()
        .map(|mut cycle| {
            cycle.anomaly = detect(&cycle, median_quantity);
            if let Some(reason) = cycle.anomaly {
                warn!(
                    reason = ?reason,
                    cycle_end = %cycle.end_date,
                    order_quantity = cycle.order_quantity,
                    consumed = cycle.quantity_consumed,
                    "excluding anomalous purchase cycle"
                );
            }
            cycle
        })
        .collect()
}

fn detect(cycle: &PurchaseCycle, median_quantity: Option<f64>) -> Option<AnomalyReason> {
    if let Some(m) = median_quantity {
        if cycle.order_quantity as f64 >= PANIC_BUY_MULTIPLIER * m {
            return Some(AnomalyReason::PanicBuy);
        }
    }

    if cycle.source == ConsumptionSource::Snapshot {
        if let Some(snapshot) = cycle.snapshot {
            let retained_limit = UNDER_CONSUMPTION_RETENTION * snapshot.start_stock as f64;
            if snapshot.end_stock as f64 > retained_limit {
                return Some(AnomalyReason::UnderConsumption);
            }
        }
    }

    None
}
