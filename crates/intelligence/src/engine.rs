//! `compute_metrics`: the single entry point of the engine.
//!
//! Pipeline (data flows forward only):
//! 1. validate inputs and keep received orders,
//! 2. build cycles from consecutive anchors,
//! 3. resolve each cycle's consumption,
//! 4. tag anomalies,
//! 5. aggregate the rolling window into a forecast.
//!
//! Pure and synchronous: no IO, no clock reads, no shared state.

use tracing::{debug, info};

use clinicops_core::Entity;
use clinicops_inventory::{AuditEvent, PurchaseOrderRecord, StockedItem, received_in_order};

use crate::anomaly::flag_anomalies;
use crate::consumption::resolve_all;
use crate::cycle::{PurchaseCycle, build_cycles};
use crate::error::ForecastError;
use crate::forecast::{aggregate, assess_confidence, select_window};
use crate::metrics::{AnomalyRecord, Confidence, ItemMetrics, MetricsDebug, StockStatus};
use crate::options::ForecastOptions;

/// Compute the forecast for one item from its history snapshot.
///
/// Fewer than two received orders (or no usable valid cycle) yield dormant
/// metrics, not an error. Malformed records fail fast.
pub fn compute_metrics(
    item: &StockedItem,
    orders: &[PurchaseOrderRecord],
    audit_events: &[AuditEvent],
    options: &ForecastOptions,
) -> Result<ItemMetrics, ForecastError> {
    options.validate()?;
    item.validate()?;
    let item_id = *item.id();
    for event in audit_events {
        event.ensure_item(item_id)?;
    }

    let received = received_in_order(item_id, orders)?;
    let shells = build_cycles(&received);
    debug!(
        item = %item_id,
        received_orders = received.len(),
        raw_cycles = shells.len(),
        "built purchase cycles"
    );

    let anchor_quantities: Vec<i64> = received.iter().map(|o| o.ordered_quantity).collect();
    let cycles = flag_anomalies(resolve_all(&shells, audit_events)?, &anchor_quantities);

    let metrics = assemble(item, &cycles, options);
    info!(
        item = %item_id,
        status = ?metrics.status,
        confidence = ?metrics.confidence,
        daily_usage_rate = metrics.daily_usage_rate,
        recommended_quantity = metrics.recommended_quantity,
        cap_applied = metrics.debug.cap_applied,
        anomalies = metrics.anomalies_detected,
        "computed item metrics"
    );
    Ok(metrics)
}

fn assemble(item: &StockedItem, cycles: &[PurchaseCycle], options: &ForecastOptions) -> ItemMetrics {
    let raw_cycle_count = cycles.len();
    let anomalies: Vec<AnomalyRecord> = cycles.iter().filter_map(AnomalyRecord::from_cycle).collect();
    let anomalies_detected = anomalies.len();
    let valid_cycle_count = raw_cycle_count - anomalies_detected;

    let window = select_window(cycles);
    let Some(forecast) = aggregate(
        &window,
        item.stock,
        item.lead_time_days,
        options.target_coverage_cycles,
    ) else {
        debug!(item = %item.id, raw_cycle_count, valid_cycle_count, "insufficient history, item is dormant");
        return dormant(item, raw_cycle_count, valid_cycle_count, anomalies);
    };

    let confidence = assess_confidence(forecast.cycles_used.len(), anomalies_detected, raw_cycle_count);
    let rec = forecast.recommendation;

    ItemMetrics {
        item_id: item.id,
        daily_usage_rate: forecast.daily_usage_rate,
        stability_index: forecast.stability_index,
        predicted_cycle_duration: forecast.predicted_cycle_duration,
        lead_time: item.lead_time_days,
        safety_stock: forecast.safety_stock,
        reorder_point: forecast.reorder_point,
        days_until_reorder: forecast.days_until_reorder,
        days_remaining: forecast.days_remaining,
        recommended_quantity: rec.quantity,
        status: forecast.status,
        confidence,
        anomalies_detected,
        debug: MetricsDebug {
            raw_cycle_count,
            valid_cycle_count,
            cycles_used: forecast.cycles_used,
            anomalies,
            raw_recommendation_float: rec.raw_float,
            capital_cap_float: rec.capital_cap_float,
            cap_applied: rec.cap_applied,
            safety_stock: forecast.safety_stock,
            reorder_point: forecast.reorder_point,
            days_until_reorder: forecast.days_until_reorder,
        },
    }
}

fn dormant(
    item: &StockedItem,
    raw_cycle_count: usize,
    valid_cycle_count: usize,
    anomalies: Vec<AnomalyRecord>,
) -> ItemMetrics {
    ItemMetrics {
        item_id: item.id,
        daily_usage_rate: 0.0,
        stability_index: 0.0,
        predicted_cycle_duration: 0.0,
        lead_time: item.lead_time_days,
        safety_stock: 0.0,
        reorder_point: 0.0,
        days_until_reorder: None,
        days_remaining: None,
        recommended_quantity: 0,
        status: StockStatus::Dormant,
        confidence: Confidence::Low,
        anomalies_detected: anomalies.len(),
        debug: MetricsDebug {
            raw_cycle_count,
            valid_cycle_count,
            cycles_used: Vec::new(),
            anomalies,
            raw_recommendation_float: 0.0,
            capital_cap_float: 0.0,
            cap_applied: false,
            safety_stock: 0.0,
            reorder_point: 0.0,
            days_until_reorder: None,
        },
    }
}
