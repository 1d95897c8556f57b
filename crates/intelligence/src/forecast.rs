//! Forecast aggregator: rolling-window statistics and the replenishment
//! decision.

use chrono::{DateTime, Utc};

use crate::cycle::PurchaseCycle;
use crate::governance::{BUFFER_DAYS, CRITICALITY_FACTOR, ROLLING_WINDOW};
use crate::metrics::{Confidence, StockStatus};
use crate::stats::{coefficient_of_variation_pct, median};

/// Share of lead-time usage held as safety stock even for perfectly regular
/// items.
pub const SAFETY_FLOOR: f64 = 0.25;

/// Service-level multiplier applied to the stability index (≈95%).
pub const SERVICE_LEVEL_Z: f64 = 1.65;

/// A window of at least this many cycles is needed for MEDIUM confidence.
pub const MIN_CYCLES_FOR_MEDIUM: usize = 2;

/// The live forecast derived from a non-empty rolling window.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub daily_usage_rate: f64,
    pub stability_index: f64,
    pub predicted_cycle_duration: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub days_remaining: Option<f64>,
    pub days_until_reorder: Option<f64>,
    pub status: StockStatus,
    pub recommendation: Recommendation,
    pub cycles_used: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub raw_float: f64,
    pub capital_cap_float: f64,
    pub cap_applied: bool,
    pub quantity: u64,
}

/// The most recent window-eligible cycles by end date, newest first.
pub fn select_window(cycles: &[PurchaseCycle]) -> Vec<&PurchaseCycle> {
    let mut eligible: Vec<&PurchaseCycle> =
        cycles.iter().filter(|c| c.is_window_eligible()).collect();
    eligible.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    eligible.truncate(ROLLING_WINDOW);
    eligible
}

/// Aggregate a rolling window. `None` for an empty window.
pub fn aggregate(
    window: &[&PurchaseCycle],
    stock: i64,
    lead_time_days: i64,
    target_coverage_cycles: f64,
) -> Option<Forecast> {
    if window.is_empty() {
        return None;
    }

    let total_consumed: f64 = window.iter().map(|c| c.quantity_consumed as f64).sum();
    let total_days: f64 = window.iter().map(|c| c.duration_days).sum();
    if total_days <= 0.0 {
        return None;
    }
    // Negative net consumption only comes from excluded snapshot cycles.
    let daily_usage_rate = (total_consumed / total_days).max(0.0);

    let durations: Vec<f64> = window.iter().map(|c| c.duration_days).collect();
    let predicted_cycle_duration = median(&durations).unwrap_or(0.0);

    let rates: Vec<f64> = window.iter().filter_map(|c| c.daily_rate()).collect();
    let stability_index = coefficient_of_variation_pct(&rates);

    let lead_time = lead_time_days as f64;
    let safety_stock = safety_stock(daily_usage_rate, lead_time, stability_index);
    let reorder_point = daily_usage_rate * lead_time + safety_stock;

    let stock = stock as f64;
    let (days_remaining, days_until_reorder) = if daily_usage_rate > 0.0 {
        (
            Some(stock / daily_usage_rate),
            Some(((stock - reorder_point) / daily_usage_rate).max(0.0)),
        )
    } else {
        (None, None)
    };

    Some(Forecast {
        daily_usage_rate,
        stability_index,
        predicted_cycle_duration,
        safety_stock,
        reorder_point,
        days_remaining,
        days_until_reorder,
        status: classify_status(days_remaining, lead_time, predicted_cycle_duration),
        recommendation: recommend(
            daily_usage_rate,
            predicted_cycle_duration,
            target_coverage_cycles,
        ),
        cycles_used: window.iter().map(|c| c.end_date).collect(),
    })
}

/// `rate × √lead_time × (SAFETY_FLOOR + SERVICE_LEVEL_Z × stability / 100)`.
///
/// Strictly increasing in stability index and lead time for a positive rate.
pub fn safety_stock(daily_usage_rate: f64, lead_time_days: f64, stability_index: f64) -> f64 {
    if daily_usage_rate <= 0.0 || lead_time_days <= 0.0 {
        return 0.0;
    }
    let variability = SAFETY_FLOOR + SERVICE_LEVEL_Z * stability_index.max(0.0) / 100.0;
    daily_usage_rate * lead_time_days.sqrt() * variability
}

/// Status from days of stock remaining. Ties resolve to the more urgent
/// class, except exactly `2 × cycle` which is still HEALTHY.
pub fn classify_status(
    days_remaining: Option<f64>,
    lead_time_days: f64,
    predicted_cycle_duration: f64,
) -> StockStatus {
    let Some(days) = days_remaining else {
        return StockStatus::Overstock;
    };
    if days <= lead_time_days {
        StockStatus::Critical
    } else if days <= lead_time_days + BUFFER_DAYS as f64 {
        StockStatus::OrderSoon
    } else if days > 2.0 * predicted_cycle_duration {
        StockStatus::Overstock
    } else {
        StockStatus::Healthy
    }
}

/// Coverage-based quantity, capped at one cycle of usage times the
/// criticality factor.
pub fn recommend(
    daily_usage_rate: f64,
    predicted_cycle_duration: f64,
    target_coverage_cycles: f64,
) -> Recommendation {
    let raw_float = daily_usage_rate * predicted_cycle_duration * target_coverage_cycles;
    let capital_cap_float = CRITICALITY_FACTOR * daily_usage_rate * predicted_cycle_duration;
    let cap_applied = raw_float > capital_cap_float;
    let chosen = if cap_applied { capital_cap_float } else { raw_float };

    Recommendation {
        raw_float,
        capital_cap_float,
        cap_applied,
        quantity: ceil_quantity(chosen),
    }
}

/// Never rounds down: any fraction, however small, orders one more unit.
pub(crate) fn ceil_quantity(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.ceil() as u64
}

/// HIGH needs a full window and no exclusions; LOW when the window is thin
/// or most of the history was excluded.
pub fn assess_confidence(cycles_used: usize, anomalies: usize, raw_cycles: usize) -> Confidence {
    if cycles_used < MIN_CYCLES_FOR_MEDIUM || anomalies * 2 > raw_cycles {
        Confidence::Low
    } else if anomalies == 0 && cycles_used >= ROLLING_WINDOW {
        Confidence::High
    } else {
        Confidence::Medium
    }
}
