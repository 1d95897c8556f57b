//! Consumption resolver.
//!
//! For each cycle the resolvers in [`HIERARCHY`] are tried in order and the
//! first one that commits a value wins:
//!
//! 1. `CONSUMED_LOGS`: net of the signed CONSUMED deltas in `(start, end]`,
//!    taken as a magnitude.
//! 2. `SNAPSHOT`: RESTOCKED level at the start minus the UPDATED
//!    previous level at the end, both within ±1 hour of their anchor.
//! 3. `FALLBACK_ORDER_QTY`: the closing order's quantity.
//!
//! Log evidence always outranks snapshots, which always outrank the
//! "ordered = consumed" assumption.

use chrono::{DateTime, Utc};
use tracing::debug;

use clinicops_inventory::AuditEvent;

use crate::cycle::{ConsumptionSource, CycleShell, PurchaseCycle, StockSnapshot};
use crate::error::ForecastError;

/// Maximum distance between a snapshot entry and its anchor order.
pub const SNAPSHOT_TOLERANCE_MS: i64 = 60 * 60 * 1000;

/// A committed consumption figure for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub quantity_consumed: i64,
    pub source: ConsumptionSource,
    pub snapshot: Option<StockSnapshot>,
}

/// `Ok(None)` means "no signal, ask the next resolver".
pub type Resolver = fn(&CycleShell, &[AuditEvent]) -> Result<Option<Resolution>, ForecastError>;

/// Resolvers in precedence order.
pub const HIERARCHY: [Resolver; 3] = [from_consumed_logs, from_snapshot, from_order_quantity];

pub fn from_consumed_logs(
    cycle: &CycleShell,
    events: &[AuditEvent],
) -> Result<Option<Resolution>, ForecastError> {
    let mut seen = false;
    let mut net: i64 = 0;
    for event in events {
        if event.timestamp <= cycle.start_date || event.timestamp > cycle.end_date {
            continue;
        }
        if let Some(delta) = event.consumed_delta() {
            seen = true;
            net = net.saturating_add(delta);
        }
    }

    // Corrections offset earlier deltas; the sign convention only flips the net.
    Ok(seen.then_some(Resolution {
        quantity_consumed: net.saturating_abs(),
        source: ConsumptionSource::ConsumedLogs,
        snapshot: None,
    }))
}

pub fn from_snapshot(
    cycle: &CycleShell,
    events: &[AuditEvent],
) -> Result<Option<Resolution>, ForecastError> {
    let start_stock = nearest_level(events, cycle.start_date, AuditEvent::restocked_level);
    let end_stock = nearest_level(events, cycle.end_date, AuditEvent::level_before_update);

    let (Some(start_stock), Some(end_stock)) = (start_stock, end_stock) else {
        return Ok(None);
    };

    if start_stock < 0 || end_stock < 0 {
        return Err(ForecastError::malformed(format!(
            "negative stock snapshot around cycle {} -> {} (start {start_stock}, end {end_stock})",
            cycle.start_date, cycle.end_date
        )));
    }

    Ok(Some(Resolution {
        quantity_consumed: start_stock - end_stock,
        source: ConsumptionSource::Snapshot,
        snapshot: Some(StockSnapshot {
            start_stock,
            end_stock,
        }),
    }))
}

pub fn from_order_quantity(
    cycle: &CycleShell,
    _events: &[AuditEvent],
) -> Result<Option<Resolution>, ForecastError> {
    Ok(Some(Resolution {
        quantity_consumed: cycle.order_quantity,
        source: ConsumptionSource::FallbackOrderQty,
        snapshot: None,
    }))
}

/// Level from the entry nearest `anchor` within tolerance; ties keep the
/// earliest entry in log order.
fn nearest_level(
    events: &[AuditEvent],
    anchor: DateTime<Utc>,
    level: fn(&AuditEvent) -> Option<i64>,
) -> Option<i64> {
    let mut best: Option<(i64, i64)> = None;
    for event in events {
        let Some(value) = level(event) else {
            continue;
        };
        let distance = (event.timestamp - anchor).num_milliseconds().abs();
        if distance > SNAPSHOT_TOLERANCE_MS {
            continue;
        }
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, value)),
        }
    }
    best.map(|(_, value)| value)
}

/// Run the hierarchy for one cycle.
pub fn resolve_cycle(
    cycle: &CycleShell,
    events: &[AuditEvent],
) -> Result<PurchaseCycle, ForecastError> {
    for resolver in HIERARCHY {
        if let Some(resolution) = resolver(cycle, events)? {
            return Ok(PurchaseCycle {
                start_date: cycle.start_date,
                end_date: cycle.end_date,
                duration_days: cycle.duration_days,
                order_quantity: cycle.order_quantity,
                quantity_consumed: resolution.quantity_consumed,
                source: resolution.source,
                snapshot: resolution.snapshot,
                anomaly: None,
            });
        }
    }
    // The fallback resolver always commits.
    Err(ForecastError::malformed(format!(
        "no consumption signal for cycle ending {}",
        cycle.end_date
    )))
}

pub fn resolve_all(
    cycles: &[CycleShell],
    events: &[AuditEvent],
) -> Result<Vec<PurchaseCycle>, ForecastError> {
    let resolved = cycles
        .iter()
        .map(|cycle| resolve_cycle(cycle, events))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        cycles = resolved.len(),
        from_logs = count(&resolved, ConsumptionSource::ConsumedLogs),
        from_snapshots = count(&resolved, ConsumptionSource::Snapshot),
        from_fallback = count(&resolved, ConsumptionSource::FallbackOrderQty),
        "resolved cycle consumption"
    );

    Ok(resolved)
}

fn count(cycles: &[PurchaseCycle], source: ConsumptionSource) -> usize {
    cycles.iter().filter(|c| c.source == source).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use clinicops_core::ItemId;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap() + Duration::days(n)
    }

    fn shell(order_quantity: i64) -> CycleShell {
        CycleShell {
            start_date: day(0),
            end_date: day(10),
            duration_days: 10.0,
            order_quantity,
        }
    }

    #[test]
    fn logs_outrank_snapshot_and_fallback() {
        let item = ItemId::new();
        // logs say 30, snapshot says 100 - 20 = 80, fallback says 500
        let events = vec![
            AuditEvent::restocked(item, day(0), 100),
            AuditEvent::consumed(item, day(2), -10),
            AuditEvent::consumed(item, day(6), -20),
            AuditEvent::updated(item, day(10), 20),
        ];

        let cycle = resolve_cycle(&shell(500), &events).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::ConsumedLogs);
        assert_eq!(cycle.quantity_consumed, 30);
        assert_eq!(cycle.snapshot, None);
    }

    #[test]
    fn snapshot_outranks_fallback() {
        let item = ItemId::new();
        let events = vec![
            AuditEvent::restocked(item, day(0) + Duration::minutes(30), 100),
            AuditEvent::updated(item, day(10) - Duration::minutes(59), 20),
        ];

        let cycle = resolve_cycle(&shell(500), &events).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::Snapshot);
        assert_eq!(cycle.quantity_consumed, 80);
        assert_eq!(
            cycle.snapshot,
            Some(StockSnapshot {
                start_stock: 100,
                end_stock: 20
            })
        );
    }

    #[test]
    fn one_sided_snapshot_falls_back_to_order_quantity() {
        let item = ItemId::new();
        let events = vec![AuditEvent::restocked(item, day(0), 100)];

        let cycle = resolve_cycle(&shell(500), &events).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::FallbackOrderQty);
        assert_eq!(cycle.quantity_consumed, 500);
    }

    #[test]
    fn snapshot_outside_tolerance_is_ignored() {
        let item = ItemId::new();
        let events = vec![
            AuditEvent::restocked(item, day(0) - Duration::minutes(61), 100),
            AuditEvent::updated(item, day(10), 20),
        ];
        let cycle = resolve_cycle(&shell(500), &events).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::FallbackOrderQty);
    }

    #[test]
    fn log_window_is_open_at_start_and_closed_at_end() {
        let item = ItemId::new();
        let at_start = vec![AuditEvent::consumed(item, day(0), -7)];
        let cycle = resolve_cycle(&shell(40), &at_start).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::FallbackOrderQty);

        let at_end = vec![AuditEvent::consumed(item, day(10), -7)];
        let cycle = resolve_cycle(&shell(40), &at_end).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::ConsumedLogs);
        assert_eq!(cycle.quantity_consumed, 7);
    }

    #[test]
    fn log_corrections_net_out_before_magnitude() {
        let item = ItemId::new();
        let events = vec![
            AuditEvent::consumed(item, day(2), -10),
            AuditEvent::consumed(item, day(3), 3),
        ];
        let cycle = resolve_cycle(&shell(500), &events).unwrap();
        assert_eq!(cycle.source, ConsumptionSource::ConsumedLogs);
        assert_eq!(cycle.quantity_consumed, 7);

        let positive_convention = vec![
            AuditEvent::consumed(item, day(2), 10),
            AuditEvent::consumed(item, day(3), -3),
        ];
        let cycle = resolve_cycle(&shell(500), &positive_convention).unwrap();
        assert_eq!(cycle.quantity_consumed, 7);
    }

    #[test]
    fn nearest_snapshot_entry_wins() {
        let item = ItemId::new();
        let events = vec![
            AuditEvent::restocked(item, day(0) - Duration::minutes(40), 90),
            AuditEvent::restocked(item, day(0) + Duration::minutes(5), 100),
            AuditEvent::updated(item, day(10), 25),
        ];
        let cycle = resolve_cycle(&shell(500), &events).unwrap();
        assert_eq!(cycle.quantity_consumed, 75);
    }

    #[test]
    fn negative_snapshot_is_malformed() {
        let item = ItemId::new();
        let events = vec![
            AuditEvent::restocked(item, day(0), 100),
            AuditEvent::updated(item, day(10), -5),
        ];
        assert!(matches!(
            resolve_cycle(&shell(500), &events),
            Err(ForecastError::MalformedInput(_))
        ));
    }
}
