use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinicops_core::{DomainError, DomainResult, Entity, ItemId, OrderId};

/// Purchase order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Approved,
    Received,
    Closed,
}

/// A purchase order for a single stocked item.
///
/// Only orders in the terminal `Received` state are evidence of replenishment;
/// the timestamp is the date the order was placed/received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRecord {
    pub id: OrderId,
    pub item_id: ItemId,
    pub ordered_quantity: i64,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

impl PurchaseOrderRecord {
    /// Convenience constructor for an order already in `Received` state.
    pub fn received(item_id: ItemId, ordered_quantity: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::new(),
            item_id,
            ordered_quantity,
            status: OrderStatus::Received,
            timestamp,
        }
    }

    pub fn is_received(&self) -> bool {
        self.status == OrderStatus::Received
    }

    fn validate_for(&self, item_id: ItemId) -> DomainResult<()> {
        if self.item_id != item_id {
            return Err(DomainError::ownership(format!(
                "order {} belongs to item {}, not {}",
                self.id, self.item_id, item_id
            )));
        }
        if self.ordered_quantity < 0 {
            return Err(DomainError::validation(format!(
                "order {} has negative quantity ({})",
                self.id, self.ordered_quantity
            )));
        }
        Ok(())
    }
}

impl Entity for PurchaseOrderRecord {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Validate an item's orders and return the received ones, oldest first.
///
/// Orders must already be supplied in ascending timestamp order; equal
/// timestamps are allowed. Non-received orders are dropped after validation.
/// Nothing is re-sorted: an out-of-order history is a caller defect.
pub fn received_in_order(
    item_id: ItemId,
    orders: &[PurchaseOrderRecord],
) -> DomainResult<Vec<&PurchaseOrderRecord>> {
    let mut received: Vec<&PurchaseOrderRecord> = Vec::with_capacity(orders.len());

    for order in orders {
        order.validate_for(item_id)?;
        if !order.is_received() {
            continue;
        }
        if let Some(prev) = received.last() {
            if order.timestamp < prev.timestamp {
                return Err(DomainError::invariant(format!(
                    "received orders are not chronological: order {} ({}) precedes order {} ({})",
                    prev.id, prev.timestamp, order.id, order.timestamp
                )));
            }
        }
        received.push(order);
    }

    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn test_time(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn keeps_only_received_orders_in_input_order() {
        let item_id = ItemId::new();
        let mut draft = PurchaseOrderRecord::received(item_id, 5, test_time(3));
        draft.status = OrderStatus::Draft;
        let orders = vec![
            PurchaseOrderRecord::received(item_id, 10, test_time(0)),
            draft,
            PurchaseOrderRecord::received(item_id, 12, test_time(10)),
        ];

        let received = received_in_order(item_id, &orders).unwrap();
        let quantities: Vec<i64> = received.iter().map(|o| o.ordered_quantity).collect();
        assert_eq!(quantities, vec![10, 12]);
    }

    #[test]
    fn non_chronological_history_is_rejected() {
        let item_id = ItemId::new();
        let orders = vec![
            PurchaseOrderRecord::received(item_id, 10, test_time(10)),
            PurchaseOrderRecord::received(item_id, 10, test_time(0)),
        ];
        match received_in_order(item_id, &orders).unwrap_err() {
            DomainError::InvariantViolation(msg) if msg.contains("not chronological") => {}
            other => panic!("Expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn equal_timestamps_are_allowed() {
        let item_id = ItemId::new();
        let orders = vec![
            PurchaseOrderRecord::received(item_id, 10, test_time(0)),
            PurchaseOrderRecord::received(item_id, 10, test_time(0)),
        ];
        assert_eq!(received_in_order(item_id, &orders).unwrap().len(), 2);
    }

    #[test]
    fn negative_quantity_is_rejected_even_when_not_received() {
        let item_id = ItemId::new();
        let mut order = PurchaseOrderRecord::received(item_id, -4, test_time(0));
        order.status = OrderStatus::Approved;
        assert!(matches!(
            received_in_order(item_id, &[order]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn foreign_orders_are_rejected() {
        let item_id = ItemId::new();
        let order = PurchaseOrderRecord::received(ItemId::new(), 4, test_time(0));
        assert!(matches!(
            received_in_order(item_id, &[order]),
            Err(DomainError::OwnershipMismatch(_))
        ));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Received).unwrap();
        assert_eq!(json, "\"received\"");
    }
}
