use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinicops_core::{DomainError, DomainResult, ItemId};

/// Typed action of an audit-log entry, with its action-specific details.
///
/// Only the three stock-bearing actions carry data the engine reads; every
/// other action (price edits, renames, ...) is kept as `Other` and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditAction {
    /// Stock was replenished; `new_stock` is the level right after receipt.
    Restocked { new_stock: i64 },
    /// Stock was edited; `previous_stock` is the level right before the edit.
    Updated { previous_stock: i64 },
    /// Units were drawn from stock. Signed delta: either sign convention is
    /// accepted, the magnitude is what was used.
    Consumed { quantity: i64 },
    Other(String),
}

/// Append-only audit-log entry for one item.
///
/// Serialized as a log row: `{ itemId, timestamp, action, details }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuditRow", into = "AuditRow")]
pub struct AuditEvent {
    pub item_id: ItemId,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditRow {
    item_id: ItemId,
    timestamp: DateTime<Utc>,
    action: String,
    #[serde(default)]
    details: AuditDetails,
}

impl TryFrom<AuditRow> for AuditEvent {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let missing = |field: &str| {
            DomainError::validation(format!(
                "{} audit entry at {} is missing details.{field}",
                row.action, row.timestamp
            ))
        };
        let action = match row.action.as_str() {
            "RESTOCKED" => AuditAction::Restocked {
                new_stock: row.details.new_stock.ok_or_else(|| missing("newStock"))?,
            },
            "UPDATED" => AuditAction::Updated {
                previous_stock: row
                    .details
                    .previous_stock
                    .ok_or_else(|| missing("previousStock"))?,
            },
            "CONSUMED" => AuditAction::Consumed {
                quantity: row.details.quantity.ok_or_else(|| missing("quantity"))?,
            },
            other => AuditAction::Other(other.to_string()),
        };
        Ok(Self {
            item_id: row.item_id,
            timestamp: row.timestamp,
            action,
        })
    }
}

impl From<AuditEvent> for AuditRow {
    fn from(event: AuditEvent) -> Self {
        let mut details = AuditDetails::default();
        let action = match event.action {
            AuditAction::Restocked { new_stock } => {
                details.new_stock = Some(new_stock);
                "RESTOCKED".to_string()
            }
            AuditAction::Updated { previous_stock } => {
                details.previous_stock = Some(previous_stock);
                "UPDATED".to_string()
            }
            AuditAction::Consumed { quantity } => {
                details.quantity = Some(quantity);
                "CONSUMED".to_string()
            }
            AuditAction::Other(name) => name,
        };
        Self {
            item_id: event.item_id,
            timestamp: event.timestamp,
            action,
            details,
        }
    }
}

impl AuditEvent {
    pub fn new(item_id: ItemId, timestamp: DateTime<Utc>, action: AuditAction) -> Self {
        Self {
            item_id,
            timestamp,
            action,
        }
    }

    pub fn restocked(item_id: ItemId, timestamp: DateTime<Utc>, new_stock: i64) -> Self {
        Self::new(item_id, timestamp, AuditAction::Restocked { new_stock })
    }

    pub fn updated(item_id: ItemId, timestamp: DateTime<Utc>, previous_stock: i64) -> Self {
        Self::new(item_id, timestamp, AuditAction::Updated { previous_stock })
    }

    pub fn consumed(item_id: ItemId, timestamp: DateTime<Utc>, quantity: i64) -> Self {
        Self::new(item_id, timestamp, AuditAction::Consumed { quantity })
    }

    /// Action name, as stored in the audit log.
    pub fn action_type(&self) -> &str {
        match &self.action {
            AuditAction::Restocked { .. } => "RESTOCKED",
            AuditAction::Updated { .. } => "UPDATED",
            AuditAction::Consumed { .. } => "CONSUMED",
            AuditAction::Other(name) => name,
        }
    }

    /// Signed stock delta of a CONSUMED entry, as logged.
    pub fn consumed_delta(&self) -> Option<i64> {
        match self.action {
            AuditAction::Consumed { quantity } => Some(quantity),
            _ => None,
        }
    }

    /// Stock level recorded right after a RESTOCKED entry.
    pub fn restocked_level(&self) -> Option<i64> {
        match self.action {
            AuditAction::Restocked { new_stock } => Some(new_stock),
            _ => None,
        }
    }

    /// Stock level recorded right before an UPDATED entry.
    pub fn level_before_update(&self) -> Option<i64> {
        match self.action {
            AuditAction::Updated { previous_stock } => Some(previous_stock),
            _ => None,
        }
    }

    /// Ensure this entry was logged for `item_id`.
    pub fn ensure_item(&self, item_id: ItemId) -> DomainResult<()> {
        if self.item_id != item_id {
            return Err(DomainError::ownership(format!(
                "{} audit entry at {} belongs to item {}, not {}",
                self.action_type(),
                self.timestamp,
                self.item_id,
                item_id
            )));
        }
        Ok(())
    }
}
