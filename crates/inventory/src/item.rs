use serde::{Deserialize, Serialize};

use clinicops_core::{DomainError, DomainResult, Entity, ItemId};

/// Snapshot of a stocked catalog item.
///
/// Owned by the inventory catalog and handed to the engine as an immutable
/// value. `category` and `unit_cost_cents` are carried for callers; no
/// forecast depends on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockedItem {
    pub id: ItemId,
    pub name: String,
    /// Current on-hand quantity.
    pub stock: i64,
    /// Days between placing a replenishment order and receiving it.
    pub lead_time_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost_cents: Option<i64>,
}

impl StockedItem {
    pub fn new(id: ItemId, name: impl Into<String>, stock: i64, lead_time_days: i64) -> Self {
        Self {
            id,
            name: name.into(),
            stock,
            lead_time_days,
            category: None,
            unit_cost_cents: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unit_cost_cents(mut self, cents: i64) -> Self {
        self.unit_cost_cents = Some(cents);
        self
    }

    /// Check the fields the engine relies on.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if self.stock < 0 {
            return Err(DomainError::validation(format!(
                "item {} has negative stock ({})",
                self.id, self.stock
            )));
        }
        if self.lead_time_days < 0 {
            return Err(DomainError::validation(format!(
                "item {} has negative lead time ({} days)",
                self.id, self.lead_time_days
            )));
        }
        if let Some(cost) = self.unit_cost_cents {
            if cost < 0 {
                return Err(DomainError::validation(format!(
                    "item {} has negative unit cost ({cost})",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

impl Entity for StockedItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item() -> StockedItem {
        StockedItem::new(ItemId::new(), "Nitrile gloves (M)", 40, 14)
    }

    #[test]
    fn valid_item_passes() {
        let item = test_item().with_category("PPE").with_unit_cost_cents(1250);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut item = test_item();
        item.name = "   ".to_string();
        match item.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("name cannot be empty") => {}
            other => panic!("Expected validation error for empty name, got {other:?}"),
        }
    }

    #[test]
    fn negative_stock_and_lead_time_are_rejected() {
        let mut item = test_item();
        item.stock = -1;
        assert!(matches!(item.validate(), Err(DomainError::Validation(_))));

        let mut item = test_item();
        item.lead_time_days = -3;
        match item.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("negative lead time") => {}
            other => panic!("Expected validation error for lead time, got {other:?}"),
        }
    }

    #[test]
    fn deserializes_from_camel_case_without_metadata() {
        let id = ItemId::new();
        let json = format!(
            r#"{{"id":"{id}","name":"Gauze","stock":12,"leadTimeDays":7}}"#
        );
        let item: StockedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.lead_time_days, 7);
        assert_eq!(item.category, None);
    }
}
