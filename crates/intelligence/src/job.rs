use serde::{Deserialize, Serialize};

use clinicops_core::ItemId;
use clinicops_inventory::{AuditEvent, PurchaseOrderRecord, StockedItem};

use crate::engine::compute_metrics;
use crate::error::ForecastError;
use crate::metrics::ItemMetrics;
use crate::options::ForecastOptions;

/// An item-scoped unit of analysis.
///
/// Inputs are snapshots provided by callers (loaders, workers); jobs stay
/// storage-agnostic and must not mutate anything.
pub trait IntelligenceJob: Send + Sync {
    type Output: Send;

    /// The item this job analyses.
    fn item_id(&self) -> ItemId;

    fn run(&self) -> Result<Self::Output, ForecastError>;
}

/// One item's full history snapshot plus the options to forecast it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemForecastJob {
    pub item: StockedItem,
    #[serde(default)]
    pub orders: Vec<PurchaseOrderRecord>,
    #[serde(default)]
    pub audit_events: Vec<AuditEvent>,
    #[serde(default)]
    pub options: ForecastOptions,
}

impl ItemForecastJob {
    pub fn new(
        item: StockedItem,
        orders: Vec<PurchaseOrderRecord>,
        audit_events: Vec<AuditEvent>,
    ) -> Self {
        Self {
            item,
            orders,
            audit_events,
            options: ForecastOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ForecastOptions) -> Self {
        self.options = options;
        self
    }
}

impl IntelligenceJob for ItemForecastJob {
    type Output = ItemMetrics;

    fn item_id(&self) -> ItemId {
        self.item.id
    }

    fn run(&self) -> Result<ItemMetrics, ForecastError> {
        compute_metrics(&self.item, &self.orders, &self.audit_events, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_deserializes_with_default_options() {
        let id = ItemId::new();
        let json = format!(
            r#"{{
                "item": {{"id":"{id}","name":"Saline 500ml","stock":30,"leadTimeDays":10}},
                "orders": [
                    {{"id":"{o1}","itemId":"{id}","orderedQuantity":20,"status":"received","timestamp":"2025-01-01T00:00:00Z"}},
                    {{"id":"{o2}","itemId":"{id}","orderedQuantity":20,"status":"received","timestamp":"2025-01-11T00:00:00Z"}}
                ]
            }}"#,
            o1 = clinicops_core::OrderId::new(),
            o2 = clinicops_core::OrderId::new(),
        );
        let job: ItemForecastJob = serde_json::from_str(&json).unwrap();
        assert_eq!(job.item_id(), id);
        assert_eq!(job.options, ForecastOptions::default());
        assert!(job.audit_events.is_empty());

        let metrics = job.run().unwrap();
        assert_eq!(metrics.debug.raw_cycle_count, 1);
        assert_eq!(metrics.daily_usage_rate, 2.0);
    }
}
