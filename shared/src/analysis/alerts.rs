//! Low stock alerts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregation::{LocationStock, StockAggregator};
use crate::format::sanitize_quantity;
use crate::models::{Item, StockLevel, StockTable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Nothing left anywhere
    Critical,
    Warning,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    /// `<item id>-low`
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub item_id: Uuid,
    pub item_name: String,
    pub current_stock: f64,
    pub min_stock: f64,
    pub severity: AlertSeverity,
}

impl StockAlert {
    fn low(item: &Item, current_stock: f64, min_stock: f64) -> Self {
        Self {
            id: format!("{}-low", item.id),
            alert_type: AlertType::Low,
            item_id: item.id,
            item_name: item.name.clone(),
            current_stock,
            min_stock,
            severity: if current_stock == 0.0 {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            },
        }
    }
}

/// One alert per item whose total stock is at or under its minimum
pub fn generate_alerts(items: &[Item], levels: &[StockLevel]) -> Vec<StockAlert> {
    alerts_from_table(items, &StockTable::from_levels(levels))
}

pub fn alerts_from_table(items: &[Item], table: &StockTable) -> Vec<StockAlert> {
    items
        .iter()
        .filter_map(|item| {
            let current_stock = table.total_stock(item.id);
            let min_stock = sanitize_quantity(item.min_stock);
            (current_stock <= min_stock).then(|| StockAlert::low(item, current_stock, min_stock))
        })
        .collect()
}

/// An alert with the locations still holding the item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertDetail {
    #[serde(flatten)]
    pub alert: StockAlert,
    pub unit: String,
    pub locations: Vec<LocationStock>,
}

/// Alerts split by severity for the alerts page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertBoard {
    pub critical: Vec<AlertDetail>,
    pub warning: Vec<AlertDetail>,
}

impl AlertBoard {
    pub fn build(aggregator: &StockAggregator<'_>) -> Self {
        let mut board = AlertBoard::default();
        for alert in alerts_from_table(aggregator.items(), aggregator.table()) {
            let unit = aggregator
                .items()
                .iter()
                .find(|item| item.id == alert.item_id)
                .map(|item| item.unit.clone())
                .unwrap_or_default();
            let detail = AlertDetail {
                locations: aggregator.location_breakdown(alert.item_id),
                unit,
                alert,
            };
            match detail.alert.severity {
                AlertSeverity::Critical => board.critical.push(detail),
                AlertSeverity::Warning => board.warning.push(detail),
            }
        }
        board
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.warning.len()
    }
}
