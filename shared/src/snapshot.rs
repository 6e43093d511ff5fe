//! Read-only snapshot of all domain records
//!
//! The analysis engine never reaches into a store; callers hand it the
//! slices of a snapshot. Ingesting a snapshot from JSON is lenient: a record
//! that cannot be interpreted is skipped and counted, never fatal.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    Category, Item, Location, LocationType, StockLevel, StockTable, Supplier, Transaction,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub location_types: Vec<LocationType>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub stock_levels: Vec<StockLevel>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Result of a lenient snapshot load
#[derive(Debug, Clone, Default)]
pub struct SnapshotLoad {
    pub snapshot: InventorySnapshot,
    /// Number of records dropped because they were malformed
    pub skipped: usize,
}

impl InventorySnapshot {
    /// Parse a snapshot document, skipping malformed records
    pub fn from_json_str(json: &str) -> InventoryResult<SnapshotLoad> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| InventoryError::InvalidSnapshot(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> InventoryResult<SnapshotLoad> {
        let Value::Object(mut document) = value else {
            return Err(InventoryError::InvalidSnapshot(
                "snapshot must be a JSON object".to_string(),
            ));
        };

        let mut skipped = 0;
        let mut take = |key: &str| -> InventoryResult<Vec<Value>> {
            match document.remove(key) {
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(Value::Array(values)) => Ok(values),
                Some(_) => Err(InventoryError::InvalidSnapshot(format!(
                    "`{}` must be an array",
                    key
                ))),
            }
        };

        let locations = take("locations")?;
        let location_types = take("location_types")?;
        let categories = take("categories")?;
        let suppliers = take("suppliers")?;
        let items = take("items")?;
        let stock_levels = take("stock_levels")?;
        let transactions = take("transactions")?;

        let snapshot = InventorySnapshot {
            locations: collect_lenient("location", locations, &mut skipped),
            location_types: collect_lenient("location type", location_types, &mut skipped),
            categories: collect_lenient("category", categories, &mut skipped),
            suppliers: collect_lenient("supplier", suppliers, &mut skipped),
            items: collect_lenient("item", items, &mut skipped),
            stock_levels: collect_lenient("stock level", stock_levels, &mut skipped),
            transactions: collect_lenient("transaction", transactions, &mut skipped),
        };

        Ok(SnapshotLoad { snapshot, skipped })
    }

    /// Index the stock rows by `(item_id, location_id)`
    pub fn stock_table(&self) -> StockTable {
        StockTable::from_levels(&self.stock_levels)
    }
}

/// Parse a bare transaction array, skipping malformed entries
pub fn parse_transactions(json: &str) -> InventoryResult<(Vec<Transaction>, usize)> {
    let values: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| InventoryError::InvalidSnapshot(e.to_string()))?;
    let mut skipped = 0;
    let transactions = collect_lenient("transaction", values, &mut skipped);
    Ok((transactions, skipped))
}

fn collect_lenient<T: DeserializeOwned>(
    kind: &str,
    values: Vec<Value>,
    skipped: &mut usize,
) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(kind, index, error = %e, "Skipping malformed record");
                *skipped += 1;
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_malformed_records_are_skipped() {
        let item_id = Uuid::new_v4();
        let location_id = Uuid::new_v4();
        let doc = json!({
            "items": [
                { "id": item_id, "name": "Espresso Beans", "unit": "kg", "min_stock": 5, "max_stock": 20 },
                { "name": "No id" }
            ],
            "stock_levels": [
                { "item_id": item_id, "location_id": location_id, "quantity": "3" }
            ],
            "transactions": [
                {
                    "id": Uuid::new_v4(),
                    "type": "STOCK_UPDATED",
                    "timestamp": "2024-05-01T10:00:00Z",
                    "details": { "itemId": item_id, "quantityChange": 3 }
                },
                {
                    "id": Uuid::new_v4(),
                    "type": "STOCK_UPDATED",
                    "timestamp": "2024-05-01T10:00:00Z"
                },
                {
                    "id": Uuid::new_v4(),
                    "type": "STOCK_TELEPORTED",
                    "timestamp": "2024-05-01T10:00:00Z",
                    "details": {}
                }
            ]
        });

        let load = InventorySnapshot::from_value(doc).unwrap();
        assert_eq!(load.skipped, 3);
        assert_eq!(load.snapshot.items.len(), 1);
        assert_eq!(load.snapshot.transactions.len(), 1);
        assert_eq!(load.snapshot.stock_table().total_stock(item_id), 3.0);
        assert!(load.snapshot.locations.is_empty());
    }

    #[test]
    fn test_non_object_snapshot_is_rejected() {
        assert!(InventorySnapshot::from_json_str("[]").is_err());
        assert!(InventorySnapshot::from_json_str(r#"{"items": 3}"#).is_err());
        assert!(InventorySnapshot::from_json_str("not json").is_err());
    }

    #[test]
    fn test_parse_transactions_counts_skipped() {
        let json = json!([
            { "id": Uuid::new_v4(), "type": "ITEM_DELETED", "timestamp": "2024-05-01T10:00:00Z",
              "details": { "itemId": Uuid::new_v4(), "itemName": "Cups" } },
            { "id": "not-a-uuid", "type": "ITEM_DELETED", "timestamp": "2024-05-01T10:00:00Z" }
        ])
        .to_string();

        let (transactions, skipped) = parse_transactions(&json).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(skipped, 1);
    }
}
