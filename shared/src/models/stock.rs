//! Per-location stock levels

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::{deserialize_quantity, sanitize_quantity};

/// Composite identity of a stock level row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub item_id: Uuid,
    pub location_id: Uuid,
}

impl StockKey {
    pub fn new(item_id: Uuid, location_id: Uuid) -> Self {
        Self {
            item_id,
            location_id,
        }
    }
}

/// Quantity of one item held at one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLevel {
    pub item_id: Uuid,
    pub location_id: Uuid,
    /// Expected to be non-negative but never clamped
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub quantity: f64,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl StockLevel {
    pub fn key(&self) -> StockKey {
        StockKey::new(self.item_id, self.location_id)
    }
}

/// Input for setting the quantity of an item at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStockInput {
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub quantity: f64,
}

/// Stock rows indexed by their composite key.
///
/// Building the table from raw rows applies upsert semantics: when the same
/// `(item_id, location_id)` pair appears more than once, the last row wins.
#[derive(Debug, Clone, Default)]
pub struct StockTable {
    rows: HashMap<StockKey, f64>,
    by_item: HashMap<Uuid, Vec<Uuid>>,
}

impl StockTable {
    pub fn from_levels(levels: &[StockLevel]) -> Self {
        let mut table = StockTable::default();
        for level in levels {
            table.upsert(level.item_id, level.location_id, level.quantity);
        }
        table
    }

    pub fn upsert(&mut self, item_id: Uuid, location_id: Uuid, quantity: f64) {
        let key = StockKey::new(item_id, location_id);
        if self.rows.insert(key, sanitize_quantity(quantity)).is_none() {
            self.by_item.entry(item_id).or_default().push(location_id);
        }
    }

    /// Quantity at one location, `None` when the item is not assigned there
    pub fn quantity(&self, item_id: Uuid, location_id: Uuid) -> Option<f64> {
        self.rows.get(&StockKey::new(item_id, location_id)).copied()
    }

    pub fn is_assigned(&self, item_id: Uuid, location_id: Uuid) -> bool {
        self.rows.contains_key(&StockKey::new(item_id, location_id))
    }

    /// Locations holding a row for the item, in first-seen order
    pub fn locations_of(&self, item_id: Uuid) -> impl Iterator<Item = (Uuid, f64)> + '_ {
        self.by_item
            .get(&item_id)
            .into_iter()
            .flatten()
            .map(move |location_id| {
                let quantity = self.quantity(item_id, *location_id).unwrap_or(0.0);
                (*location_id, quantity)
            })
    }

    /// Sum of the item's quantity across all locations
    pub fn total_stock(&self, item_id: Uuid) -> f64 {
        self.locations_of(item_id).map(|(_, quantity)| quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(item_id: Uuid, location_id: Uuid, quantity: f64) -> StockLevel {
        StockLevel {
            item_id,
            location_id,
            quantity,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_rows_last_write_wins() {
        let item = Uuid::new_v4();
        let location = Uuid::new_v4();
        let table = StockTable::from_levels(&[
            level(item, location, 10.0),
            level(item, location, 4.0),
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.quantity(item, location), Some(4.0));
        assert_eq!(table.total_stock(item), 4.0);
    }

    #[test]
    fn test_non_finite_quantity_counts_as_zero() {
        let item = Uuid::new_v4();
        let table = StockTable::from_levels(&[
            level(item, Uuid::new_v4(), f64::NAN),
            level(item, Uuid::new_v4(), 2.5),
        ]);
        assert_eq!(table.total_stock(item), 2.5);
    }

    #[test]
    fn test_unknown_item_has_zero_stock() {
        let table = StockTable::default();
        assert!(table.is_empty());
        assert_eq!(table.total_stock(Uuid::new_v4()), 0.0);
    }

    #[test]
    fn test_string_quantity_is_parsed() {
        let json = format!(
            r#"{{"item_id":"{}","location_id":"{}","quantity":"12.5"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let row: StockLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(row.quantity, 12.5);
    }
}
