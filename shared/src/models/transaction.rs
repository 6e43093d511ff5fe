//! Audit log transactions
//!
//! Every domain mutation is followed by an append-only transaction describing
//! it. On the wire a transaction is a flat record with a `type` tag and a
//! loosely structured `details` object; in memory the details are a typed
//! payload per transaction type so consumers match on them exhaustively.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::InventoryError;
use crate::format::{deserialize_quantity, format_quantity};

/// Closed set of transaction types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    LocationAdded,
    LocationUpdated,
    LocationDeleted,
    CategoryAdded,
    CategoryUpdated,
    CategoryDeleted,
    SupplierAdded,
    SupplierUpdated,
    SupplierDeleted,
    ItemAdded,
    ItemUpdated,
    ItemDeleted,
    StockUpdated,
}

impl TransactionType {
    pub const ALL: [TransactionType; 13] = [
        TransactionType::LocationAdded,
        TransactionType::LocationUpdated,
        TransactionType::LocationDeleted,
        TransactionType::CategoryAdded,
        TransactionType::CategoryUpdated,
        TransactionType::CategoryDeleted,
        TransactionType::SupplierAdded,
        TransactionType::SupplierUpdated,
        TransactionType::SupplierDeleted,
        TransactionType::ItemAdded,
        TransactionType::ItemUpdated,
        TransactionType::ItemDeleted,
        TransactionType::StockUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::LocationAdded => "LOCATION_ADDED",
            TransactionType::LocationUpdated => "LOCATION_UPDATED",
            TransactionType::LocationDeleted => "LOCATION_DELETED",
            TransactionType::CategoryAdded => "CATEGORY_ADDED",
            TransactionType::CategoryUpdated => "CATEGORY_UPDATED",
            TransactionType::CategoryDeleted => "CATEGORY_DELETED",
            TransactionType::SupplierAdded => "SUPPLIER_ADDED",
            TransactionType::SupplierUpdated => "SUPPLIER_UPDATED",
            TransactionType::SupplierDeleted => "SUPPLIER_DELETED",
            TransactionType::ItemAdded => "ITEM_ADDED",
            TransactionType::ItemUpdated => "ITEM_UPDATED",
            TransactionType::ItemDeleted => "ITEM_DELETED",
            TransactionType::StockUpdated => "STOCK_UPDATED",
        }
    }

    /// Human readable label used in the transaction log and its export
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::LocationAdded => "Location Added",
            TransactionType::LocationUpdated => "Location Updated",
            TransactionType::LocationDeleted => "Location Deleted",
            TransactionType::CategoryAdded => "Category Added",
            TransactionType::CategoryUpdated => "Category Updated",
            TransactionType::CategoryDeleted => "Category Deleted",
            TransactionType::SupplierAdded => "Supplier Added",
            TransactionType::SupplierUpdated => "Supplier Updated",
            TransactionType::SupplierDeleted => "Supplier Deleted",
            TransactionType::ItemAdded => "Item Added",
            TransactionType::ItemUpdated => "Item Updated",
            TransactionType::ItemDeleted => "Item Deleted",
            TransactionType::StockUpdated => "Stock Updated",
        }
    }
}

impl FromStr for TransactionType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InventoryError::UnknownTransactionType(s.to_string()))
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn unknown_item() -> String {
    "Unknown Item".to_string()
}

fn unknown_location() -> String {
    "Unknown Location".to_string()
}

fn unknown_category() -> String {
    "Unknown Category".to_string()
}

fn unknown_supplier() -> String {
    "Unknown Supplier".to_string()
}

fn default_unit() -> String {
    "unit".to_string()
}

/// Details of a location event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetails {
    pub location_id: Uuid,
    #[serde(default = "unknown_location")]
    pub location_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub changes: Value,
}

/// Details of a category event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    pub category_id: Uuid,
    #[serde(default = "unknown_category")]
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub changes: Value,
}

/// Details of a supplier event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDetails {
    pub supplier_id: Uuid,
    #[serde(default = "unknown_supplier")]
    pub supplier_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub changes: Value,
}

/// Details of an item event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub item_id: Uuid,
    #[serde(default = "unknown_item")]
    pub item_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub changes: Value,
}

/// Direction of a stock movement, derived from the sign of the change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    StockIn,
    StockOut,
    StockAdjustment,
}

impl MovementKind {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            MovementKind::StockIn
        } else if change < 0.0 {
            MovementKind::StockOut
        } else {
            MovementKind::StockAdjustment
        }
    }
}

/// Details of a `STOCK_UPDATED` transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub item_id: Uuid,
    #[serde(default = "unknown_item")]
    pub item_name: String,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default = "unknown_location")]
    pub location_name: String,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub previous_quantity: f64,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub new_quantity: f64,
    /// Positive for a restock, negative for consumption
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub quantity_change: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<MovementKind>,
}

impl StockMovement {
    pub fn new(
        item_id: Uuid,
        item_name: impl Into<String>,
        location_id: Uuid,
        location_name: impl Into<String>,
        previous_quantity: f64,
        new_quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        let quantity_change = new_quantity - previous_quantity;
        Self {
            item_id,
            item_name: item_name.into(),
            location_id: Some(location_id),
            location_name: location_name.into(),
            previous_quantity,
            new_quantity,
            quantity_change,
            unit: unit.into(),
            movement: Some(MovementKind::from_change(quantity_change)),
        }
    }

    /// Recorded movement kind, or the one implied by the change
    pub fn kind(&self) -> MovementKind {
        self.movement
            .unwrap_or_else(|| MovementKind::from_change(self.quantity_change))
    }
}

/// Typed payload of a transaction, one variant per transaction type
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEvent {
    LocationAdded(LocationDetails),
    LocationUpdated(LocationDetails),
    LocationDeleted(LocationDetails),
    CategoryAdded(CategoryDetails),
    CategoryUpdated(CategoryDetails),
    CategoryDeleted(CategoryDetails),
    SupplierAdded(SupplierDetails),
    SupplierUpdated(SupplierDetails),
    SupplierDeleted(SupplierDetails),
    ItemAdded(ItemDetails),
    ItemUpdated(ItemDetails),
    ItemDeleted(ItemDetails),
    StockUpdated(StockMovement),
}

impl TransactionEvent {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionEvent::LocationAdded(_) => TransactionType::LocationAdded,
            TransactionEvent::LocationUpdated(_) => TransactionType::LocationUpdated,
            TransactionEvent::LocationDeleted(_) => TransactionType::LocationDeleted,
            TransactionEvent::CategoryAdded(_) => TransactionType::CategoryAdded,
            TransactionEvent::CategoryUpdated(_) => TransactionType::CategoryUpdated,
            TransactionEvent::CategoryDeleted(_) => TransactionType::CategoryDeleted,
            TransactionEvent::SupplierAdded(_) => TransactionType::SupplierAdded,
            TransactionEvent::SupplierUpdated(_) => TransactionType::SupplierUpdated,
            TransactionEvent::SupplierDeleted(_) => TransactionType::SupplierDeleted,
            TransactionEvent::ItemAdded(_) => TransactionType::ItemAdded,
            TransactionEvent::ItemUpdated(_) => TransactionType::ItemUpdated,
            TransactionEvent::ItemDeleted(_) => TransactionType::ItemDeleted,
            TransactionEvent::StockUpdated(_) => TransactionType::StockUpdated,
        }
    }

    /// Rebuild a typed event from its wire tag and details object
    pub fn from_parts(
        transaction_type: TransactionType,
        details: Value,
    ) -> Result<Self, serde_json::Error> {
        use serde_json::from_value;

        Ok(match transaction_type {
            TransactionType::LocationAdded => TransactionEvent::LocationAdded(from_value(details)?),
            TransactionType::LocationUpdated => {
                TransactionEvent::LocationUpdated(from_value(details)?)
            }
            TransactionType::LocationDeleted => {
                TransactionEvent::LocationDeleted(from_value(details)?)
            }
            TransactionType::CategoryAdded => TransactionEvent::CategoryAdded(from_value(details)?),
            TransactionType::CategoryUpdated => {
                TransactionEvent::CategoryUpdated(from_value(details)?)
            }
            TransactionType::CategoryDeleted => {
                TransactionEvent::CategoryDeleted(from_value(details)?)
            }
            TransactionType::SupplierAdded => TransactionEvent::SupplierAdded(from_value(details)?),
            TransactionType::SupplierUpdated => {
                TransactionEvent::SupplierUpdated(from_value(details)?)
            }
            TransactionType::SupplierDeleted => {
                TransactionEvent::SupplierDeleted(from_value(details)?)
            }
            TransactionType::ItemAdded => TransactionEvent::ItemAdded(from_value(details)?),
            TransactionType::ItemUpdated => TransactionEvent::ItemUpdated(from_value(details)?),
            TransactionType::ItemDeleted => TransactionEvent::ItemDeleted(from_value(details)?),
            TransactionType::StockUpdated => TransactionEvent::StockUpdated(from_value(details)?),
        })
    }

    /// Wire representation of the details payload
    pub fn details(&self) -> Value {
        let serialized = match self {
            TransactionEvent::LocationAdded(d)
            | TransactionEvent::LocationUpdated(d)
            | TransactionEvent::LocationDeleted(d) => serde_json::to_value(d),
            TransactionEvent::CategoryAdded(d)
            | TransactionEvent::CategoryUpdated(d)
            | TransactionEvent::CategoryDeleted(d) => serde_json::to_value(d),
            TransactionEvent::SupplierAdded(d)
            | TransactionEvent::SupplierUpdated(d)
            | TransactionEvent::SupplierDeleted(d) => serde_json::to_value(d),
            TransactionEvent::ItemAdded(d)
            | TransactionEvent::ItemUpdated(d)
            | TransactionEvent::ItemDeleted(d) => serde_json::to_value(d),
            TransactionEvent::StockUpdated(d) => serde_json::to_value(d),
        };
        serialized.unwrap_or(Value::Null)
    }

    pub fn stock_movement(&self) -> Option<&StockMovement> {
        match self {
            TransactionEvent::StockUpdated(movement) => Some(movement),
            _ => None,
        }
    }

    /// One-line description shown in the transaction log
    pub fn description(&self) -> String {
        match self {
            TransactionEvent::LocationAdded(d) => format!(
                "Added location \"{}\" ({})",
                d.location_name,
                d.location_type.as_deref().unwrap_or("unknown type")
            ),
            TransactionEvent::LocationUpdated(d) => {
                format!("Updated location \"{}\"", d.location_name)
            }
            TransactionEvent::LocationDeleted(d) => {
                format!("Deleted location \"{}\"", d.location_name)
            }
            TransactionEvent::CategoryAdded(d) => format!("Added category \"{}\"", d.category_name),
            TransactionEvent::CategoryUpdated(d) => {
                format!("Updated category \"{}\"", d.category_name)
            }
            TransactionEvent::CategoryDeleted(d) => {
                format!("Deleted category \"{}\"", d.category_name)
            }
            TransactionEvent::SupplierAdded(d) => format!("Added supplier \"{}\"", d.supplier_name),
            TransactionEvent::SupplierUpdated(d) => {
                format!("Updated supplier \"{}\"", d.supplier_name)
            }
            TransactionEvent::SupplierDeleted(d) => {
                format!("Deleted supplier \"{}\"", d.supplier_name)
            }
            TransactionEvent::ItemAdded(d) => format!(
                "Added item \"{}\" ({})",
                d.item_name,
                d.category_name.as_deref().unwrap_or("Unknown Category")
            ),
            TransactionEvent::ItemUpdated(d) => format!("Updated item \"{}\"", d.item_name),
            TransactionEvent::ItemDeleted(d) => format!("Deleted item \"{}\"", d.item_name),
            TransactionEvent::StockUpdated(m) => {
                let change = m.quantity_change;
                let (verb, amount) = match m.kind() {
                    MovementKind::StockIn => ("increased", format!("+{}", format_quantity(change))),
                    MovementKind::StockOut => ("decreased", format_quantity(change)),
                    MovementKind::StockAdjustment => ("adjusted", format_quantity(change)),
                };
                format!(
                    "{} stock {} by {} {} at {}",
                    m.item_name, verb, amount, m.unit, m.location_name
                )
            }
        }
    }
}

fn default_user_name() -> String {
    "System".to_string()
}

/// Flat wire shape of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: Value,
    #[serde(default = "default_user_name")]
    pub user_name: String,
}

/// An audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TransactionRecord", try_from = "TransactionRecord")]
pub struct Transaction {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: TransactionEvent,
    pub user_name: String,
}

impl Transaction {
    pub fn new(event: TransactionEvent, user_name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            event,
            user_name: user_name.into(),
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.event.transaction_type()
    }

    pub fn description(&self) -> String {
        self.event.description()
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = InventoryError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let event = TransactionEvent::from_parts(record.transaction_type, record.details)
            .map_err(|e| {
                InventoryError::MalformedRecord(format!(
                    "{} transaction {}: {}",
                    record.transaction_type, record.id, e
                ))
            })?;

        Ok(Transaction {
            id: record.id,
            timestamp: record.timestamp,
            event,
            user_name: record.user_name,
        })
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(transaction: Transaction) -> Self {
        TransactionRecord {
            id: transaction.id,
            transaction_type: transaction.event.transaction_type(),
            timestamp: transaction.timestamp,
            details: transaction.event.details(),
            user_name: transaction.user_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stock_movement_derives_kind() {
        let movement = StockMovement::new(
            Uuid::new_v4(),
            "Espresso Beans",
            Uuid::new_v4(),
            "Main Shop",
            10.0,
            4.0,
            "kg",
        );
        assert_eq!(movement.quantity_change, -6.0);
        assert_eq!(movement.kind(), MovementKind::StockOut);
    }

    #[test]
    fn test_wire_format_uses_type_and_details() {
        let item_id = Uuid::new_v4();
        let location_id = Uuid::new_v4();
        let tx = Transaction::new(
            TransactionEvent::StockUpdated(StockMovement::new(
                item_id,
                "Oat Milk",
                location_id,
                "Main Shop",
                2.0,
                7.0,
                "liter",
            )),
            "System",
            Utc::now(),
        );

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "STOCK_UPDATED");
        assert_eq!(value["details"]["itemId"], json!(item_id));
        assert_eq!(value["details"]["quantityChange"], json!(5.0));
        assert_eq!(value["details"]["type"], "STOCK_IN");
        assert_eq!(value["user_name"], "System");

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_missing_item_id_is_malformed() {
        let value = json!({
            "id": Uuid::new_v4(),
            "type": "STOCK_UPDATED",
            "timestamp": "2024-05-01T10:00:00Z",
            "details": { "itemName": "Mystery", "quantityChange": 3 },
            "user_name": "System"
        });
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn test_loose_details_get_defaults() {
        let value = json!({
            "id": Uuid::new_v4(),
            "type": "STOCK_UPDATED",
            "timestamp": "2024-05-01T10:00:00Z",
            "details": { "itemId": Uuid::new_v4(), "quantityChange": "-2.5" }
        });
        let tx: Transaction = serde_json::from_value(value).unwrap();
        let movement = tx.event.stock_movement().unwrap();
        assert_eq!(movement.item_name, "Unknown Item");
        assert_eq!(movement.location_name, "Unknown Location");
        assert_eq!(movement.unit, "unit");
        assert_eq!(movement.quantity_change, -2.5);
        assert_eq!(movement.kind(), MovementKind::StockOut);
        assert_eq!(tx.user_name, "System");
    }

    #[test]
    fn test_stock_descriptions() {
        let movement = |prev: f64, new: f64| {
            TransactionEvent::StockUpdated(StockMovement::new(
                Uuid::new_v4(),
                "Espresso Beans",
                Uuid::new_v4(),
                "Main Shop",
                prev,
                new,
                "kg",
            ))
        };

        assert_eq!(
            movement(0.0, 5.0).description(),
            "Espresso Beans stock increased by +5 kg at Main Shop"
        );
        assert_eq!(
            movement(5.0, 2.5).description(),
            "Espresso Beans stock decreased by -2.50 kg at Main Shop"
        );
        assert_eq!(
            movement(3.0, 3.0).description(),
            "Espresso Beans stock adjusted by 0 kg at Main Shop"
        );
    }

    #[test]
    fn test_transaction_type_parse_and_label() {
        assert_eq!(
            "stock_updated".parse::<TransactionType>().unwrap(),
            TransactionType::StockUpdated
        );
        assert!("STOCK_MOVED".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::ItemDeleted.label(), "Item Deleted");
    }
}
