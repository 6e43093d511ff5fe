//! Inventory items and their stock thresholds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::deserialize_quantity;

/// A stock-keeping item such as espresso beans or oat milk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
    /// Display label only; units are never converted between items
    pub unit: String,
    /// At or below this total the item is critical and raises an alert
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub min_stock: f64,
    /// Capacity used for percentage thresholds; 0 degrades percentages to 0%
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub max_stock: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub unit: String,
    pub min_stock: f64,
    pub max_stock: f64,
}

/// Input for updating an item; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItemInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stock: Option<f64>,
}
