//! Shop locations and the location type registry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A place where stock is kept (shop floor, back room, roastery...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Name of a [`LocationType`]; the set is open-ended
    #[serde(rename = "type", default = "default_location_type")]
    pub location_type: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_location_type() -> String {
    "retail".to_string()
}

/// Input for creating a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocationInput {
    pub name: String,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub location_type: Option<String>,
}

/// Input for updating a location; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLocationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
}

/// Entry in the location type registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationType {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Built-in types cannot be deleted
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_icon() -> String {
    "map-pin".to_string()
}

impl LocationType {
    /// The built-in types every registry starts with
    pub fn defaults(now: DateTime<Utc>) -> Vec<LocationType> {
        [
            ("retail", "Customer-facing shop floor", "green", "store"),
            ("storage", "Back room or warehouse", "blue", "package"),
            ("production", "Roastery or prep kitchen", "purple", "coffee"),
        ]
        .into_iter()
        .map(|(name, description, color, icon)| LocationType {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(description.to_string()),
            color: color.to_string(),
            icon: icon.to_string(),
            is_default: true,
            created_at: now,
            updated_at: now,
        })
        .collect()
    }
}

/// Input for creating or replacing a location type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationTypeInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}
