//! Which items are stocked at a location

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Category, Item, Location, StockTable};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAssignment {
    pub category_id: Uuid,
    pub category_name: String,
    pub assigned_items: Vec<Item>,
    pub unassigned_items: Vec<Item>,
}

impl CategoryAssignment {
    pub fn total_items(&self) -> usize {
        self.assigned_items.len() + self.unassigned_items.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationAssignment {
    pub location: Location,
    pub assigned_items: Vec<Item>,
    pub unassigned_items: Vec<Item>,
    /// Categories with at least one item, in category order
    pub items_by_category: Vec<CategoryAssignment>,
    pub total_assigned: usize,
    pub total_unassigned: usize,
}

/// Split the catalog into items stocked at `location` and the rest
pub fn location_assignment(
    location: &Location,
    items: &[Item],
    categories: &[Category],
    table: &StockTable,
) -> LocationAssignment {
    let (assigned_items, unassigned_items): (Vec<Item>, Vec<Item>) = items
        .iter()
        .cloned()
        .partition(|item| table.is_assigned(item.id, location.id));

    let in_category = |list: &[Item], category_id: Uuid| -> Vec<Item> {
        list.iter()
            .filter(|item| item.category_id == Some(category_id))
            .cloned()
            .collect()
    };

    let items_by_category = categories
        .iter()
        .map(|category| CategoryAssignment {
            category_id: category.id,
            category_name: category.name.clone(),
            assigned_items: in_category(&assigned_items, category.id),
            unassigned_items: in_category(&unassigned_items, category.id),
        })
        .filter(|group| group.total_items() > 0)
        .collect();

    LocationAssignment {
        location: location.clone(),
        total_assigned: assigned_items.len(),
        total_unassigned: unassigned_items.len(),
        assigned_items,
        unassigned_items,
        items_by_category,
    }
}

/// Items assigned at `source` but not yet at `target`
pub fn items_to_copy(source: Uuid, target: Uuid, items: &[Item], table: &StockTable) -> Vec<Uuid> {
    items
        .iter()
        .filter(|item| table.is_assigned(item.id, source) && !table.is_assigned(item.id, target))
        .map(|item| item.id)
        .collect()
}
