//! Health scores per location and per category

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregation::StockAggregator;
use super::status::{classify_stock, StockStatus};
use crate::format::percentage;
use crate::models::{Category, Item, StockTable};

/// Share of healthy items among those assigned to a location, in percent.
///
/// An item is assigned when it has a stock row at the location. Health is
/// judged on the item's total stock across all locations. A location with
/// nothing assigned scores 100.
pub fn location_health_score(location_id: Uuid, items: &[Item], table: &StockTable) -> f64 {
    let (assigned, healthy) = assigned_and_healthy(location_id, items, table);
    health_score(assigned, healthy)
}

fn health_score(assigned: usize, healthy: usize) -> f64 {
    if assigned == 0 {
        100.0
    } else {
        healthy as f64 / assigned as f64 * 100.0
    }
}

fn assigned_and_healthy(location_id: Uuid, items: &[Item], table: &StockTable) -> (usize, usize) {
    items
        .iter()
        .filter(|item| table.is_assigned(item.id, location_id))
        .fold((0, 0), |(assigned, healthy), item| {
            let status = classify_stock(table.total_stock(item.id), item.min_stock, item.max_stock);
            (assigned + 1, healthy + usize::from(status.is_healthy()))
        })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationHealth {
    pub location_id: Uuid,
    pub location_name: String,
    pub location_type: String,
    pub assigned_items: usize,
    pub healthy_items: usize,
    pub health_score: f64,
}

/// Health of every location, in location order
pub fn location_health(aggregator: &StockAggregator<'_>) -> Vec<LocationHealth> {
    aggregator
        .locations()
        .iter()
        .map(|location| {
            let (assigned_items, healthy_items) =
                assigned_and_healthy(location.id, aggregator.items(), aggregator.table());
            LocationHealth {
                location_id: location.id,
                location_name: location.name.clone(),
                location_type: location.location_type.clone(),
                assigned_items,
                healthy_items,
                health_score: health_score(assigned_items, healthy_items),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Empty,
    Critical,
    Warning,
    Healthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHealth {
    /// `None` for the bucket of uncategorized items
    pub category_id: Option<Uuid>,
    pub category_name: String,
    pub total_items: usize,
    pub out_of_stock_items: usize,
    /// Critical and low
    pub low_stock_items: usize,
    /// Good and high
    pub healthy_items: usize,
    pub out_of_stock_percentage: f64,
    pub low_stock_percentage: f64,
    pub healthy_percentage: f64,
    pub category_status: CategoryStatus,
}

impl CategoryHealth {
    fn tally(category_id: Option<Uuid>, category_name: String, statuses: &[StockStatus]) -> Self {
        let total_items = statuses.len();
        let count = |pred: fn(&StockStatus) -> bool| statuses.iter().filter(|s| pred(s)).count();
        let out_of_stock_items = count(|s| *s == StockStatus::Out);
        let low_stock_items = count(|s| matches!(s, StockStatus::Critical | StockStatus::Low));
        let healthy_items = count(StockStatus::is_healthy);

        let category_status = if total_items == 0 {
            CategoryStatus::Empty
        } else if out_of_stock_items > 0 {
            CategoryStatus::Critical
        } else if low_stock_items > 0 {
            CategoryStatus::Warning
        } else {
            CategoryStatus::Healthy
        };

        let total = total_items as f64;
        Self {
            category_id,
            category_name,
            total_items,
            out_of_stock_items,
            low_stock_items,
            healthy_items,
            out_of_stock_percentage: percentage(out_of_stock_items as f64, total),
            low_stock_percentage: percentage(low_stock_items as f64, total),
            healthy_percentage: percentage(healthy_items as f64, total),
            category_status,
        }
    }
}

/// Stock health of each category, in category order.
///
/// Items without a known category are gathered under "Uncategorized", listed
/// last and only when there are any.
pub fn category_health(aggregator: &StockAggregator<'_>, categories: &[Category]) -> Vec<CategoryHealth> {
    let statuses_where = |pred: &dyn Fn(&Item) -> bool| -> Vec<StockStatus> {
        aggregator
            .items()
            .iter()
            .filter(|item| pred(item))
            .map(|item| aggregator.status_of(item))
            .collect()
    };

    let mut health: Vec<CategoryHealth> = categories
        .iter()
        .map(|category| {
            let statuses = statuses_where(&|item| item.category_id == Some(category.id));
            CategoryHealth::tally(Some(category.id), category.name.clone(), &statuses)
        })
        .collect();

    let uncategorized = statuses_where(&|item| {
        item.category_id
            .map_or(true, |id| !categories.iter().any(|c| c.id == id))
    });
    if !uncategorized.is_empty() {
        health.push(CategoryHealth::tally(
            None,
            "Uncategorized".to_string(),
            &uncategorized,
        ));
    }
    health
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, StockLevel};
    use chrono::Utc;

    fn item(category_id: Option<Uuid>, min_stock: f64, max_stock: f64) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: "Item".to_string(),
            category_id,
            supplier_id: None,
            unit: "kg".to_string(),
            min_stock,
            max_stock,
            created_at: Utc::now(),
        }
    }

    fn level(item: &Item, location_id: Uuid, quantity: f64) -> StockLevel {
        StockLevel {
            item_id: item.id,
            location_id,
            quantity,
            last_updated: Utc::now(),
        }
    }

    fn location(name: &str) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: None,
            location_type: "storage".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_location_is_fully_healthy() {
        let items = vec![item(None, 1.0, 10.0)];
        assert_eq!(location_health_score(Uuid::new_v4(), &items, &StockTable::default()), 100.0);
    }

    #[test]
    fn test_health_uses_total_stock() {
        let shop = Uuid::new_v4();
        let back = Uuid::new_v4();
        let good = item(None, 1.0, 10.0);
        let out = item(None, 1.0, 10.0);
        // zero here, but five more in the back room
        let levels = vec![
            level(&good, shop, 0.0),
            level(&good, back, 5.0),
            level(&out, shop, 0.0),
        ];
        let table = StockTable::from_levels(&levels);
        let items = vec![good, out];

        assert_eq!(location_health_score(shop, &items, &table), 50.0);
        assert_eq!(location_health_score(back, &items, &table), 100.0);
    }

    #[test]
    fn test_location_health_list() {
        let shop = location("Main Shop");
        let idle = location("Warehouse");
        let low = item(None, 1.0, 100.0);
        let levels = vec![level(&low, shop.id, 10.0)];
        let items = vec![low];
        let locations = vec![shop, idle];

        let aggregator = StockAggregator::new(&items, &locations, &levels);
        let health = location_health(&aggregator);
        assert_eq!(health[0].assigned_items, 1);
        assert_eq!(health[0].health_score, 0.0);
        assert_eq!(health[1].assigned_items, 0);
        assert_eq!(health[1].health_score, 100.0);
    }

    #[test]
    fn test_location_health_score_matches_counts() {
        let shop = location("Main Shop");
        let good = item(None, 1.0, 10.0);
        let low = item(None, 1.0, 100.0);
        let out = item(None, 1.0, 10.0);
        let levels = vec![
            level(&good, shop.id, 5.0),
            level(&low, shop.id, 10.0),
            level(&out, shop.id, 0.0),
        ];
        let items = vec![good, low, out];
        let locations = vec![shop];

        let aggregator = StockAggregator::new(&items, &locations, &levels);
        let health = location_health(&aggregator);
        assert_eq!(health[0].assigned_items, 3);
        assert_eq!(health[0].healthy_items, 1);
        assert_eq!(
            health[0].health_score,
            location_health_score(locations[0].id, &items, aggregator.table())
        );
        assert!((health[0].health_score - 33.33).abs() < 0.01);
    }

    #[test]
    fn test_category_status_rules() {
        let beans = Category {
            id: Uuid::new_v4(),
            name: "Beans".to_string(),
            description: None,
        };
        let dairy = Category {
            id: Uuid::new_v4(),
            name: "Dairy".to_string(),
            description: None,
        };
        let empty = Category {
            id: Uuid::new_v4(),
            name: "Pastries".to_string(),
            description: None,
        };
        let shop = Uuid::new_v4();

        let out_beans = item(Some(beans.id), 1.0, 10.0);
        let good_beans = item(Some(beans.id), 1.0, 10.0);
        let low_milk = item(Some(dairy.id), 1.0, 10.0);
        let loose = item(None, 1.0, 10.0);
        let levels = vec![
            level(&good_beans, shop, 5.0),
            level(&low_milk, shop, 2.0),
            level(&loose, shop, 5.0),
        ];
        let items = vec![out_beans, good_beans, low_milk, loose];
        let categories = vec![beans, dairy, empty];

        let aggregator = StockAggregator::new(&items, &[], &levels);
        let health = category_health(&aggregator, &categories);

        assert_eq!(health.len(), 4);
        assert_eq!(health[0].category_status, CategoryStatus::Critical);
        assert_eq!(health[0].out_of_stock_percentage, 50.0);
        assert_eq!(health[1].category_status, CategoryStatus::Warning);
        assert_eq!(health[1].low_stock_items, 1);
        assert_eq!(health[2].category_status, CategoryStatus::Empty);
        assert_eq!(health[2].healthy_percentage, 0.0);
        assert_eq!(health[3].category_name, "Uncategorized");
        assert_eq!(health[3].category_status, CategoryStatus::Healthy);
    }
}
