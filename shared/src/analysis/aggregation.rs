//! Stock aggregation: per-item totals, per-location breakdowns and the
//! dashboard statistics built from them

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alerts::alerts_from_table;
use super::status::{classify_stock, fill_percentage, stock_percentage, StockStatus};
use crate::models::{Item, Location, StockLevel, StockTable};
use crate::snapshot::InventorySnapshot;

/// Stock held at one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationStock {
    pub location_id: Uuid,
    pub location_name: String,
    pub stock: f64,
}

/// An item with its derived stock figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemStockView {
    #[serde(flatten)]
    pub item: Item,
    pub total_stock: f64,
    pub stock_percentage: f64,
    /// Stock percentage clamped to 100
    pub fill_percentage: f64,
    pub stock_status: StockStatus,
    pub urgency: u8,
    /// Locations holding a positive quantity
    pub location_stocks: Vec<LocationStock>,
}

/// Headline counts for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_items: usize,
    pub total_locations: usize,
    pub out_of_stock: usize,
    pub critical_stock: usize,
    pub low_stock: usize,
    pub high_stock: usize,
    pub good_stock: usize,
    pub total_alerts: usize,
}

impl DashboardStats {
    pub fn count(&self, status: StockStatus) -> usize {
        match status {
            StockStatus::Out => self.out_of_stock,
            StockStatus::Critical => self.critical_stock,
            StockStatus::Low => self.low_stock,
            StockStatus::High => self.high_stock,
            StockStatus::Good => self.good_stock,
        }
    }

    fn record(&mut self, status: StockStatus) {
        match status {
            StockStatus::Out => self.out_of_stock += 1,
            StockStatus::Critical => self.critical_stock += 1,
            StockStatus::Low => self.low_stock += 1,
            StockStatus::High => self.high_stock += 1,
            StockStatus::Good => self.good_stock += 1,
        }
    }
}

/// Dashboard view model: all items most urgent first, plus derived lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub items: Vec<ItemStockView>,
    pub stats: DashboardStats,
    /// Out of stock or critical
    pub critical_items: Vec<ItemStockView>,
    /// Low stock or worse
    pub needs_attention: Vec<ItemStockView>,
    pub well_stocked: Vec<ItemStockView>,
}

/// Aggregates stock rows over a snapshot's items and locations
#[derive(Debug, Clone)]
pub struct StockAggregator<'a> {
    items: &'a [Item],
    locations: &'a [Location],
    table: StockTable,
}

impl<'a> StockAggregator<'a> {
    pub fn new(items: &'a [Item], locations: &'a [Location], levels: &[StockLevel]) -> Self {
        Self::with_table(items, locations, StockTable::from_levels(levels))
    }

    pub fn with_table(items: &'a [Item], locations: &'a [Location], table: StockTable) -> Self {
        Self {
            items,
            locations,
            table,
        }
    }

    pub fn from_snapshot(snapshot: &'a InventorySnapshot) -> Self {
        Self::new(&snapshot.items, &snapshot.locations, &snapshot.stock_levels)
    }

    pub fn table(&self) -> &StockTable {
        &self.table
    }

    pub fn items(&self) -> &'a [Item] {
        self.items
    }

    pub fn locations(&self) -> &'a [Location] {
        self.locations
    }

    pub fn total_stock(&self, item_id: Uuid) -> f64 {
        self.table.total_stock(item_id)
    }

    /// Positive stock per location, in location order.
    ///
    /// Rows pointing at a location missing from the snapshot are listed last
    /// as "Unknown Location" so the breakdown still adds up to the total.
    pub fn location_breakdown(&self, item_id: Uuid) -> Vec<LocationStock> {
        let mut rows: Vec<(Uuid, f64)> = self.table.locations_of(item_id).collect();
        let mut breakdown = Vec::with_capacity(rows.len());

        for location in self.locations {
            if let Some(pos) = rows.iter().position(|(id, _)| *id == location.id) {
                let (_, stock) = rows.remove(pos);
                if stock > 0.0 {
                    breakdown.push(LocationStock {
                        location_id: location.id,
                        location_name: location.name.clone(),
                        stock,
                    });
                }
            }
        }

        breakdown.extend(
            rows.into_iter()
                .filter(|(_, stock)| *stock > 0.0)
                .map(|(location_id, stock)| LocationStock {
                    location_id,
                    location_name: "Unknown Location".to_string(),
                    stock,
                }),
        );
        breakdown
    }

    pub fn status_of(&self, item: &Item) -> StockStatus {
        classify_stock(self.total_stock(item.id), item.min_stock, item.max_stock)
    }

    pub fn item_view(&self, item: &Item) -> ItemStockView {
        let total_stock = self.total_stock(item.id);
        let stock_status = classify_stock(total_stock, item.min_stock, item.max_stock);
        ItemStockView {
            item: item.clone(),
            total_stock,
            stock_percentage: stock_percentage(total_stock, item.max_stock),
            fill_percentage: fill_percentage(total_stock, item.max_stock),
            stock_status,
            urgency: stock_status.urgency(),
            location_stocks: self.location_breakdown(item.id),
        }
    }

    /// Views of every item, most urgent first; ties keep item order
    pub fn item_views(&self) -> Vec<ItemStockView> {
        let mut views: Vec<ItemStockView> =
            self.items.iter().map(|item| self.item_view(item)).collect();
        sort_by_urgency(&mut views);
        views
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let mut stats = DashboardStats {
            total_items: self.items.len(),
            total_locations: self.locations.len(),
            total_alerts: alerts_from_table(self.items, &self.table).len(),
            ..DashboardStats::default()
        };
        for item in self.items {
            stats.record(self.status_of(item));
        }
        stats
    }

    pub fn dashboard(&self) -> Dashboard {
        let items = self.item_views();
        let pick = |keep: fn(u8) -> bool| -> Vec<ItemStockView> {
            items.iter().filter(|v| keep(v.urgency)).cloned().collect()
        };

        Dashboard {
            critical_items: pick(|urgency| urgency >= 3),
            needs_attention: pick(|urgency| urgency >= 2),
            well_stocked: pick(|urgency| urgency == 0),
            stats: self.dashboard_stats(),
            items,
        }
    }
}

/// Stable sort, most urgent first
pub fn sort_by_urgency(views: &mut [ItemStockView]) {
    views.sort_by(|a, b| b.urgency.cmp(&a.urgency));
}

/// Total quantity of an item across all locations
pub fn total_stock(levels: &[StockLevel], item_id: Uuid) -> f64 {
    StockTable::from_levels(levels).total_stock(item_id)
}

/// Positive per-location stock of an item
pub fn location_breakdown(
    levels: &[StockLevel],
    locations: &[Location],
    item_id: Uuid,
) -> Vec<LocationStock> {
    StockAggregator::new(&[], locations, levels).location_breakdown(item_id)
}

/// Build the dashboard view model from a snapshot
pub fn build_dashboard(snapshot: &InventorySnapshot) -> Dashboard {
    StockAggregator::from_snapshot(snapshot).dashboard()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(name: &str, min_stock: f64, max_stock: f64) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category_id: None,
            supplier_id: None,
            unit: "kg".to_string(),
            min_stock,
            max_stock,
            created_at: Utc::now(),
        }
    }

    fn location(name: &str) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: None,
            location_type: "retail".to_string(),
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

    #[test]
    fn test_critical_item_end_to_end() {
        let beans = item("Espresso Beans", 5.0, 20.0);
        let shop = location("Main Shop");
        let store_room = location("Store Room");
        let levels = vec![level(&beans, shop.id, 3.0), level(&beans, store_room.id, 0.0)];
        let items = vec![beans.clone()];
        let locations = vec![shop.clone(), store_room];

        let aggregator = StockAggregator::new(&items, &locations, &levels);
        let view = aggregator.item_view(&beans);

        assert_eq!(view.total_stock, 3.0);
        assert_eq!(view.stock_status, StockStatus::Critical);
        assert_eq!(view.urgency, 3);
        assert_eq!(view.stock_percentage, 15.0);
        assert_eq!(
            view.location_stocks,
            vec![LocationStock {
                location_id: shop.id,
                location_name: "Main Shop".to_string(),
                stock: 3.0,
            }]
        );
    }

    #[test]
    fn test_total_stock_is_idempotent_and_matches_breakdown() {
        let milk = item("Oat Milk", 2.0, 30.0);
        let a = location("A");
        let b = location("B");
        let c = location("C");
        let levels = vec![
            level(&milk, a.id, 4.5),
            level(&milk, b.id, 0.0),
            level(&milk, c.id, 7.25),
        ];
        let locations = vec![a, b, c];

        let first = total_stock(&levels, milk.id);
        let second = total_stock(&levels, milk.id);
        assert_eq!(first, second);

        let breakdown = location_breakdown(&levels, &locations, milk.id);
        assert_eq!(breakdown.len(), 2);
        let summed: f64 = breakdown.iter().map(|l| l.stock).sum();
        assert_eq!(summed, first);
    }

    #[test]
    fn test_breakdown_keeps_rows_for_unknown_locations() {
        let cups = item("Cups", 100.0, 1000.0);
        let shop = location("Main Shop");
        let levels = vec![level(&cups, Uuid::new_v4(), 50.0), level(&cups, shop.id, 20.0)];
        let locations = vec![shop];

        let breakdown = location_breakdown(&levels, &locations, cups.id);
        assert_eq!(breakdown[0].location_name, "Main Shop");
        assert_eq!(breakdown[1].location_name, "Unknown Location");
        assert_eq!(breakdown.iter().map(|l| l.stock).sum::<f64>(), 70.0);
    }

    #[test]
    fn test_dashboard_sorts_by_urgency_stably() {
        let good_a = item("Good A", 1.0, 100.0);
        let out = item("Out", 1.0, 100.0);
        let good_b = item("Good B", 1.0, 100.0);
        let low = item("Low", 1.0, 100.0);
        let shop = location("Main Shop");
        let levels = vec![
            level(&good_a, shop.id, 50.0),
            level(&good_b, shop.id, 60.0),
            level(&low, shop.id, 10.0),
        ];
        let items = vec![good_a, out, good_b, low];
        let locations = vec![shop];

        let dashboard = StockAggregator::new(&items, &locations, &levels).dashboard();
        let names: Vec<&str> = dashboard.items.iter().map(|v| v.item.name.as_str()).collect();
        assert_eq!(names, vec!["Out", "Low", "Good A", "Good B"]);

        assert_eq!(dashboard.critical_items.len(), 1);
        assert_eq!(dashboard.needs_attention.len(), 2);
        assert_eq!(dashboard.well_stocked.len(), 2);
    }

    #[test]
    fn test_dashboard_stats_counts() {
        let items = vec![
            item("Out", 5.0, 20.0),
            item("Critical", 5.0, 20.0),
            item("Low", 1.0, 20.0),
            item("High", 1.0, 20.0),
            item("Good", 1.0, 20.0),
            item("Zero capacity", 0.0, 0.0),
        ];
        let shop = location("Main Shop");
        let levels = vec![
            level(&items[1], shop.id, 4.0),
            level(&items[2], shop.id, 5.0),
            level(&items[3], shop.id, 19.0),
            level(&items[4], shop.id, 10.0),
            level(&items[5], shop.id, 5.0),
        ];
        let locations = vec![shop];

        let stats = StockAggregator::new(&items, &locations, &levels).dashboard_stats();
        assert_eq!(
            stats,
            DashboardStats {
                total_items: 6,
                total_locations: 1,
                out_of_stock: 1,
                critical_stock: 1,
                low_stock: 2,
                high_stock: 1,
                good_stock: 1,
                total_alerts: 2,
            }
        );
        assert_eq!(stats.count(StockStatus::Low), 2);
    }

    #[test]
    fn test_view_serializes_flat_item_fields() {
        let beans = item("Espresso Beans", 5.0, 20.0);
        let items = vec![beans.clone()];
        let view = StockAggregator::new(&items, &[], &[]).item_view(&beans);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Espresso Beans");
        assert_eq!(json["min_stock"], 5.0);
        assert_eq!(json["totalStock"], 0.0);
        assert_eq!(json["stockStatus"], "out");
    }
}
