//! Store and service tests
//!
//! Tests for the mutation services including:
//! - Audit entries recorded after each mutation
//! - Mutations surviving a failing audit log
//! - Item assignment and copying between locations
//! - Stock movement chaining

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use coffee_inventory_backend::config::AuditConfig;
use coffee_inventory_backend::services::{
    AnalysisService, AssignItemsInput, CatalogService, CopyAssignmentsInput, LocationTypeService,
    StockService,
};
use coffee_inventory_backend::store::{
    AuditError, AuditSink, InventoryStore, InventoryTables, MemoryAuditLog,
};
use proptest::prelude::*;
use shared::{
    AnalysisFilter, AnalysisPeriod, CategoryInput, CreateItemInput, CreateLocationInput, Item,
    Location, LocationTypeInput, SetStockInput, StockStatus, Transaction, TransactionEvent,
    TransactionLogFilter, TransactionType,
};
use uuid::Uuid;

// ============================================================================
// Fixtures
// ============================================================================

/// Audit sink that refuses every write
struct FailingAuditLog;

impl AuditSink for FailingAuditLog {
    fn append(&self, _transaction: Transaction) -> Result<Transaction, AuditError> {
        Err(AuditError::Unavailable("disk full".to_string()))
    }

    fn entries(&self) -> Result<Vec<Transaction>, AuditError> {
        Err(AuditError::Unavailable("disk full".to_string()))
    }
}

/// In-memory audit log that counts how often it is read
#[derive(Default)]
struct CountingAuditLog {
    inner: MemoryAuditLog,
    reads: AtomicUsize,
}

impl AuditSink for CountingAuditLog {
    fn append(&self, transaction: Transaction) -> Result<Transaction, AuditError> {
        self.inner.append(transaction)
    }

    fn entries(&self) -> Result<Vec<Transaction>, AuditError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.entries()
    }
}

fn store() -> InventoryStore {
    InventoryStore::in_memory(AuditConfig::default())
}

fn failing_store() -> InventoryStore {
    InventoryStore::new(
        InventoryTables::new(Utc::now()),
        Arc::new(FailingAuditLog),
        AuditConfig::default(),
    )
}

fn location_input(name: &str) -> CreateLocationInput {
    CreateLocationInput {
        name: name.to_string(),
        address: None,
        location_type: None,
    }
}

fn item_input(name: &str, min_stock: f64, max_stock: f64) -> CreateItemInput {
    CreateItemInput {
        name: name.to_string(),
        category_id: None,
        supplier_id: None,
        unit: "kg".to_string(),
        min_stock,
        max_stock,
    }
}

async fn seed(store: &InventoryStore) -> (Location, Location, Item) {
    let catalog = CatalogService::new(store.clone());
    let front = catalog.create_location(location_input("Front Counter")).await.unwrap();
    let back = catalog.create_location(location_input("Back Room")).await.unwrap();
    let beans = catalog
        .create_item(item_input("Espresso Beans", 5.0, 50.0))
        .await
        .unwrap();
    (front, back, beans)
}

// ============================================================================
// Audit Trail Tests
// ============================================================================

#[cfg(test)]
mod audit_tests {
    use super::*;

    /// Each catalog mutation appends one transaction of the matching type
    #[tokio::test]
    async fn test_catalog_mutations_are_audited() {
        let store = store();
        let catalog = CatalogService::new(store.clone());

        let location = catalog.create_location(location_input("Kiosk")).await.unwrap();
        let category = catalog
            .create_category(CategoryInput {
                name: Some("Beans".to_string()),
                description: None,
            })
            .await
            .unwrap();
        catalog.delete_category(category.id).await.unwrap();
        catalog.delete_location(location.id).await.unwrap();

        let types: Vec<TransactionType> = store
            .transactions()
            .iter()
            .map(Transaction::transaction_type)
            .collect();
        assert_eq!(
            types,
            vec![
                TransactionType::LocationAdded,
                TransactionType::CategoryAdded,
                TransactionType::CategoryDeleted,
                TransactionType::LocationDeleted,
            ]
        );
        assert!(store.transactions().iter().all(|t| t.user_name == "System"));
    }

    /// A stock update records the movement from the previous quantity
    #[tokio::test]
    async fn test_stock_update_records_movement() {
        let store = store();
        let (front, _, beans) = seed(&store).await;
        let stock = StockService::new(store.clone());

        stock
            .set_stock(SetStockInput {
                item_id: beans.id,
                location_id: front.id,
                quantity: 12.0,
            })
            .await
            .unwrap();
        let update = stock
            .set_stock(SetStockInput {
                item_id: beans.id,
                location_id: front.id,
                quantity: 4.5,
            })
            .await
            .unwrap();

        assert_eq!(update.movement.previous_quantity, 12.0);
        assert_eq!(update.movement.quantity_change, -7.5);
        let transaction = update.transaction.expect("audit entry");
        match transaction.event {
            TransactionEvent::StockUpdated(movement) => {
                assert_eq!(movement.item_name, "Espresso Beans");
                assert_eq!(movement.location_name, "Front Counter");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    /// A failing audit log never rolls back or fails the mutation
    #[tokio::test]
    async fn test_failing_audit_log_keeps_mutation() {
        let store = failing_store();
        let (front, _, beans) = seed(&store).await;

        let update = StockService::new(store.clone())
            .set_stock(SetStockInput {
                item_id: beans.id,
                location_id: front.id,
                quantity: 9.0,
            })
            .await
            .unwrap();

        assert!(update.transaction.is_none());
        let tables = store.read().await;
        assert_eq!(tables.stock_table().quantity(beans.id, front.id), Some(9.0));
        assert_eq!(tables.items().len(), 1);
        drop(tables);
        assert!(store.transactions().is_empty());
    }

    /// Disabling the audit log skips entries entirely
    #[tokio::test]
    async fn test_disabled_audit_records_nothing() {
        let store = InventoryStore::in_memory(AuditConfig {
            enabled: false,
            ..AuditConfig::default()
        });
        seed(&store).await;
        assert!(store.transactions().is_empty());
    }
}

// ============================================================================
// Assignment Tests
// ============================================================================

#[cfg(test)]
mod assignment_tests {
    use super::*;

    /// Assigning stocks items at zero and skips those already present
    #[tokio::test]
    async fn test_assign_items_skips_assigned() {
        let store = store();
        let (front, _, beans) = seed(&store).await;
        let milk = CatalogService::new(store.clone())
            .create_item(item_input("Oat Milk", 2.0, 20.0))
            .await
            .unwrap();
        let stock = StockService::new(store.clone());

        let first = stock
            .assign_items(front.id, AssignItemsInput { item_ids: vec![beans.id] })
            .await
            .unwrap();
        assert_eq!(first.assigned, vec![beans.id]);

        let second = stock
            .assign_items(
                front.id,
                AssignItemsInput {
                    item_ids: vec![beans.id, milk.id],
                },
            )
            .await
            .unwrap();
        assert_eq!(second.assigned, vec![milk.id]);
        assert_eq!(second.skipped, vec![beans.id]);

        let view = stock.assignment(front.id).await.unwrap();
        assert_eq!(view.total_assigned, 2);
        assert_eq!(view.total_unassigned, 0);
    }

    /// Unknown items abort the whole assignment
    #[tokio::test]
    async fn test_assign_unknown_item_fails() {
        let store = store();
        let (front, _, beans) = seed(&store).await;
        let result = StockService::new(store.clone())
            .assign_items(
                front.id,
                AssignItemsInput {
                    item_ids: vec![beans.id, Uuid::new_v4()],
                },
            )
            .await;

        assert!(result.is_err());
        assert!(!store.read().await.is_assigned(beans.id, front.id));
    }

    /// Copying brings over only the items the target lacks
    #[tokio::test]
    async fn test_copy_assignments() {
        let store = store();
        let (front, back, beans) = seed(&store).await;
        let stock = StockService::new(store.clone());
        stock
            .set_stock(SetStockInput {
                item_id: beans.id,
                location_id: back.id,
                quantity: 30.0,
            })
            .await
            .unwrap();

        let outcome = stock
            .copy_assignments(
                front.id,
                CopyAssignmentsInput {
                    source_location_id: back.id,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.assigned, vec![beans.id]);
        let table = store.read().await.stock_table();
        assert_eq!(table.quantity(beans.id, front.id), Some(0.0));
        assert_eq!(table.quantity(beans.id, back.id), Some(30.0));
    }

    /// A location cannot copy from itself
    #[tokio::test]
    async fn test_copy_from_same_location_fails() {
        let store = store();
        let (front, _, _) = seed(&store).await;
        let result = StockService::new(store)
            .copy_assignments(
                front.id,
                CopyAssignmentsInput {
                    source_location_id: front.id,
                },
            )
            .await;
        assert!(result.is_err());
    }
}

// ============================================================================
// Location Type Tests
// ============================================================================

#[cfg(test)]
mod location_type_tests {
    use super::*;

    /// Renaming a type renames it on every location using it
    #[tokio::test]
    async fn test_rename_cascades_to_locations() {
        let store = store();
        let types = LocationTypeService::new(store.clone());
        let kiosk = types
            .create(LocationTypeInput {
                name: "kiosk".to_string(),
                description: None,
                color: None,
                icon: None,
            })
            .await
            .unwrap();
        let location = CatalogService::new(store.clone())
            .create_location(CreateLocationInput {
                name: "Station Kiosk".to_string(),
                address: None,
                location_type: Some("kiosk".to_string()),
            })
            .await
            .unwrap();

        types
            .update(
                kiosk.id,
                LocationTypeInput {
                    name: "cart".to_string(),
                    description: None,
                    color: None,
                    icon: None,
                },
            )
            .await
            .unwrap();

        let tables = store.read().await;
        assert_eq!(tables.location(location.id).unwrap().location_type, "cart");
        drop(tables);

        // In use, so it cannot be deleted
        assert!(types.delete(kiosk.id).await.is_err());
    }
}

// ============================================================================
// Analysis Service Tests
// ============================================================================

#[cfg(test)]
mod analysis_tests {
    use super::*;

    /// Dashboard, alerts and trends reflect the store's current state
    #[tokio::test]
    async fn test_analysis_over_live_store() {
        let store = store();
        let (front, back, beans) = seed(&store).await;
        let stock = StockService::new(store.clone());
        for (location, quantity) in [(front.id, 20.0), (back.id, 10.0), (front.id, 2.0)] {
            stock
                .set_stock(SetStockInput {
                    item_id: beans.id,
                    location_id: location,
                    quantity,
                })
                .await
                .unwrap();
        }

        let analysis = AnalysisService::new(store.clone(), 3);
        let dashboard = analysis.dashboard().await;
        assert_eq!(dashboard.items[0].total_stock, 12.0);
        assert_eq!(dashboard.items[0].stock_status, StockStatus::Low);
        assert!(analysis.alerts().await.is_empty());

        let now = Utc::now();
        let trends = analysis
            .analysis(AnalysisFilter::for_period(AnalysisPeriod::Day), now)
            .await;
        let beans_trend = trends.item(beans.id).expect("beans analysed");
        assert_eq!(beans_trend.total_restocked, 30.0);
        assert_eq!(beans_trend.total_consumed, 18.0);
        assert_eq!(trends.summary.total_transactions, 3);

        let log = analysis
            .transaction_log(&TransactionLogFilter::default(), now)
            .await;
        assert_eq!(log.summary.stock_updates, 3);
        assert_eq!(log.summary.items_added, 1);

        let report = analysis
            .export_analysis(AnalysisFilter::for_period(AnalysisPeriod::Day), now)
            .await
            .unwrap();
        assert!(report.filename.starts_with("stock-analysis-day-"));
        assert!(report.content.contains("Espresso Beans"));
    }
}

#[cfg(test)]
mod stock_view_tests {
    use super::*;

    /// Stock views are built from the tables alone, never from the audit log
    #[tokio::test]
    async fn test_stock_views_do_not_read_audit_log() {
        let audit = Arc::new(CountingAuditLog::default());
        let store = InventoryStore::new(
            InventoryTables::new(Utc::now()),
            audit.clone(),
            AuditConfig::default(),
        );
        let (front, _, beans) = seed(&store).await;
        StockService::new(store.clone())
            .set_stock(SetStockInput {
                item_id: beans.id,
                location_id: front.id,
                quantity: 0.0,
            })
            .await
            .unwrap();

        let analysis = AnalysisService::new(store.clone(), 5);
        let dashboard = analysis.dashboard().await;
        let alerts = analysis.alerts().await;
        let board = analysis.alert_board().await;
        let locations = analysis.location_health().await;
        let categories = analysis.category_health().await;

        assert_eq!(audit.reads.load(Ordering::SeqCst), 0);
        assert_eq!(dashboard.stats.out_of_stock, 1);
        assert_eq!(alerts.len(), 1);
        assert_eq!(board.total(), 1);
        assert_eq!(locations[0].assigned_items, 1);
        assert_eq!(categories.len(), 1);

        analysis
            .analysis(AnalysisFilter::default(), Utc::now())
            .await;
        assert_eq!(audit.reads.load(Ordering::SeqCst), 1);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Consecutive movements chain: each starts where the last one ended
    #[test]
    fn prop_stock_movements_chain(quantities in prop::collection::vec(0u32..10_000, 1..20)) {
        let now = Utc::now();
        let mut tables = InventoryTables::new(now);
        let location = tables.create_location(location_input("Bar"), now).unwrap();
        let item = tables.create_item(item_input("Milk", 1.0, 100.0), now).unwrap();

        let mut previous = 0.0;
        for raw in quantities {
            let quantity = f64::from(raw) / 10.0;
            let movement = tables.set_stock(item.id, location.id, quantity, now).unwrap();
            prop_assert_eq!(movement.previous_quantity, previous);
            prop_assert_eq!(movement.new_quantity, quantity);
            previous = quantity;
        }
        prop_assert_eq!(tables.stock_levels().len(), 1);
        prop_assert_eq!(tables.stock_table().total_stock(item.id), previous);
    }
}
