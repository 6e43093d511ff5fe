//! Stock levels and item-to-location assignments

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{
    items_to_copy, location_assignment, LocationAssignment, SetStockInput, StockLevel,
    StockMovement, Transaction, TransactionEvent,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Result of a stock upsert
#[derive(Debug, Clone, Serialize)]
pub struct StockUpdate {
    pub stock_level: StockLevel,
    pub movement: StockMovement,
    /// `None` when the audit entry could not be recorded
    pub transaction: Option<Transaction>,
}

/// Input for assigning items to a location
#[derive(Debug, Clone, Deserialize)]
pub struct AssignItemsInput {
    pub item_ids: Vec<Uuid>,
}

/// Input for copying assignments from another location
#[derive(Debug, Clone, Deserialize)]
pub struct CopyAssignmentsInput {
    pub source_location_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AssignmentOutcome {
    /// Items newly stocked at the location with quantity 0
    pub assigned: Vec<Uuid>,
    /// Items that were already assigned and left untouched
    pub skipped: Vec<Uuid>,
}

/// Stock service for quantities per item and location
#[derive(Clone)]
pub struct StockService {
    store: InventoryStore,
}

impl StockService {
    pub fn new(store: InventoryStore) -> Self {
        Self { store }
    }

    pub async fn list_stock(&self) -> Vec<StockLevel> {
        self.store.read().await.stock_levels()
    }

    /// Upsert one quantity, then record the movement
    pub async fn set_stock(&self, input: SetStockInput) -> AppResult<StockUpdate> {
        let now = Utc::now();
        let movement = self.store.write().await.set_stock(
            input.item_id,
            input.location_id,
            input.quantity,
            now,
        )?;
        tracing::info!(
            item = %movement.item_name,
            location = %movement.location_name,
            change = movement.quantity_change,
            "Stock updated"
        );

        let transaction = self
            .store
            .record_audit_entry(TransactionEvent::StockUpdated(movement.clone()));
        Ok(StockUpdate {
            stock_level: StockLevel {
                item_id: input.item_id,
                location_id: input.location_id,
                quantity: input.quantity,
                last_updated: now,
            },
            movement,
            transaction,
        })
    }

    /// Stock the given items at a location with quantity 0.
    ///
    /// Every item must exist; items already assigned are skipped.
    pub async fn assign_items(&self, location_id: Uuid, input: AssignItemsInput) -> AppResult<AssignmentOutcome> {
        let (outcome, movements) = {
            let mut tables = self.store.write().await;
            tables.location(location_id)?;
            for item_id in &input.item_ids {
                tables.item(*item_id)?;
            }

            let mut outcome = AssignmentOutcome::default();
            let mut movements = Vec::new();
            let now = Utc::now();
            for item_id in input.item_ids {
                if tables.is_assigned(item_id, location_id) || outcome.assigned.contains(&item_id) {
                    outcome.skipped.push(item_id);
                    continue;
                }
                movements.push(tables.set_stock(item_id, location_id, 0.0, now)?);
                outcome.assigned.push(item_id);
            }
            (outcome, movements)
        };
        tracing::info!(
            %location_id,
            assigned = outcome.assigned.len(),
            skipped = outcome.skipped.len(),
            "Items assigned to location"
        );

        for movement in movements {
            self.store
                .record_audit_entry(TransactionEvent::StockUpdated(movement));
        }
        Ok(outcome)
    }

    /// Assign every item stocked at `source` that `target` does not have yet
    pub async fn copy_assignments(&self, target: Uuid, input: CopyAssignmentsInput) -> AppResult<AssignmentOutcome> {
        if input.source_location_id == target {
            return Err(AppError::invalid(
                "source_location_id",
                "Cannot copy assignments from the same location",
            ));
        }

        let item_ids = {
            let tables = self.store.read().await;
            tables.location(target)?;
            tables.location(input.source_location_id)?;
            items_to_copy(input.source_location_id, target, tables.items(), &tables.stock_table())
        };
        self.assign_items(target, AssignItemsInput { item_ids }).await
    }

    /// Assigned and unassigned items of a location, grouped by category
    pub async fn assignment(&self, location_id: Uuid) -> AppResult<LocationAssignment> {
        let tables = self.store.read().await;
        let location = tables.location(location_id)?;
        Ok(location_assignment(
            location,
            tables.items(),
            tables.categories(),
            &tables.stock_table(),
        ))
    }
}
