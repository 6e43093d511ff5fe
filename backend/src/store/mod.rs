//! In-memory domain store
//!
//! Holds the authoritative tables behind a single async lock. Mutations are
//! applied to the tables first; the audit entry describing a mutation is
//! recorded afterwards through [`InventoryStore::record_audit_entry`], which
//! never fails from the caller's point of view.

pub mod audit;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{
    validate_email, validate_name, validate_phone, validate_quantity, validate_stock_thresholds,
    validate_unit, Category, CategoryInput, CreateItemInput, CreateLocationInput, InventorySnapshot,
    Item, Location, LocationType, LocationTypeInput, StockAggregator, StockKey, StockLevel, StockMovement,
    StockTable, Supplier, SupplierInput, Transaction, TransactionEvent, UpdateItemInput,
    UpdateLocationInput,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::config::AuditConfig;
use crate::error::{AppError, AppResult};
pub use audit::{AuditError, AuditSink, MemoryAuditLog};

fn check(field: &str, result: Result<(), &'static str>) -> AppResult<()> {
    result.map_err(|message| AppError::invalid(field, message))
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// The domain tables. Transactions live in the audit sink, not here.
#[derive(Debug, Clone, Default)]
pub struct InventoryTables {
    locations: Vec<Location>,
    location_types: Vec<LocationType>,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,
    items: Vec<Item>,
    stock: BTreeMap<StockKey, StockLevel>,
}

impl InventoryTables {
    /// Empty tables with the built-in location types registered
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            location_types: LocationType::defaults(now),
            ..Self::default()
        }
    }

    /// Load tables from a snapshot; its transactions are returned separately
    pub fn from_snapshot(snapshot: InventorySnapshot, now: DateTime<Utc>) -> (Self, Vec<Transaction>) {
        let location_types = if snapshot.location_types.is_empty() {
            LocationType::defaults(now)
        } else {
            snapshot.location_types
        };
        let stock = snapshot
            .stock_levels
            .into_iter()
            .map(|level| (level.key(), level))
            .collect();

        let tables = Self {
            locations: snapshot.locations,
            location_types,
            categories: snapshot.categories,
            suppliers: snapshot.suppliers,
            items: snapshot.items,
            stock,
        };
        (tables, snapshot.transactions)
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location_types(&self) -> &[LocationType] {
        &self.location_types
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn stock_levels(&self) -> Vec<StockLevel> {
        self.stock.values().cloned().collect()
    }

    pub fn stock_table(&self) -> StockTable {
        let mut table = StockTable::default();
        for level in self.stock.values() {
            table.upsert(level.item_id, level.location_id, level.quantity);
        }
        table
    }

    /// Stock aggregation over the current items, locations and stock rows
    pub fn aggregator(&self) -> StockAggregator<'_> {
        StockAggregator::with_table(&self.items, &self.locations, self.stock_table())
    }

    pub fn location(&self, id: Uuid) -> AppResult<&Location> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    pub fn category(&self, id: Uuid) -> AppResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub fn supplier(&self, id: Uuid) -> AppResult<&Supplier> {
        self.suppliers
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    pub fn item(&self, id: Uuid) -> AppResult<&Item> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    pub fn location_type(&self, id: Uuid) -> AppResult<&LocationType> {
        self.location_types
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Location type".to_string()))
    }

    pub fn category_name(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.category(id).ok()).map(|c| c.name.clone())
    }

    pub fn supplier_name(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.supplier(id).ok()).map(|s| s.name.clone())
    }

    // ------------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------------

    fn ensure_location_type(&self, name: &str) -> AppResult<()> {
        if self.location_types.is_empty() || self.location_types.iter().any(|t| t.name == name) {
            Ok(())
        } else {
            Err(AppError::invalid("type", format!("Unknown location type: {}", name)))
        }
    }

    pub fn create_location(&mut self, input: CreateLocationInput, now: DateTime<Utc>) -> AppResult<Location> {
        check("name", validate_name(&input.name))?;
        let location_type = input
            .location_type
            .map(|t| trimmed(&t))
            .unwrap_or_else(|| "retail".to_string());
        self.ensure_location_type(&location_type)?;

        let location = Location {
            id: Uuid::new_v4(),
            name: trimmed(&input.name),
            address: input.address,
            location_type,
            created_at: now,
        };
        self.locations.push(location.clone());
        Ok(location)
    }

    pub fn update_location(&mut self, id: Uuid, input: UpdateLocationInput) -> AppResult<Location> {
        if let Some(name) = &input.name {
            check("name", validate_name(name))?;
        }
        if let Some(location_type) = &input.location_type {
            self.ensure_location_type(location_type.trim())?;
        }

        let location = self
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound("Location".to_string()))?;
        if let Some(name) = input.name {
            location.name = trimmed(&name);
        }
        if let Some(address) = input.address {
            location.address = Some(address);
        }
        if let Some(location_type) = input.location_type {
            location.location_type = trimmed(&location_type);
        }
        Ok(location.clone())
    }

    /// Remove a location together with its stock rows
    pub fn delete_location(&mut self, id: Uuid) -> AppResult<Location> {
        let index = self
            .locations
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound("Location".to_string()))?;
        self.stock.retain(|key, _| key.location_id != id);
        Ok(self.locations.remove(index))
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    pub fn create_category(&mut self, input: CategoryInput) -> AppResult<Category> {
        let name = input.name.unwrap_or_default();
        check("name", validate_name(&name))?;

        let category = Category {
            id: Uuid::new_v4(),
            name: trimmed(&name),
            description: input.description,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(&mut self, id: Uuid, input: CategoryInput) -> AppResult<Category> {
        if let Some(name) = &input.name {
            check("name", validate_name(name))?;
        }
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Category".to_string()))?;
        if let Some(name) = input.name {
            category.name = trimmed(&name);
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }
        Ok(category.clone())
    }

    /// Remove a category; its items become uncategorized
    pub fn delete_category(&mut self, id: Uuid) -> AppResult<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Category".to_string()))?;
        for item in self.items.iter_mut().filter(|i| i.category_id == Some(id)) {
            item.category_id = None;
        }
        Ok(self.categories.remove(index))
    }

    // ------------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------------

    fn validate_supplier_contact(input: &SupplierInput) -> AppResult<()> {
        if let Some(email) = input.email.as_deref().filter(|e| !e.trim().is_empty()) {
            check("email", validate_email(email))?;
        }
        if let Some(phone) = input.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            check("phone", validate_phone(phone))?;
        }
        Ok(())
    }

    pub fn create_supplier(&mut self, input: SupplierInput) -> AppResult<Supplier> {
        let name = input.name.clone().unwrap_or_default();
        check("name", validate_name(&name))?;
        Self::validate_supplier_contact(&input)?;

        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: trimmed(&name),
            contact: input.contact,
            email: input.email,
            phone: input.phone,
        };
        self.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    pub fn update_supplier(&mut self, id: Uuid, input: SupplierInput) -> AppResult<Supplier> {
        if let Some(name) = &input.name {
            check("name", validate_name(name))?;
        }
        Self::validate_supplier_contact(&input)?;

        let supplier = self
            .suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;
        if let Some(name) = input.name {
            supplier.name = trimmed(&name);
        }
        if input.contact.is_some() {
            supplier.contact = input.contact;
        }
        if input.email.is_some() {
            supplier.email = input.email;
        }
        if input.phone.is_some() {
            supplier.phone = input.phone;
        }
        Ok(supplier.clone())
    }

    /// Remove a supplier; its items keep existing without one
    pub fn delete_supplier(&mut self, id: Uuid) -> AppResult<Supplier> {
        let index = self
            .suppliers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;
        for item in self.items.iter_mut().filter(|i| i.supplier_id == Some(id)) {
            item.supplier_id = None;
        }
        Ok(self.suppliers.remove(index))
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    fn ensure_references(&self, category_id: Option<Uuid>, supplier_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = category_id {
            self.category(id)
                .map_err(|_| AppError::invalid("category_id", "Category does not exist"))?;
        }
        if let Some(id) = supplier_id {
            self.supplier(id)
                .map_err(|_| AppError::invalid("supplier_id", "Supplier does not exist"))?;
        }
        Ok(())
    }

    pub fn create_item(&mut self, input: CreateItemInput, now: DateTime<Utc>) -> AppResult<Item> {
        check("name", validate_name(&input.name))?;
        check("unit", validate_unit(&input.unit))?;
        check("min_stock", validate_stock_thresholds(input.min_stock, input.max_stock))?;
        self.ensure_references(input.category_id, input.supplier_id)?;

        let item = Item {
            id: Uuid::new_v4(),
            name: trimmed(&input.name),
            category_id: input.category_id,
            supplier_id: input.supplier_id,
            unit: trimmed(&input.unit),
            min_stock: input.min_stock,
            max_stock: input.max_stock,
            created_at: now,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn update_item(&mut self, id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        let current = self.item(id)?.clone();
        if let Some(name) = &input.name {
            check("name", validate_name(name))?;
        }
        if let Some(unit) = &input.unit {
            check("unit", validate_unit(unit))?;
        }
        check(
            "min_stock",
            validate_stock_thresholds(
                input.min_stock.unwrap_or(current.min_stock),
                input.max_stock.unwrap_or(current.max_stock),
            ),
        )?;
        self.ensure_references(input.category_id, input.supplier_id)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound("Item".to_string()))?;
        if let Some(name) = input.name {
            item.name = trimmed(&name);
        }
        if input.category_id.is_some() {
            item.category_id = input.category_id;
        }
        if input.supplier_id.is_some() {
            item.supplier_id = input.supplier_id;
        }
        if let Some(unit) = input.unit {
            item.unit = trimmed(&unit);
        }
        if let Some(min_stock) = input.min_stock {
            item.min_stock = min_stock;
        }
        if let Some(max_stock) = input.max_stock {
            item.max_stock = max_stock;
        }
        Ok(item.clone())
    }

    /// Remove an item together with its stock rows
    pub fn delete_item(&mut self, id: Uuid) -> AppResult<Item> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound("Item".to_string()))?;
        self.stock.retain(|key, _| key.item_id != id);
        Ok(self.items.remove(index))
    }

    // ------------------------------------------------------------------------
    // Stock
    // ------------------------------------------------------------------------

    /// Upsert the quantity of an item at a location.
    ///
    /// Returns the movement from the previous quantity (0 when the row is
    /// new) to the new one.
    pub fn set_stock(
        &mut self,
        item_id: Uuid,
        location_id: Uuid,
        quantity: f64,
        now: DateTime<Utc>,
    ) -> AppResult<StockMovement> {
        check("quantity", validate_quantity(quantity))?;
        let item = self.item(item_id)?;
        let location = self.location(location_id)?;
        let key = StockKey::new(item_id, location_id);
        let previous = self.stock.get(&key).map_or(0.0, |level| level.quantity);

        let movement = StockMovement::new(
            item_id,
            item.name.clone(),
            location_id,
            location.name.clone(),
            previous,
            quantity,
            item.unit.clone(),
        );
        self.stock.insert(
            key,
            StockLevel {
                item_id,
                location_id,
                quantity,
                last_updated: now,
            },
        );
        Ok(movement)
    }

    pub fn is_assigned(&self, item_id: Uuid, location_id: Uuid) -> bool {
        self.stock.contains_key(&StockKey::new(item_id, location_id))
    }

    // ------------------------------------------------------------------------
    // Location types
    // ------------------------------------------------------------------------

    fn ensure_unique_type_name(&self, name: &str, except: Option<Uuid>) -> AppResult<()> {
        let taken = self
            .location_types
            .iter()
            .any(|t| Some(t.id) != except && t.name.eq_ignore_ascii_case(name));
        if taken {
            Err(AppError::DuplicateEntry("name".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn create_location_type(&mut self, input: LocationTypeInput, now: DateTime<Utc>) -> AppResult<LocationType> {
        check("name", validate_name(&input.name))?;
        let name = trimmed(&input.name);
        self.ensure_unique_type_name(&name, None)?;

        let location_type = LocationType {
            id: Uuid::new_v4(),
            name,
            description: input.description,
            color: input.color.unwrap_or_else(|| "blue".to_string()),
            icon: input.icon.unwrap_or_else(|| "map-pin".to_string()),
            is_default: false,
            created_at: now,
            updated_at: now,
        };
        self.location_types.push(location_type.clone());
        Ok(location_type)
    }

    /// Replace a location type; a rename is applied to every location using it
    pub fn update_location_type(
        &mut self,
        id: Uuid,
        input: LocationTypeInput,
        now: DateTime<Utc>,
    ) -> AppResult<LocationType> {
        check("name", validate_name(&input.name))?;
        let name = trimmed(&input.name);
        self.ensure_unique_type_name(&name, Some(id))?;

        let location_type = self
            .location_types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Location type".to_string()))?;
        let old_name = std::mem::replace(&mut location_type.name, name.clone());
        location_type.description = input.description;
        if let Some(color) = input.color {
            location_type.color = color;
        }
        if let Some(icon) = input.icon {
            location_type.icon = icon;
        }
        location_type.updated_at = now;
        let updated = location_type.clone();

        if old_name != name {
            for location in self.locations.iter_mut().filter(|l| l.location_type == old_name) {
                location.location_type = name.clone();
            }
        }
        Ok(updated)
    }

    /// Remove a custom location type that no location uses
    pub fn delete_location_type(&mut self, id: Uuid) -> AppResult<LocationType> {
        let index = self
            .location_types
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Location type".to_string()))?;
        let location_type = &self.location_types[index];
        if location_type.is_default {
            return Err(AppError::Conflict {
                resource: "location_type".to_string(),
                message: "Default location types cannot be deleted".to_string(),
            });
        }
        let in_use = self
            .locations
            .iter()
            .filter(|l| l.location_type == location_type.name)
            .count();
        if in_use > 0 {
            return Err(AppError::Conflict {
                resource: "location_type".to_string(),
                message: format!(
                    "Location type \"{}\" is used by {} location(s)",
                    location_type.name, in_use
                ),
            });
        }

        Ok(self.location_types.remove(index))
    }
}

/// Handle to the shared store, cheap to clone into each request
#[derive(Clone)]
pub struct InventoryStore {
    tables: Arc<RwLock<InventoryTables>>,
    audit: Arc<dyn AuditSink>,
    audit_config: AuditConfig,
}

impl InventoryStore {
    pub fn new(tables: InventoryTables, audit: Arc<dyn AuditSink>, audit_config: AuditConfig) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            audit,
            audit_config,
        }
    }

    /// Empty store with an in-memory audit log
    pub fn in_memory(audit_config: AuditConfig) -> Self {
        Self::new(
            InventoryTables::new(Utc::now()),
            Arc::new(MemoryAuditLog::new()),
            audit_config,
        )
    }

    /// Store seeded from a snapshot, its transactions becoming the audit log
    pub fn from_snapshot(snapshot: InventorySnapshot, audit_config: AuditConfig) -> Self {
        let (tables, transactions) = InventoryTables::from_snapshot(snapshot, Utc::now());
        Self::new(
            tables,
            Arc::new(MemoryAuditLog::with_entries(transactions)),
            audit_config,
        )
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, InventoryTables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, InventoryTables> {
        self.tables.write().await
    }

    /// Record the audit entry for a mutation that has already been applied.
    ///
    /// Failures are logged and swallowed: the caller gets `None` and the
    /// mutation stands.
    pub fn record_audit_entry(&self, event: TransactionEvent) -> Option<Transaction> {
        if !self.audit_config.enabled {
            return None;
        }
        let transaction_type = event.transaction_type();
        let entry = Transaction::new(event, self.audit_config.user_name.clone(), Utc::now());

        match self.audit.append(entry) {
            Ok(stored) => {
                tracing::debug!(id = %stored.id, %transaction_type, "Audit entry recorded");
                Some(stored)
            }
            Err(e) => {
                tracing::warn!(%transaction_type, error = %e, "Failed to record audit entry");
                None
            }
        }
    }

    /// The audit log, oldest first; empty when the log cannot be read
    pub fn transactions(&self) -> Vec<Transaction> {
        self.audit.entries().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read audit log");
            Vec::new()
        })
    }
}
