//! Catalog service: locations, categories, suppliers and items
//!
//! Each mutation is applied under the store's write lock, the lock is
//! released, and only then is the audit entry recorded.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use shared::{
    Category, CategoryDetails, CategoryInput, CreateItemInput, CreateLocationInput, Item,
    ItemDetails, Location, LocationDetails, Supplier, SupplierDetails, SupplierInput,
    TransactionEvent, UpdateItemInput, UpdateLocationInput,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::InventoryStore;

/// Catalog service for the master data of the shop
#[derive(Clone)]
pub struct CatalogService {
    store: InventoryStore,
}

fn changes<T: Serialize>(input: &T) -> Value {
    serde_json::to_value(input).unwrap_or(Value::Null)
}

impl CatalogService {
    pub fn new(store: InventoryStore) -> Self {
        Self { store }
    }

    // ========================================================================
    // Locations
    // ========================================================================

    pub async fn list_locations(&self) -> Vec<Location> {
        self.store.read().await.locations().to_vec()
    }

    pub async fn create_location(&self, input: CreateLocationInput) -> AppResult<Location> {
        let location = self.store.write().await.create_location(input, Utc::now())?;
        tracing::info!(id = %location.id, name = %location.name, "Location created");

        self.store
            .record_audit_entry(TransactionEvent::LocationAdded(LocationDetails {
                location_id: location.id,
                location_name: location.name.clone(),
                address: location.address.clone(),
                location_type: Some(location.location_type.clone()),
                changes: Value::Null,
            }));
        Ok(location)
    }

    pub async fn update_location(&self, id: Uuid, input: UpdateLocationInput) -> AppResult<Location> {
        let changes = changes(&input);
        let location = self.store.write().await.update_location(id, input)?;
        tracing::info!(id = %location.id, "Location updated");

        self.store
            .record_audit_entry(TransactionEvent::LocationUpdated(LocationDetails {
                location_id: location.id,
                location_name: location.name.clone(),
                address: None,
                location_type: None,
                changes,
            }));
        Ok(location)
    }

    pub async fn delete_location(&self, id: Uuid) -> AppResult<Location> {
        let location = self.store.write().await.delete_location(id)?;
        tracing::info!(id = %location.id, name = %location.name, "Location deleted");

        self.store
            .record_audit_entry(TransactionEvent::LocationDeleted(LocationDetails {
                location_id: location.id,
                location_name: location.name.clone(),
                address: None,
                location_type: None,
                changes: Value::Null,
            }));
        Ok(location)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_categories(&self) -> Vec<Category> {
        self.store.read().await.categories().to_vec()
    }

    pub async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let category = self.store.write().await.create_category(input)?;
        tracing::info!(id = %category.id, name = %category.name, "Category created");

        self.store
            .record_audit_entry(TransactionEvent::CategoryAdded(CategoryDetails {
                category_id: category.id,
                category_name: category.name.clone(),
                description: category.description.clone(),
                changes: Value::Null,
            }));
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, input: CategoryInput) -> AppResult<Category> {
        let changes = changes(&input);
        let category = self.store.write().await.update_category(id, input)?;
        tracing::info!(id = %category.id, "Category updated");

        self.store
            .record_audit_entry(TransactionEvent::CategoryUpdated(CategoryDetails {
                category_id: category.id,
                category_name: category.name.clone(),
                description: None,
                changes,
            }));
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> AppResult<Category> {
        let category = self.store.write().await.delete_category(id)?;
        tracing::info!(id = %category.id, "Category deleted");

        self.store
            .record_audit_entry(TransactionEvent::CategoryDeleted(CategoryDetails {
                category_id: category.id,
                category_name: category.name.clone(),
                description: None,
                changes: Value::Null,
            }));
        Ok(category)
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    pub async fn list_suppliers(&self) -> Vec<Supplier> {
        self.store.read().await.suppliers().to_vec()
    }

    pub async fn create_supplier(&self, input: SupplierInput) -> AppResult<Supplier> {
        let supplier = self.store.write().await.create_supplier(input)?;
        tracing::info!(id = %supplier.id, name = %supplier.name, "Supplier created");

        self.store
            .record_audit_entry(TransactionEvent::SupplierAdded(SupplierDetails {
                supplier_id: supplier.id,
                supplier_name: supplier.name.clone(),
                contact: supplier.contact.clone(),
                email: supplier.email.clone(),
                phone: supplier.phone.clone(),
                changes: Value::Null,
            }));
        Ok(supplier)
    }

    pub async fn update_supplier(&self, id: Uuid, input: SupplierInput) -> AppResult<Supplier> {
        let changes = changes(&input);
        let supplier = self.store.write().await.update_supplier(id, input)?;
        tracing::info!(id = %supplier.id, "Supplier updated");

        self.store
            .record_audit_entry(TransactionEvent::SupplierUpdated(SupplierDetails {
                supplier_id: supplier.id,
                supplier_name: supplier.name.clone(),
                contact: None,
                email: None,
                phone: None,
                changes,
            }));
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: Uuid) -> AppResult<Supplier> {
        let supplier = self.store.write().await.delete_supplier(id)?;
        tracing::info!(id = %supplier.id, "Supplier deleted");

        self.store
            .record_audit_entry(TransactionEvent::SupplierDeleted(SupplierDetails {
                supplier_id: supplier.id,
                supplier_name: supplier.name.clone(),
                contact: None,
                email: None,
                phone: None,
                changes: Value::Null,
            }));
        Ok(supplier)
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn list_items(&self) -> Vec<Item> {
        self.store.read().await.items().to_vec()
    }

    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<Item> {
        let (item, category_name, supplier_name) = {
            let mut tables = self.store.write().await;
            let item = tables.create_item(input, Utc::now())?;
            let category_name = tables.category_name(item.category_id);
            let supplier_name = tables.supplier_name(item.supplier_id);
            (item, category_name, supplier_name)
        };
        tracing::info!(id = %item.id, name = %item.name, "Item created");

        self.store
            .record_audit_entry(TransactionEvent::ItemAdded(ItemDetails {
                item_id: item.id,
                item_name: item.name.clone(),
                category_name,
                supplier_name,
                unit: Some(item.unit.clone()),
                min_stock: Some(item.min_stock),
                max_stock: Some(item.max_stock),
                changes: Value::Null,
            }));
        Ok(item)
    }

    pub async fn update_item(&self, id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        let changes = changes(&input);
        let (item, category_name, supplier_name) = {
            let mut tables = self.store.write().await;
            let item = tables.update_item(id, input)?;
            let category_name = tables.category_name(item.category_id);
            let supplier_name = tables.supplier_name(item.supplier_id);
            (item, category_name, supplier_name)
        };
        tracing::info!(id = %item.id, "Item updated");

        self.store
            .record_audit_entry(TransactionEvent::ItemUpdated(ItemDetails {
                item_id: item.id,
                item_name: item.name.clone(),
                category_name,
                supplier_name,
                unit: None,
                min_stock: None,
                max_stock: None,
                changes,
            }));
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> AppResult<Item> {
        let item = self.store.write().await.delete_item(id)?;
        tracing::info!(id = %item.id, name = %item.name, "Item deleted");

        self.store
            .record_audit_entry(TransactionEvent::ItemDeleted(ItemDetails {
                item_id: item.id,
                item_name: item.name.clone(),
                category_name: None,
                supplier_name: None,
                unit: None,
                min_stock: None,
                max_stock: None,
                changes: Value::Null,
            }));
        Ok(item)
    }
}
