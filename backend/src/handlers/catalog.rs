//! HTTP handlers for categories, suppliers and items

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{
    Category, CategoryInput, CreateItemInput, Item, Supplier, SupplierInput, UpdateItemInput,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::CatalogService;
use crate::AppState;

// ============================================================================
// Categories
// ============================================================================

/// List all categories
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    let service = CatalogService::new(state.store);
    Json(service.list_categories().await)
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.store);
    let category = service.create_category(input).await?;
    Ok(Json(category))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.store);
    let category = service.update_category(category_id, input).await?;
    Ok(Json(category))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.store);
    let category = service.delete_category(category_id).await?;
    Ok(Json(category))
}

// ============================================================================
// Suppliers
// ============================================================================

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> Json<Vec<Supplier>> {
    let service = CatalogService::new(state.store);
    Json(service.list_suppliers().await)
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = CatalogService::new(state.store);
    let supplier = service.create_supplier(input).await?;
    Ok(Json(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = CatalogService::new(state.store);
    let supplier = service.update_supplier(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = CatalogService::new(state.store);
    let supplier = service.delete_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

// ============================================================================
// Items
// ============================================================================

/// List all items
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    let service = CatalogService::new(state.store);
    Json(service.list_items().await)
}

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<Item>> {
    let service = CatalogService::new(state.store);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Update an item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<Item>> {
    let service = CatalogService::new(state.store);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Delete an item and its stock rows
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    let service = CatalogService::new(state.store);
    let item = service.delete_item(item_id).await?;
    Ok(Json(item))
}
