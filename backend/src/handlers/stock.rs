//! HTTP handlers for stock levels and location assignments

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{LocationAssignment, SetStockInput, StockLevel};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::{
    AssignItemsInput, AssignmentOutcome, CopyAssignmentsInput, StockService, StockUpdate,
};
use crate::AppState;

/// List every stock row
pub async fn list_stock(State(state): State<AppState>) -> Json<Vec<StockLevel>> {
    let service = StockService::new(state.store);
    Json(service.list_stock().await)
}

/// Set the quantity of an item at a location
pub async fn set_stock(
    State(state): State<AppState>,
    Json(input): Json<SetStockInput>,
) -> AppResult<Json<StockUpdate>> {
    let service = StockService::new(state.store);
    let update = service.set_stock(input).await?;
    Ok(Json(update))
}

/// Assigned and unassigned items of a location
pub async fn get_location_assignment(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<LocationAssignment>> {
    let service = StockService::new(state.store);
    let assignment = service.assignment(location_id).await?;
    Ok(Json(assignment))
}

/// Assign items to a location with quantity 0
pub async fn assign_items(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(input): Json<AssignItemsInput>,
) -> AppResult<Json<AssignmentOutcome>> {
    let service = StockService::new(state.store);
    let outcome = service.assign_items(location_id, input).await?;
    Ok(Json(outcome))
}

/// Copy item assignments from another location
pub async fn copy_assignments(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(input): Json<CopyAssignmentsInput>,
) -> AppResult<Json<AssignmentOutcome>> {
    let service = StockService::new(state.store);
    let outcome = service.copy_assignments(location_id, input).await?;
    Ok(Json(outcome))
}
