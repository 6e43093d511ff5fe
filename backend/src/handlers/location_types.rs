//! HTTP handlers for the location type registry

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{LocationType, LocationTypeInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::LocationTypeService;
use crate::AppState;

/// List all location types
pub async fn list_location_types(State(state): State<AppState>) -> Json<Vec<LocationType>> {
    let service = LocationTypeService::new(state.store);
    Json(service.list().await)
}

/// Create a location type
pub async fn create_location_type(
    State(state): State<AppState>,
    Json(input): Json<LocationTypeInput>,
) -> AppResult<Json<LocationType>> {
    let service = LocationTypeService::new(state.store);
    let location_type = service.create(input).await?;
    Ok(Json(location_type))
}

/// Replace a location type, renaming it on every location that uses it
pub async fn update_location_type(
    State(state): State<AppState>,
    Path(type_id): Path<Uuid>,
    Json(input): Json<LocationTypeInput>,
) -> AppResult<Json<LocationType>> {
    let service = LocationTypeService::new(state.store);
    let location_type = service.update(type_id, input).await?;
    Ok(Json(location_type))
}

/// Delete an unused custom location type
pub async fn delete_location_type(
    State(state): State<AppState>,
    Path(type_id): Path<Uuid>,
) -> AppResult<Json<LocationType>> {
    let service = LocationTypeService::new(state.store);
    let location_type = service.delete(type_id).await?;
    Ok(Json(location_type))
}
