//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub items: usize,
    pub locations: usize,
    pub audit_entries: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (items, locations) = {
        let tables = state.store.read().await;
        (tables.items().len(), tables.locations().len())
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        items,
        locations,
        audit_entries: state.store.transactions().len(),
    })
}
