//! Route definitions for the Coffee Inventory API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/locations", location_routes())
        .nest("/location-types", location_type_routes())
        .nest("/categories", category_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/items", item_routes())
        .route("/stock", get(handlers::list_stock).put(handlers::set_stock))
        .nest("/transactions", transaction_routes())
        .route("/dashboard", get(handlers::get_dashboard))
        .nest("/alerts", alert_routes())
        .nest("/analysis", analysis_routes())
}

/// Location management and assignment routes
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_locations).post(handlers::create_location))
        .route("/health", get(handlers::get_location_health))
        .route(
            "/:location_id",
            put(handlers::update_location).delete(handlers::delete_location),
        )
        // Item assignments
        .route(
            "/:location_id/assignments",
            get(handlers::get_location_assignment).post(handlers::assign_items),
        )
        .route("/:location_id/assignments/copy", post(handlers::copy_assignments))
}

/// Location type registry routes
fn location_type_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_location_types).post(handlers::create_location_type),
        )
        .route(
            "/:type_id",
            put(handlers::update_location_type).delete(handlers::delete_location_type),
        )
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route("/health", get(handlers::get_category_health))
        .route(
            "/:category_id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
}

/// Item routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/:item_id",
            put(handlers::update_item).delete(handlers::delete_item),
        )
}

/// Transaction log routes
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transactions))
        .route("/export", get(handlers::export_transactions))
}

/// Stock alert routes
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route("/board", get(handlers::get_alert_board))
        .route("/export", get(handlers::export_alerts))
}

/// Stock movement analysis routes
fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_analysis))
        .route("/export", get(handlers::export_analysis))
}
