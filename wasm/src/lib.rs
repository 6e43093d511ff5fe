//! WebAssembly module for the Coffee Inventory dashboard
//!
//! Provides client-side computation for:
//! - Stock status classification and quantity formatting
//! - Dashboard, alert and health views over a JSON snapshot
//! - Stock movement analysis and CSV exports
//!
//! Every binding takes and returns JSON strings. Malformed records are
//! skipped and reported on the browser console.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use shared::{
    category_health, classify_stock, export_alerts, export_analysis,
    filter_transactions, generate_alerts, location_health, parse_transactions, AnalysisFilter,
    AnalysisPeriod, InventorySnapshot, LogEntry, LogSummary, StockAggregator, TransactionLogFilter,
};

/// Result of a helper: the JSON or CSV output and the number of skipped records
type Output = Result<(String, usize), String>;

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn load_snapshot(snapshot_json: &str) -> Result<(InventorySnapshot, usize), String> {
    let load = InventorySnapshot::from_json_str(snapshot_json).map_err(|e| e.to_string())?;
    Ok((load.snapshot, load.skipped))
}

fn parse_uuid(field: &str, raw: Option<String>) -> Result<Option<Uuid>, String> {
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(id) => Uuid::parse_str(id)
            .map(Some)
            .map_err(|_| format!("Invalid {}: {}", field, id)),
    }
}

fn analysis_filter(
    period: &str,
    item_id: Option<String>,
    location_id: Option<String>,
) -> Result<AnalysisFilter, String> {
    let period: AnalysisPeriod = period.parse().map_err(|e: shared::InventoryError| e.to_string())?;
    Ok(AnalysisFilter {
        period,
        item_id: parse_uuid("item_id", item_id)?,
        location_id: parse_uuid("location_id", location_id)?,
        ..AnalysisFilter::default()
    })
}

// ============================================================================
// Host-side helpers
// ============================================================================

pub fn dashboard_json(snapshot_json: &str) -> Output {
    let (snapshot, skipped) = load_snapshot(snapshot_json)?;
    let dashboard = StockAggregator::from_snapshot(&snapshot).dashboard();
    Ok((to_json(&dashboard)?, skipped))
}

pub fn alerts_json(snapshot_json: &str) -> Output {
    let (snapshot, skipped) = load_snapshot(snapshot_json)?;
    let alerts = generate_alerts(&snapshot.items, &snapshot.stock_levels);
    Ok((to_json(&alerts)?, skipped))
}

pub fn location_health_json(snapshot_json: &str) -> Output {
    let (snapshot, skipped) = load_snapshot(snapshot_json)?;
    let health = location_health(&StockAggregator::from_snapshot(&snapshot));
    Ok((to_json(&health)?, skipped))
}

pub fn category_health_json(snapshot_json: &str) -> Output {
    let (snapshot, skipped) = load_snapshot(snapshot_json)?;
    let health = category_health(&StockAggregator::from_snapshot(&snapshot), &snapshot.categories);
    Ok((to_json(&health)?, skipped))
}

pub fn analysis_json(transactions_json: &str, filter: &AnalysisFilter, now: DateTime<Utc>) -> Output {
    let (transactions, skipped) = parse_transactions(transactions_json).map_err(|e| e.to_string())?;
    let analysis = shared::analyze_stock_movements(&transactions, filter, now);
    Ok((to_json(&analysis)?, skipped))
}

pub fn transaction_log_json(transactions_json: &str, filter_json: &str, now: DateTime<Utc>) -> Output {
    let (transactions, skipped) = parse_transactions(transactions_json).map_err(|e| e.to_string())?;
    let filter: TransactionLogFilter = if filter_json.trim().is_empty() {
        TransactionLogFilter::default()
    } else {
        serde_json::from_str(filter_json).map_err(|e| format!("Invalid filter JSON: {}", e))?
    };

    #[derive(Serialize)]
    struct LogView {
        entries: Vec<LogEntry>,
        summary: LogSummary,
    }

    let matching = filter_transactions(&transactions, &filter, now);
    let view = LogView {
        summary: LogSummary::from_transactions(matching.iter().copied()),
        entries: matching.into_iter().map(LogEntry::from).collect(),
    };
    Ok((to_json(&view)?, skipped))
}

pub fn analysis_csv(transactions_json: &str, filter: &AnalysisFilter, now: DateTime<Utc>) -> Output {
    let (transactions, skipped) = parse_transactions(transactions_json).map_err(|e| e.to_string())?;
    let analysis = shared::analyze_stock_movements(&transactions, filter, now);
    let report = export_analysis(&analysis, now.date_naive()).map_err(|e| e.to_string())?;
    Ok((report.content, skipped))
}

pub fn alerts_csv(snapshot_json: &str, now: DateTime<Utc>) -> Output {
    let (snapshot, skipped) = load_snapshot(snapshot_json)?;
    let alerts = generate_alerts(&snapshot.items, &snapshot.stock_levels);
    let report = export_alerts(&alerts, now.date_naive()).map_err(|e| e.to_string())?;
    Ok((report.content, skipped))
}

// ============================================================================
// Bindings
// ============================================================================

fn browser_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

fn finish(output: Output) -> Result<String, JsValue> {
    let (content, skipped) = output.map_err(|e| JsValue::from_str(&e))?;
    if skipped > 0 {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "Skipped {} malformed record(s)",
            skipped
        )));
    }
    Ok(content)
}

/// Classify stock into out, critical, low, high or good
#[wasm_bindgen]
pub fn classify_stock_status(current_stock: f64, min_stock: f64, max_stock: f64) -> String {
    classify_stock(current_stock, min_stock, max_stock).as_str().to_string()
}

/// Format a quantity for display
#[wasm_bindgen]
pub fn format_quantity(value: f64) -> String {
    shared::format_quantity(value)
}

/// Dashboard view from a snapshot
#[wasm_bindgen]
pub fn build_dashboard(snapshot_json: &str) -> Result<String, JsValue> {
    finish(dashboard_json(snapshot_json))
}

/// Low stock alerts from a snapshot
#[wasm_bindgen]
pub fn generate_stock_alerts(snapshot_json: &str) -> Result<String, JsValue> {
    finish(alerts_json(snapshot_json))
}

/// Health score per location
#[wasm_bindgen]
pub fn location_health_report(snapshot_json: &str) -> Result<String, JsValue> {
    finish(location_health_json(snapshot_json))
}

/// Status breakdown per category
#[wasm_bindgen]
pub fn category_health_report(snapshot_json: &str) -> Result<String, JsValue> {
    finish(category_health_json(snapshot_json))
}

/// Stock movement analysis over a transaction history
#[wasm_bindgen]
pub fn analyze_stock_movements(
    transactions_json: &str,
    period: &str,
    item_id: Option<String>,
    location_id: Option<String>,
) -> Result<String, JsValue> {
    let filter = analysis_filter(period, item_id, location_id).map_err(|e| JsValue::from_str(&e))?;
    finish(analysis_json(transactions_json, &filter, browser_now()))
}

/// Filtered transaction log with summary counts
#[wasm_bindgen]
pub fn filter_transaction_log(transactions_json: &str, filter_json: &str) -> Result<String, JsValue> {
    finish(transaction_log_json(transactions_json, filter_json, browser_now()))
}

/// Stock movement analysis as CSV
#[wasm_bindgen]
pub fn export_analysis_csv(
    transactions_json: &str,
    period: &str,
    item_id: Option<String>,
    location_id: Option<String>,
) -> Result<String, JsValue> {
    let filter = analysis_filter(period, item_id, location_id).map_err(|e| JsValue::from_str(&e))?;
    finish(analysis_csv(transactions_json, &filter, browser_now()))
}

/// Current alerts as CSV
#[wasm_bindgen]
pub fn export_alerts_csv(snapshot_json: &str) -> Result<String, JsValue> {
    finish(alerts_csv(snapshot_json, browser_now()))
}
