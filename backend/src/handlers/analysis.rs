//! HTTP handlers for the dashboard, alerts, trend analysis and health views

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{
    AlertBoard, AnalysisFilter, AnalysisPeriod, CategoryHealth, CsvReport, Dashboard,
    LocationHealth, StockAlert, StockAnalysis,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::AnalysisService;
use crate::AppState;

/// Query parameters for the analysis endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// One of day, week, month, quarter or year; week when absent
    pub period: Option<String>,
    /// Item id, or `all`
    pub item_id: Option<String>,
    /// Location id, or `all`
    pub location_id: Option<String>,
}

/// Blank and `all` select everything
fn optional_id(field: &str, raw: Option<&str>) -> AppResult<Option<Uuid>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| AppError::invalid(field, format!("Invalid id: {}", value))),
    }
}

impl AnalysisQuery {
    pub fn into_filter(self) -> AppResult<AnalysisFilter> {
        let period = match self.period.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<AnalysisPeriod>()?,
            _ => AnalysisPeriod::default(),
        };
        Ok(AnalysisFilter {
            period,
            item_id: optional_id("item_id", self.item_id.as_deref())?,
            location_id: optional_id("location_id", self.location_id.as_deref())?,
            ..AnalysisFilter::default()
        })
    }
}

fn analysis_service(state: &AppState) -> AnalysisService {
    AnalysisService::new(state.store.clone(), state.config.analysis.top_n)
}

/// Serve a CSV report as a file download
pub fn csv_attachment(report: CsvReport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    (
        [
            (header::CONTENT_TYPE, CsvReport::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.content,
    )
        .into_response()
}

/// Dashboard overview with per-item views and stats
pub async fn get_dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(analysis_service(&state).dashboard().await)
}

/// Low stock alerts
pub async fn list_alerts(State(state): State<AppState>) -> Json<Vec<StockAlert>> {
    Json(analysis_service(&state).alerts().await)
}

/// Alerts split into critical and warning with per-location detail
pub async fn get_alert_board(State(state): State<AppState>) -> Json<AlertBoard> {
    Json(analysis_service(&state).alert_board().await)
}

/// Download the current alerts as CSV
pub async fn export_alerts(State(state): State<AppState>) -> AppResult<Response> {
    let report = analysis_service(&state).export_alerts(Utc::now()).await?;
    tracing::info!(filename = %report.filename, "Alerts exported");
    Ok(csv_attachment(report))
}

/// Stock movement analysis for a period
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<Json<StockAnalysis>> {
    let filter = query.into_filter()?;
    let analysis = analysis_service(&state).analysis(filter, Utc::now()).await;
    Ok(Json(analysis))
}

/// Download the stock movement analysis as CSV
pub async fn export_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<Response> {
    let filter = query.into_filter()?;
    let report = analysis_service(&state)
        .export_analysis(filter, Utc::now())
        .await?;
    tracing::info!(filename = %report.filename, "Analysis exported");
    Ok(csv_attachment(report))
}

/// Health score per location
pub async fn get_location_health(State(state): State<AppState>) -> Json<Vec<LocationHealth>> {
    Json(analysis_service(&state).location_health().await)
}

/// Status breakdown per category
pub async fn get_category_health(State(state): State<AppState>) -> Json<Vec<CategoryHealth>> {
    Json(analysis_service(&state).category_health().await)
}
