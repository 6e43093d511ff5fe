//! HTTP handlers for the transaction log

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{LogDateFilter, TransactionLogFilter, TransactionType};

use super::analysis::csv_attachment;
use crate::error::AppResult;
use crate::services::{AnalysisService, TransactionLogView};
use crate::AppState;

/// Query parameters for the transaction log
#[derive(Debug, Default, Deserialize)]
pub struct TransactionLogQuery {
    /// Transaction type, or `all`
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub date: Option<LogDateFilter>,
    pub search: Option<String>,
}

impl TransactionLogQuery {
    pub fn into_filter(self) -> AppResult<TransactionLogFilter> {
        let transaction_type = match self.transaction_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(raw.parse::<TransactionType>()?),
        };
        Ok(TransactionLogFilter {
            transaction_type,
            date: self.date.unwrap_or_default(),
            search: self.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Filtered transaction log, newest first, with summary counts
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionLogQuery>,
) -> AppResult<Json<TransactionLogView>> {
    let filter = query.into_filter()?;
    let service = AnalysisService::new(state.store, state.config.analysis.top_n);
    Ok(Json(service.transaction_log(&filter, Utc::now()).await))
}

/// Download the filtered transaction log as CSV
pub async fn export_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionLogQuery>,
) -> AppResult<Response> {
    let filter = query.into_filter()?;
    let service = AnalysisService::new(state.store, state.config.analysis.top_n);
    let report = service.export_transaction_log(&filter, Utc::now()).await?;
    tracing::info!(filename = %report.filename, "Transaction log exported");
    Ok(csv_attachment(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_means_no_type_filter() {
        let query = TransactionLogQuery {
            transaction_type: Some("all".to_string()),
            ..TransactionLogQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert!(filter.transaction_type.is_none());
        assert_eq!(filter.date, LogDateFilter::All);
    }

    #[test]
    fn test_type_is_parsed() {
        let query = TransactionLogQuery {
            transaction_type: Some("STOCK_UPDATED".to_string()),
            search: Some("  ".to_string()),
            ..TransactionLogQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.transaction_type, Some(TransactionType::StockUpdated));
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let query = TransactionLogQuery {
            transaction_type: Some("REFUND".to_string()),
            ..TransactionLogQuery::default()
        };
        assert!(query.into_filter().is_err());
    }
}
