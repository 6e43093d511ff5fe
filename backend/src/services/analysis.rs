//! Analysis service: dashboard, alerts, trends, health and exports
//!
//! Stock views are computed under the store's read lock. Trend and log views
//! read the audit log only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    alerts_from_table, analyze_stock_movements, category_health, export_alerts, export_analysis,
    export_transaction_log, filter_transactions, location_health, AlertBoard, AnalysisFilter,
    CategoryHealth, CsvReport, Dashboard, LocationHealth, LogEntry, LogSummary, StockAlert,
    StockAnalysis, TransactionLogFilter,
};

use crate::error::AppResult;
use crate::store::InventoryStore;

/// Transaction log page
#[derive(Debug, Clone, Serialize)]
pub struct TransactionLogView {
    pub entries: Vec<LogEntry>,
    pub summary: LogSummary,
}

#[derive(Clone)]
pub struct AnalysisService {
    store: InventoryStore,
    top_n: usize,
}

impl AnalysisService {
    pub fn new(store: InventoryStore, top_n: usize) -> Self {
        Self { store, top_n }
    }

    pub async fn dashboard(&self) -> Dashboard {
        self.store.read().await.aggregator().dashboard()
    }

    pub async fn alerts(&self) -> Vec<StockAlert> {
        let tables = self.store.read().await;
        alerts_from_table(tables.items(), &tables.stock_table())
    }

    pub async fn alert_board(&self) -> AlertBoard {
        AlertBoard::build(&self.store.read().await.aggregator())
    }

    /// Trend analysis; the configured top list length overrides the filter's
    pub async fn analysis(&self, filter: AnalysisFilter, now: DateTime<Utc>) -> StockAnalysis {
        let filter = AnalysisFilter {
            top_n: self.top_n,
            ..filter
        };
        let transactions = self.store.transactions();
        let analysis = analyze_stock_movements(&transactions, &filter, now);
        tracing::debug!(
            period = %filter.period,
            items = analysis.summary.total_items,
            transactions = analysis.summary.total_transactions,
            "Stock analysis computed"
        );
        analysis
    }

    pub async fn location_health(&self) -> Vec<LocationHealth> {
        location_health(&self.store.read().await.aggregator())
    }

    pub async fn category_health(&self) -> Vec<CategoryHealth> {
        let tables = self.store.read().await;
        category_health(&tables.aggregator(), tables.categories())
    }

    pub async fn transaction_log(&self, filter: &TransactionLogFilter, now: DateTime<Utc>) -> TransactionLogView {
        let transactions = self.store.transactions();
        let matching = filter_transactions(&transactions, filter, now);
        TransactionLogView {
            summary: LogSummary::from_transactions(matching.iter().copied()),
            entries: matching.into_iter().map(LogEntry::from).collect(),
        }
    }

    // ========================================================================
    // Exports
    // ========================================================================

    pub async fn export_analysis(&self, filter: AnalysisFilter, now: DateTime<Utc>) -> AppResult<CsvReport> {
        let analysis = self.analysis(filter, now).await;
        Ok(export_analysis(&analysis, now.date_naive())?)
    }

    pub async fn export_alerts(&self, now: DateTime<Utc>) -> AppResult<CsvReport> {
        let alerts = self.alerts().await;
        Ok(export_alerts(&alerts, now.date_naive())?)
    }

    pub async fn export_transaction_log(
        &self,
        filter: &TransactionLogFilter,
        now: DateTime<Utc>,
    ) -> AppResult<CsvReport> {
        let transactions = self.store.transactions();
        let matching = filter_transactions(&transactions, filter, now);
        Ok(export_transaction_log(matching, now.date_naive())?)
    }
}
