//! CSV exports of the analysis, alert and transaction log views
//!
//! Every field is double quoted, header included, and records end with a
//! bare `\n`. Quantities are written with [`format_quantity`] so a file
//! matches what the dashboard shows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::alerts::StockAlert;
use super::trend::StockAnalysis;
use crate::error::{InventoryError, InventoryResult};
use crate::format::format_quantity;
use crate::models::Transaction;

pub const ANALYSIS_HEADER: [&str; 9] = [
    "Item Name",
    "Unit",
    "Total Restocked",
    "Total Consumed",
    "Restock Count",
    "Consumption Count",
    "Daily Avg Consumption",
    "Daily Avg Restock",
    "Trend",
];

pub const ALERTS_HEADER: [&str; 4] = ["Item Name", "Severity", "Current Stock", "Min Stock"];

pub const TRANSACTION_LOG_HEADER: [&str; 5] = ["Timestamp", "Type", "User", "Description", "Details"];

/// Timestamp layout of the transaction log, e.g. `Jun 15, 2024, 09:30:00 AM`
pub const LOG_TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %I:%M:%S %p";

/// A rendered CSV file and the name to save it under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsvReport {
    pub filename: String,
    pub content: String,
}

impl CsvReport {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

fn write_csv<I>(header: &[&str], rows: I) -> InventoryResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(header)
        .map_err(|e| InventoryError::Export(format!("CSV write error: {}", e)))?;
    for row in rows {
        wtr.write_record(&row)
            .map_err(|e| InventoryError::Export(format!("CSV write error: {}", e)))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| InventoryError::Export(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| InventoryError::Export(format!("UTF-8 conversion error: {}", e)))
}

/// `stock-analysis-<period>-<date>.csv`, one row per analysed item
pub fn export_analysis(analysis: &StockAnalysis, date: NaiveDate) -> InventoryResult<CsvReport> {
    let rows = analysis.item_analysis.iter().map(|item| {
        vec![
            item.item_name.clone(),
            item.unit.clone(),
            format_quantity(item.total_restocked),
            format_quantity(item.total_consumed),
            item.restock_count.to_string(),
            item.consumption_count.to_string(),
            format_quantity(item.daily_consumption),
            format_quantity(item.daily_restock),
            item.trend.to_string(),
        ]
    });

    Ok(CsvReport {
        filename: format!("stock-analysis-{}-{}.csv", analysis.period, date.format("%Y-%m-%d")),
        content: write_csv(&ANALYSIS_HEADER, rows)?,
    })
}

/// `stock-alerts-<date>.csv`
pub fn export_alerts(alerts: &[StockAlert], date: NaiveDate) -> InventoryResult<CsvReport> {
    let rows = alerts.iter().map(|alert| {
        vec![
            alert.item_name.clone(),
            alert.severity.as_str().to_string(),
            format_quantity(alert.current_stock),
            format_quantity(alert.min_stock),
        ]
    });

    Ok(CsvReport {
        filename: format!("stock-alerts-{}.csv", date.format("%Y-%m-%d")),
        content: write_csv(&ALERTS_HEADER, rows)?,
    })
}

/// `transaction-log-<date>.csv`, rows in the order given
pub fn export_transaction_log<'a, I>(transactions: I, date: NaiveDate) -> InventoryResult<CsvReport>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let rows = transactions.into_iter().map(|transaction| {
        vec![
            transaction.timestamp.format(LOG_TIMESTAMP_FORMAT).to_string(),
            transaction.transaction_type().label().to_string(),
            transaction.user_name.clone(),
            transaction.description(),
            transaction.event.details().to_string(),
        ]
    });

    Ok(CsvReport {
        filename: format!("transaction-log-{}.csv", date.format("%Y-%m-%d")),
        content: write_csv(&TRANSACTION_LOG_HEADER, rows)?,
    })
}
