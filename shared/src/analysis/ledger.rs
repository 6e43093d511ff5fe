//! Transaction log view: filtering and summary counts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionType};
use crate::types::LogDateFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionLogFilter {
    /// `None` shows every type
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default)]
    pub date: LogDateFilter,
    /// Case-insensitive match against type, user and details
    #[serde(default)]
    pub search: Option<String>,
}

impl TransactionLogFilter {
    fn matches(&self, transaction: &Transaction, since: Option<DateTime<Utc>>, needle: Option<&str>) -> bool {
        if let Some(wanted) = self.transaction_type {
            if transaction.transaction_type() != wanted {
                return false;
            }
        }
        if let Some(since) = since {
            if transaction.timestamp < since {
                return false;
            }
        }
        match needle {
            Some(needle) => {
                transaction.transaction_type().as_str().to_lowercase().contains(needle)
                    || transaction.user_name.to_lowercase().contains(needle)
                    || transaction
                        .event
                        .details()
                        .to_string()
                        .to_lowercase()
                        .contains(needle)
            }
            None => true,
        }
    }
}

/// Matching transactions, newest first.
///
/// Entries with the same timestamp keep reverse append order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionLogFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Transaction> {
    let since = filter.date.since(now);
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<&Transaction> = transactions
        .iter()
        .rev()
        .filter(|t| filter.matches(t, since, needle.as_deref()))
        .collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    matching
}

/// Counts shown above the transaction log
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    pub total: usize,
    pub stock_updates: usize,
    pub items_added: usize,
    pub items_deleted: usize,
}

impl LogSummary {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(LogSummary::default(), |mut summary, transaction| {
                summary.total += 1;
                match transaction.transaction_type() {
                    TransactionType::StockUpdated => summary.stock_updates += 1,
                    TransactionType::ItemAdded => summary.items_added += 1,
                    TransactionType::ItemDeleted => summary.items_deleted += 1,
                    _ => {}
                }
                summary
            })
    }
}

/// One row of the transaction log as shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub label: String,
    pub description: String,
}

impl From<&Transaction> for LogEntry {
    fn from(transaction: &Transaction) -> Self {
        Self {
            label: transaction.transaction_type().label().to_string(),
            description: transaction.description(),
            transaction: transaction.clone(),
        }
    }
}
