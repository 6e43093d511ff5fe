//! Error types for the shared inventory crate

use thiserror::Error;

/// Errors raised while ingesting records or producing exports
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InventoryError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unknown analysis period: {0}")]
    UnknownPeriod(String),

    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;
