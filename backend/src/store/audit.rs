//! Append-only audit log of domain mutations

use std::sync::RwLock;

use shared::Transaction;
use thiserror::Error;

/// Failure to record an audit entry. Never surfaced to API callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditError {
    #[error("Audit log unavailable: {0}")]
    Unavailable(String),

    #[error("Audit entry rejected: {0}")]
    Rejected(String),
}

/// Destination for audit entries
pub trait AuditSink: Send + Sync {
    /// Append one entry and return it as stored
    fn append(&self, entry: Transaction) -> Result<Transaction, AuditError>;

    /// Every stored entry, oldest first
    fn entries(&self) -> Result<Vec<Transaction>, AuditError>;
}

/// Audit log held in memory
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<Transaction>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from entries loaded elsewhere, e.g. a seed snapshot
    pub fn with_entries(entries: Vec<Transaction>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, entry: Transaction) -> Result<Transaction, AuditError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditError::Unavailable("audit log lock poisoned".to_string()))?;
        if entries.iter().any(|existing| existing.id == entry.id) {
            return Err(AuditError::Rejected(format!("duplicate entry id {}", entry.id)));
        }
        entries.push(entry.clone());
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<Transaction>, AuditError> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .map_err(|_| AuditError::Unavailable("audit log lock poisoned".to_string()))
    }
}
