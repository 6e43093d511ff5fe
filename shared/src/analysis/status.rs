//! Stock status classification

use serde::{Deserialize, Serialize};

use crate::format::{percentage, sanitize_quantity};

/// Health bucket of one item's total stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Out,
    Critical,
    Low,
    High,
    Good,
}

/// Share of capacity at or below which stock is `low`
pub const LOW_STOCK_PERCENT: f64 = 25.0;
/// Share of capacity at or above which stock is `high`
pub const HIGH_STOCK_PERCENT: f64 = 90.0;

impl StockStatus {
    pub const ALL: [StockStatus; 5] = [
        StockStatus::Out,
        StockStatus::Critical,
        StockStatus::Low,
        StockStatus::High,
        StockStatus::Good,
    ];

    /// Sort key for "needs attention" lists, higher is more urgent
    pub fn urgency(&self) -> u8 {
        match self {
            StockStatus::Out => 4,
            StockStatus::Critical => 3,
            StockStatus::Low => 2,
            StockStatus::High => 1,
            StockStatus::Good => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Out => "out",
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::High => "high",
            StockStatus::Good => "good",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Out => "Out of Stock",
            StockStatus::Critical => "Critical",
            StockStatus::Low => "Low Stock",
            StockStatus::High => "High Stock",
            StockStatus::Good => "Good Stock",
        }
    }

    /// Good and high stock both count as healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, StockStatus::Good | StockStatus::High)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage of `max_stock` held; 0 when the item has no capacity
pub fn stock_percentage(current_stock: f64, max_stock: f64) -> f64 {
    percentage(sanitize_quantity(current_stock), sanitize_quantity(max_stock))
}

/// Stock percentage clamped to 100 for progress bars
pub fn fill_percentage(current_stock: f64, max_stock: f64) -> f64 {
    stock_percentage(current_stock, max_stock).min(100.0)
}

/// Classify an item's total stock against its thresholds.
///
/// First match wins: empty, at or under minimum, at or under 25% of
/// capacity, at or over 90% of capacity, otherwise good. A zero capacity
/// makes every percentage 0, so positive stock above the minimum reads as
/// low.
pub fn classify_stock(current_stock: f64, min_stock: f64, max_stock: f64) -> StockStatus {
    let current = sanitize_quantity(current_stock);
    let min = sanitize_quantity(min_stock);

    if current == 0.0 {
        return StockStatus::Out;
    }
    if current <= min {
        return StockStatus::Critical;
    }

    let pct = stock_percentage(current, max_stock);
    if pct <= LOW_STOCK_PERCENT {
        StockStatus::Low
    } else if pct >= HIGH_STOCK_PERCENT {
        StockStatus::High
    } else {
        StockStatus::Good
    }
}
