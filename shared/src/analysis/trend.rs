//! Consumption and restock trend analysis over the stock movement history

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::{round_to_tenth, sanitize_quantity};
use crate::models::{StockMovement, Transaction};
use crate::types::AnalysisPeriod;

/// Default length of each top performers list
pub const DEFAULT_TOP_N: usize = 5;

/// One side must exceed the other by this factor to count as a trend
pub const TRAJECTORY_FACTOR: f64 = 1.2;

/// Net direction of an item's stock over the window.
///
/// Describes whether restocking or consumption dominated, not demand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StockTrajectory {
    Increasing,
    Declining,
    #[default]
    Stable,
}

impl StockTrajectory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockTrajectory::Increasing => "increasing",
            StockTrajectory::Declining => "declining",
            StockTrajectory::Stable => "stable",
        }
    }
}

impl std::fmt::Display for StockTrajectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify net stock direction; both comparisons are strict
pub fn classify_trajectory(total_restocked: f64, total_consumed: f64) -> StockTrajectory {
    if total_consumed > total_restocked * TRAJECTORY_FACTOR {
        StockTrajectory::Declining
    } else if total_restocked > total_consumed * TRAJECTORY_FACTOR {
        StockTrajectory::Increasing
    } else {
        StockTrajectory::Stable
    }
}

/// Which movements to analyse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnalysisFilter {
    #[serde(default)]
    pub period: AnalysisPeriod,
    #[serde(default)]
    pub item_id: Option<Uuid>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for AnalysisFilter {
    fn default() -> Self {
        Self {
            period: AnalysisPeriod::default(),
            item_id: None,
            location_id: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalysisFilter {
    pub fn for_period(period: AnalysisPeriod) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    fn matches(&self, transaction: &Transaction, movement: &StockMovement, cutoff: DateTime<Utc>) -> bool {
        transaction.timestamp >= cutoff
            && self.item_id.map_or(true, |id| movement.item_id == id)
            && self
                .location_id
                .map_or(true, |id| movement.location_id == Some(id))
    }
}

/// Restock/consumption tallies of one item at one location
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationActivity {
    pub restocked: f64,
    pub consumed: f64,
    pub transactions: usize,
}

/// Restock/consumption tallies of one item on one day
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub restocked: f64,
    pub consumed: f64,
    pub transactions: usize,
}

/// Tallies of all items on one day
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub total_restocked: f64,
    pub total_consumed: f64,
    pub transactions: usize,
}

/// Per-item trend over the analysis window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemTrend {
    pub item_id: Uuid,
    pub item_name: String,
    pub unit: String,
    pub total_restocked: f64,
    pub total_consumed: f64,
    pub restock_count: usize,
    pub consumption_count: usize,
    /// Keyed by location name as recorded on the movement
    pub locations: BTreeMap<String, LocationActivity>,
    /// Keyed by UTC calendar date
    pub daily_activity: BTreeMap<NaiveDate, DailyActivity>,
    pub average_restock: f64,
    pub average_consumption: f64,
    pub daily_consumption: f64,
    pub daily_restock: f64,
    pub trend: StockTrajectory,
}

impl ItemTrend {
    fn new(movement: &StockMovement) -> Self {
        Self {
            item_id: movement.item_id,
            item_name: movement.item_name.clone(),
            unit: movement.unit.clone(),
            total_restocked: 0.0,
            total_consumed: 0.0,
            restock_count: 0,
            consumption_count: 0,
            locations: BTreeMap::new(),
            daily_activity: BTreeMap::new(),
            average_restock: 0.0,
            average_consumption: 0.0,
            daily_consumption: 0.0,
            daily_restock: 0.0,
            trend: StockTrajectory::Stable,
        }
    }

    pub fn event_count(&self) -> usize {
        self.restock_count + self.consumption_count
    }

    fn record(&mut self, movement: &StockMovement, date: NaiveDate) {
        let change = sanitize_quantity(movement.quantity_change);
        let location = self
            .locations
            .entry(movement.location_name.clone())
            .or_default();
        let day = self.daily_activity.entry(date).or_default();

        if change > 0.0 {
            self.total_restocked += change;
            self.restock_count += 1;
            location.restocked += change;
            day.restocked += change;
        } else if change < 0.0 {
            self.total_consumed += change.abs();
            self.consumption_count += 1;
            location.consumed += change.abs();
            day.consumed += change.abs();
        }
        location.transactions += 1;
        day.transactions += 1;
    }

    fn finish(&mut self) {
        let active_days = self.daily_activity.len().max(1) as f64;

        self.average_restock = if self.restock_count > 0 {
            self.total_restocked / self.restock_count as f64
        } else {
            0.0
        };
        self.average_consumption = if self.consumption_count > 0 {
            self.total_consumed / self.consumption_count as f64
        } else {
            0.0
        };
        self.daily_consumption = self.total_consumed / active_days;
        self.daily_restock = self.total_restocked / active_days;
        self.trend = classify_trajectory(self.total_restocked, self.total_consumed);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_items: usize,
    pub total_restock_events: usize,
    pub total_consumption_events: usize,
    pub total_transactions: usize,
    /// Rounded to one decimal
    pub average_restocks_per_item: f64,
    /// Rounded to one decimal
    pub average_consumptions_per_item: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformers {
    pub top_consumed: Vec<ItemTrend>,
    pub top_restocked: Vec<ItemTrend>,
    pub most_active: Vec<ItemTrend>,
}

/// Result of a trend analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub period: AnalysisPeriod,
    /// Every analysed item, in order of first appearance in the history
    pub item_analysis: Vec<ItemTrend>,
    pub daily_data: BTreeMap<NaiveDate, DailyTotals>,
    pub summary: AnalysisSummary,
    pub top_performers: TopPerformers,
    /// True when no movement survived filtering
    pub is_empty: bool,
}

impl StockAnalysis {
    pub fn empty(period: AnalysisPeriod) -> Self {
        Self {
            period,
            item_analysis: Vec::new(),
            daily_data: BTreeMap::new(),
            summary: AnalysisSummary::default(),
            top_performers: TopPerformers::default(),
            is_empty: true,
        }
    }

    pub fn item(&self, item_id: Uuid) -> Option<&ItemTrend> {
        self.item_analysis.iter().find(|trend| trend.item_id == item_id)
    }
}

/// Analyse stock movements inside the filter's window ending at `now`
pub fn analyze_stock_movements(
    transactions: &[Transaction],
    filter: &AnalysisFilter,
    now: DateTime<Utc>,
) -> StockAnalysis {
    let cutoff = filter.period.cutoff(now);

    let mut items: Vec<ItemTrend> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut daily_data: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();
    let mut total_transactions = 0;

    let movements = transactions.iter().filter_map(|transaction| {
        transaction
            .event
            .stock_movement()
            .filter(|movement| filter.matches(transaction, movement, cutoff))
            .map(|movement| (transaction, movement))
    });

    for (transaction, movement) in movements {
        total_transactions += 1;
        let date = transaction.timestamp.date_naive();

        let position = *positions.entry(movement.item_id).or_insert_with(|| {
            items.push(ItemTrend::new(movement));
            items.len() - 1
        });
        items[position].record(movement, date);

        let change = sanitize_quantity(movement.quantity_change);
        let day = daily_data.entry(date).or_default();
        if change > 0.0 {
            day.total_restocked += change;
        } else if change < 0.0 {
            day.total_consumed += change.abs();
        }
        day.transactions += 1;
    }

    if items.is_empty() {
        return StockAnalysis::empty(filter.period);
    }

    for item in &mut items {
        item.finish();
    }

    let total_items = items.len();
    let total_restock_events: usize = items.iter().map(|i| i.restock_count).sum();
    let total_consumption_events: usize = items.iter().map(|i| i.consumption_count).sum();

    let summary = AnalysisSummary {
        total_items,
        total_restock_events,
        total_consumption_events,
        total_transactions,
        average_restocks_per_item: round_to_tenth(total_restock_events as f64 / total_items as f64),
        average_consumptions_per_item: round_to_tenth(
            total_consumption_events as f64 / total_items as f64,
        ),
    };

    let top_performers = TopPerformers {
        top_consumed: top_by(&items, filter.top_n, |i| i.total_consumed),
        top_restocked: top_by(&items, filter.top_n, |i| i.total_restocked),
        most_active: top_by(&items, filter.top_n, |i| i.event_count() as f64),
    };

    StockAnalysis {
        period: filter.period,
        item_analysis: items,
        daily_data,
        summary,
        top_performers,
        is_empty: false,
    }
}

/// Highest `n` items by `key`; ties keep first-seen order
fn top_by(items: &[ItemTrend], n: usize, key: impl Fn(&ItemTrend) -> f64) -> Vec<ItemTrend> {
    let mut ranked: Vec<&ItemTrend> = items.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}
