//! Common types used across the platform

use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Time window selector for stock movement analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPeriod {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl AnalysisPeriod {
    pub fn days(&self) -> i64 {
        match self {
            AnalysisPeriod::Day => 1,
            AnalysisPeriod::Week => 7,
            AnalysisPeriod::Month => 30,
            AnalysisPeriod::Quarter => 90,
            AnalysisPeriod::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPeriod::Day => "day",
            AnalysisPeriod::Week => "week",
            AnalysisPeriod::Month => "month",
            AnalysisPeriod::Quarter => "quarter",
            AnalysisPeriod::Year => "year",
        }
    }

    /// Earliest timestamp still inside the window ending at `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

impl FromStr for AnalysisPeriod {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(AnalysisPeriod::Day),
            "week" => Ok(AnalysisPeriod::Week),
            "month" => Ok(AnalysisPeriod::Month),
            "quarter" => Ok(AnalysisPeriod::Quarter),
            "year" => Ok(AnalysisPeriod::Year),
            other => Err(InventoryError::UnknownPeriod(other.to_string())),
        }
    }
}

impl std::fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date filter used by the transaction log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogDateFilter {
    #[default]
    All,
    /// Since midnight UTC today
    Today,
    Week,
    /// One calendar month back
    Month,
}

impl LogDateFilter {
    /// Lower bound for transaction timestamps, `None` when unbounded
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            LogDateFilter::All => None,
            LogDateFilter::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc()),
            LogDateFilter::Week => Some(now - Duration::days(7)),
            LogDateFilter::Month => now.checked_sub_months(Months::new(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_days() {
        assert_eq!(AnalysisPeriod::Day.days(), 1);
        assert_eq!(AnalysisPeriod::Week.days(), 7);
        assert_eq!(AnalysisPeriod::Month.days(), 30);
        assert_eq!(AnalysisPeriod::Quarter.days(), 90);
        assert_eq!(AnalysisPeriod::Year.days(), 365);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Quarter".parse::<AnalysisPeriod>().unwrap(), AnalysisPeriod::Quarter);
        assert!("fortnight".parse::<AnalysisPeriod>().is_err());
        assert_eq!(AnalysisPeriod::default(), AnalysisPeriod::Week);
    }

    #[test]
    fn test_period_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            AnalysisPeriod::Week.cutoff(now),
            Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_log_date_filter_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 30, 0).unwrap();
        assert_eq!(LogDateFilter::All.since(now), None);
        assert_eq!(
            LogDateFilter::Today.since(now),
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(
            LogDateFilter::Week.since(now),
            Some(Utc.with_ymd_and_hms(2024, 3, 24, 15, 30, 0).unwrap())
        );
        // Clamped to the last day of February
        assert_eq!(
            LogDateFilter::Month.since(now),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 15, 30, 0).unwrap())
        );
    }
}
