//! Weekly business metrics ledger rows

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::new_id;

/// One row of the weekly ledger, ordered by `week_ending`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetric {
    pub id: String,
    pub week_ending: NaiveDate,
    /// Realized revenue in whole currency units
    pub revenue: u64,
    pub new_users: u64,
    /// Label of the best performing post or item this week
    pub top_item: String,
}

impl WeeklyMetric {
    /// Whether this row is the open ledger row for the week containing `today`
    ///
    /// Rows belong to the same week when their ISO week (year and number)
    /// matches.
    pub fn covers(&self, today: NaiveDate) -> bool {
        self.week_ending.iso_week() == today.iso_week()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWeeklyMetric {
    pub week_ending: NaiveDate,
    pub revenue: u64,
    pub new_users: u64,
    pub top_item: String,
}

impl NewWeeklyMetric {
    /// An empty row for the week ending on `week_ending`
    pub fn opening(week_ending: NaiveDate) -> Self {
        Self {
            week_ending,
            revenue: 0,
            new_users: 0,
            top_item: "-".to_string(),
        }
    }

    pub(crate) fn into_metric(self) -> WeeklyMetric {
        WeeklyMetric {
            id: new_id(),
            week_ending: self.week_ending,
            revenue: self.revenue,
            new_users: self.new_users,
            top_item: self.top_item,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricPatch {
    pub revenue: Option<u64>,
    pub new_users: Option<u64>,
    pub top_item: Option<String>,
}

impl MetricPatch {
    pub(crate) fn merge_into(self, metric: &mut WeeklyMetric) {
        if let Some(revenue) = self.revenue {
            metric.revenue = revenue;
        }
        if let Some(users) = self.new_users {
            metric.new_users = users;
        }
        if let Some(top) = self.top_item {
            metric.top_item = top;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_covers_same_iso_week() {
        // 2026-01-12 is a Monday, 2026-01-18 the Sunday of the same week
        let row = NewWeeklyMetric::opening(date(2026, 1, 12)).into_metric();
        assert!(row.covers(date(2026, 1, 18)));
        assert!(!row.covers(date(2026, 1, 19)));
        assert!(!row.covers(date(2026, 1, 11)));
    }

    #[test]
    fn test_covers_across_year_boundary() {
        // 2025-12-29 and 2026-01-01 are both in ISO week 2026-W01
        let row = NewWeeklyMetric::opening(date(2025, 12, 29)).into_metric();
        assert!(row.covers(date(2026, 1, 1)));
    }
}
