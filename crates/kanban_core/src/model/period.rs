//! Performance period model.
//!
//! # Invariants
//! - `start_date <= end_date`.
//! - `name` is trimmed, non-empty and unique across periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row id of a `performance_periods` record.
pub type PeriodId = i64;

/// A named date range (sprint or reporting interval) tasks are planned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    /// Returns whether `date` falls inside this period, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive length in days.
    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::Period;
    use chrono::NaiveDate;

    #[test]
    fn contains_includes_both_bounds() {
        let period = Period {
            id: 1,
            name: "Sprint 1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };

        assert!(period.contains(period.start_date));
        assert!(period.contains(period.end_date));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()));
        assert_eq!(period.length_days(), 15);
    }
}
