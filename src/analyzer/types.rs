//! Type definitions specific to the analyzer module.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// Zero-based position of a day log in the input list.
pub type DayIndex = usize;

/// One logged page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    /// When the page was viewed, normalized to UTC.
    pub timestamp: DateTime<Utc>,
    pub page_id: Uuid,
    pub user_id: Uuid,
}

/// Thresholds a user must reach to count as loyal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoyaltyCriteria {
    /// Minimum number of distinct days the user must appear on.
    pub min_days: usize,
    /// Minimum number of distinct pages, pooled over every day.
    /// Values of 0 or 1 turn the page check off.
    pub min_distinct_pages: usize,
}

impl LoyaltyCriteria {
    pub const DEFAULT_MIN_DAYS: usize = 2;
    pub const DEFAULT_MIN_DISTINCT_PAGES: usize = 2;

    /// Multi-day presence only, ignoring how many pages were visited.
    pub fn presence_only(min_days: usize) -> Self {
        Self {
            min_days,
            min_distinct_pages: 1,
        }
    }

    /// Check an accumulated activity against both thresholds.
    pub fn is_met_by(&self, activity: &UserActivity) -> bool {
        activity.day_count() >= self.min_days && activity.distinct_page_count() >= self.min_distinct_pages
    }
}

impl Default for LoyaltyCriteria {
    fn default() -> Self {
        Self {
            min_days: Self::DEFAULT_MIN_DAYS,
            min_distinct_pages: Self::DEFAULT_MIN_DISTINCT_PAGES,
        }
    }
}

/// Everything the analyzer remembers about one user.
#[derive(Debug, Clone)]
pub struct UserActivity {
    pub user_id: Uuid,
    /// Days the user appeared on.
    pub days: BTreeSet<DayIndex>,
    /// Distinct pages across all days.
    pub pages: HashSet<Uuid>,
    pub visits: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl UserActivity {
    pub fn new(day: DayIndex, record: &AccessRecord) -> Self {
        Self {
            user_id: record.user_id,
            days: BTreeSet::from([day]),
            pages: HashSet::from([record.page_id]),
            visits: 1,
            first_seen: record.timestamp,
            last_seen: record.timestamp,
        }
    }

    /// Fold another record of the same user into the accumulator.
    pub fn add_visit(&mut self, day: DayIndex, record: &AccessRecord) {
        debug_assert_eq!(self.user_id, record.user_id);
        self.days.insert(day);
        self.pages.insert(record.page_id);
        self.visits += 1;
        self.first_seen = self.first_seen.min(record.timestamp);
        self.last_seen = self.last_seen.max(record.timestamp);
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn distinct_page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoyaltyReport {
    /// Loyal users in order of first appearance.
    pub loyal_users: Vec<Uuid>,
    /// Record count per day index.
    pub records_per_day: Vec<usize>,
    /// Number of distinct users seen across all days.
    pub users_seen: usize,
}

impl LoyaltyReport {
    pub fn total_records(&self) -> usize {
        self.records_per_day.iter().sum()
    }
}
