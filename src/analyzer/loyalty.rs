//! Loyalty analysis over several days of access records.
//!
//! A user is loyal when their records span at least `min_days` distinct days
//! and, pooled over all those days, at least `min_distinct_pages` distinct pages.

use std::collections::HashMap;
use uuid::Uuid;

use super::types::{AccessRecord, DayIndex, LoyaltyCriteria, LoyaltyReport, UserActivity};

/// Incremental loyalty analyzer.
///
/// Days can be fed in any order. Users are reported in the order they were
/// first observed.
#[derive(Debug)]
pub struct LoyaltyAnalyzer {
    criteria: LoyaltyCriteria,
    /// Position of each user in `activities`.
    index: HashMap<Uuid, usize>,
    activities: Vec<UserActivity>,
    records_per_day: Vec<usize>,
}

impl LoyaltyAnalyzer {
    pub fn new(criteria: LoyaltyCriteria) -> Self {
        Self {
            criteria,
            index: HashMap::new(),
            activities: Vec::new(),
            records_per_day: Vec::new(),
        }
    }

    fn ensure_day(&mut self, day: DayIndex) {
        if self.records_per_day.len() <= day {
            self.records_per_day.resize(day + 1, 0);
        }
    }

    /// Record a single access for `day`.
    pub fn observe(&mut self, day: DayIndex, record: &AccessRecord) {
        self.ensure_day(day);
        self.records_per_day[day] += 1;

        match self.index.get(&record.user_id) {
            Some(&position) => self.activities[position].add_visit(day, record),
            None => {
                self.index.insert(record.user_id, self.activities.len());
                self.activities.push(UserActivity::new(day, record));
            }
        }
    }

    /// Record every access of one day.
    ///
    /// An empty day still counts towards `records_per_day` with zero records.
    pub fn observe_day<I>(&mut self, day: DayIndex, records: I)
    where
        I: IntoIterator<Item = AccessRecord>,
    {
        self.ensure_day(day);
        for record in records {
            self.observe(day, &record);
        }
    }

    /// Accumulated activity of one user, if seen.
    pub fn activity(&self, user_id: &Uuid) -> Option<&UserActivity> {
        self.index.get(user_id).map(|&position| &self.activities[position])
    }

    /// Activities that satisfy the criteria.
    pub fn loyal_activities(&self) -> impl Iterator<Item = &UserActivity> {
        self.activities.iter().filter(|activity| self.criteria.is_met_by(activity))
    }

    pub fn loyal_users(&self) -> Vec<Uuid> {
        self.loyal_activities().map(|activity| activity.user_id).collect()
    }

    pub fn report(&self) -> LoyaltyReport {
        LoyaltyReport {
            loyal_users: self.loyal_users(),
            records_per_day: self.records_per_day.clone(),
            users_seen: self.activities.len(),
        }
    }
}

impl Default for LoyaltyAnalyzer {
    fn default() -> Self {
        Self::new(LoyaltyCriteria::default())
    }
}

/// Find the loyal users across per-day record sequences.
///
/// # Parameters
///
/// * `days` - One record sequence per day; position in the iterator is the day index
/// * `criteria` - Thresholds to apply
///
/// # Returns
///
/// Loyal user ids in order of first appearance.
pub fn find_loyal_users<D, R>(days: D, criteria: &LoyaltyCriteria) -> Vec<Uuid>
where
    D: IntoIterator<Item = R>,
    R: IntoIterator<Item = AccessRecord>,
{
    let mut analyzer = LoyaltyAnalyzer::new(*criteria);
    for (day, records) in days.into_iter().enumerate() {
        analyzer.observe_day(day, records);
    }
    analyzer.loyal_users()
}
