// crates/sweepdb-core/src/status.rs

//! Urgency tiers from cleaning-date lists.
//!
//! Everything here is pure: callers pass `today` explicitly and the input
//! slice is never reordered in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusTier {
    /// Cleaning today, within the next few days, or in the grace window.
    Urgent,
    Soon,
    Clear,
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            StatusTier::Urgent => "urgent",
            StatusTier::Soon => "soon",
            StatusTier::Clear => "clear",
        })
    }
}

/// Day thresholds for [`StatusPolicy::status_tier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPolicy {
    /// Past dates stay relevant for this many whole days.
    pub grace_days: i64,
    pub urgent_within_days: i64,
    pub soon_within_days: i64,
    pub max_upcoming: usize,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            grace_days: 7,
            urgent_within_days: 3,
            soon_within_days: 7,
            max_upcoming: 2,
        }
    }
}

impl StatusPolicy {
    /// Dates on/after `today` or at most `grace_days` before it, ascending,
    /// truncated to `max_upcoming`.
    pub fn next_relevant_dates(&self, dates: &[NaiveDate], today: NaiveDate) -> Vec<NaiveDate> {
        let mut relevant: Vec<NaiveDate> = dates
            .iter()
            .copied()
            .filter(|d| *d >= today || (today - *d).num_days() <= self.grace_days)
            .collect();
        relevant.sort_unstable();
        relevant.truncate(self.max_upcoming);
        relevant
    }

    pub fn status_tier(&self, dates: &[NaiveDate], today: NaiveDate) -> StatusTier {
        let Some(first) = self.next_relevant_dates(dates, today).first().copied() else {
            return StatusTier::Clear;
        };
        // Negative for dates still inside the grace window; those count as
        // urgent too.
        let days = (first - today).num_days();
        if days <= self.urgent_within_days {
            StatusTier::Urgent
        } else if days <= self.soon_within_days {
            StatusTier::Soon
        } else {
            StatusTier::Clear
        }
    }
}

/// [`StatusPolicy::next_relevant_dates`] with the default policy.
pub fn next_relevant_dates(dates: &[NaiveDate], today: NaiveDate) -> Vec<NaiveDate> {
    StatusPolicy::default().next_relevant_dates(dates, today)
}

/// [`StatusPolicy::status_tier`] with the default policy.
pub fn status_tier(dates: &[NaiveDate], today: NaiveDate) -> StatusTier {
    StatusPolicy::default().status_tier(dates, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn two_upcoming_dates_two_days_out() {
        let today = d("2024-06-01");
        let dates = [d("2024-06-11"), d("2024-06-03")];
        assert_eq!(
            next_relevant_dates(&dates, today),
            vec![d("2024-06-03"), d("2024-06-11")]
        );
        assert_eq!(status_tier(&dates, today), StatusTier::Urgent);
        // Input order untouched.
        assert_eq!(dates[0], d("2024-06-11"));
    }

    #[test]
    fn recent_past_date_is_in_grace_window() {
        let today = d("2024-06-01");
        let dates = [d("2024-05-27")];
        assert_eq!(next_relevant_dates(&dates, today), vec![d("2024-05-27")]);
        assert_eq!(status_tier(&dates, today), StatusTier::Urgent);
    }

    #[test]
    fn grace_window_boundary() {
        let today = d("2024-06-10");
        assert_eq!(next_relevant_dates(&[d("2024-06-03")], today).len(), 1);
        assert!(next_relevant_dates(&[d("2024-06-02")], today).is_empty());
    }

    #[test]
    fn today_is_urgent() {
        let today = d("2024-06-01");
        let dates = [d("2024-09-01"), d("2024-06-01")];
        assert_eq!(status_tier(&dates, today), StatusTier::Urgent);
    }

    #[test]
    fn tiers_by_distance() {
        let today = d("2024-06-01");
        assert_eq!(status_tier(&[d("2024-06-04")], today), StatusTier::Urgent);
        assert_eq!(status_tier(&[d("2024-06-05")], today), StatusTier::Soon);
        assert_eq!(status_tier(&[d("2024-06-08")], today), StatusTier::Soon);
        assert_eq!(status_tier(&[d("2024-06-09")], today), StatusTier::Clear);
    }

    #[test]
    fn stale_dates_are_clear() {
        let today = d("2024-06-20");
        let dates = [d("2024-05-01"), d("2024-06-12"), d("2024-04-02")];
        assert!(next_relevant_dates(&dates, today).is_empty());
        assert_eq!(status_tier(&dates, today), StatusTier::Clear);
        assert_eq!(status_tier(&[], today), StatusTier::Clear);
    }

    #[test]
    fn never_more_than_two_and_sorted() {
        let today = d("2024-06-01");
        let dates = [
            d("2024-07-01"),
            d("2024-05-30"),
            d("2024-06-15"),
            d("2023-01-01"),
            d("2024-06-02"),
        ];
        let next = next_relevant_dates(&dates, today);
        assert_eq!(next, vec![d("2024-05-30"), d("2024-06-02")]);
    }

    #[test]
    fn custom_policy_thresholds() {
        let policy = StatusPolicy {
            grace_days: 0,
            urgent_within_days: 1,
            soon_within_days: 2,
            max_upcoming: 3,
        };
        let today = d("2024-06-01");
        assert!(policy.next_relevant_dates(&[d("2024-05-31")], today).is_empty());
        assert_eq!(policy.status_tier(&[d("2024-06-03")], today), StatusTier::Soon);
    }

    mod properties {
        use super::*;
        use chrono::Duration;
        use proptest::prelude::*;

        fn base() -> NaiveDate {
            d("2024-06-01")
        }

        fn dates_from(offsets: &[i64]) -> Vec<NaiveDate> {
            offsets.iter().map(|o| base() + Duration::days(*o)).collect()
        }

        proptest! {
            #[test]
            fn next_dates_are_few_sorted_and_relevant(
                offsets in proptest::collection::vec(-60i64..60, 0..16),
                shift in -30i64..30,
            ) {
                let dates = dates_from(&offsets);
                let before = dates.clone();
                let today = base() + Duration::days(shift);

                let next = next_relevant_dates(&dates, today);
                prop_assert!(next.len() <= 2);
                prop_assert!(next.windows(2).all(|w| w[0] <= w[1]));
                for day in &next {
                    prop_assert!(*day >= today || (today - *day).num_days() <= 7);
                }
                prop_assert_eq!(dates, before);
            }

            #[test]
            fn a_date_today_is_always_urgent(
                offsets in proptest::collection::vec(-60i64..60, 0..16),
                shift in -30i64..30,
            ) {
                let today = base() + Duration::days(shift);
                let mut dates = dates_from(&offsets);
                dates.push(today);
                prop_assert_eq!(status_tier(&dates, today), StatusTier::Urgent);
            }
        }
    }
}
