//! Streak and mastery statistics.
//!
//! Operates purely on activity dates already recorded in the review ledger;
//! nothing here re-derives dates from raw timestamps.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{LearningPhase, LearningRecord};

/// Consecutive-day streak ending today or yesterday.
///
/// `dates` must be distinct activity dates in descending order. If the most
/// recent activity is older than yesterday the streak is already broken.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let latest = match dates.first() {
        Some(d) => *d,
        None => return 0,
    };
    let yesterday = today - Duration::days(1);
    if latest != today && latest != yesterday {
        return 0;
    }

    let mut streak = 0;
    let mut expected = latest;
    for &date in dates {
        if date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive activity dates.
///
/// `dates` must be distinct dates in ascending order.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut run = 1;
    for pair in dates.windows(2) {
        if pair[1] == pair[0] + Duration::days(1) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }
    longest
}

/// Card counts per learning phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDistribution {
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
}

impl PhaseDistribution {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LearningRecord>,
    {
        let mut dist = Self::default();
        for record in records {
            match record.learning_phase {
                LearningPhase::New => dist.new += 1,
                LearningPhase::Learning => dist.learning += 1,
                LearningPhase::Review => dist.review += 1,
                LearningPhase::Mastered => dist.mastered += 1,
            }
        }
        dist
    }
}

/// Mean per-card accuracy over records that have been reviewed at least once.
pub fn average_accuracy<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a LearningRecord>,
{
    let mut sum = 0.0;
    let mut count = 0;
    for record in records {
        if record.total_reviews > 0 {
            sum += record.accuracy();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn streak_counts_consecutive_days_back_from_today() {
        let today = date(2025, 6, 10);
        let dates = vec![today, date(2025, 6, 9), date(2025, 6, 8)];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let today = date(2025, 6, 10);
        let dates = vec![today, date(2025, 6, 7)];
        assert_eq!(current_streak(&dates, today), 1);
    }

    #[test]
    fn streak_is_zero_without_recent_activity() {
        let today = date(2025, 6, 10);
        let dates = vec![date(2025, 6, 8), date(2025, 6, 7)];
        assert_eq!(current_streak(&dates, today), 0);
    }

    #[test]
    fn streak_survives_when_latest_is_yesterday() {
        let today = date(2025, 6, 10);
        let dates = vec![date(2025, 6, 9), date(2025, 6, 8)];
        assert_eq!(current_streak(&dates, today), 2);
    }

    #[test]
    fn streak_is_zero_for_no_activity() {
        assert_eq!(current_streak(&[], date(2025, 6, 10)), 0);
    }

    #[test]
    fn longest_streak_finds_interior_run() {
        let dates = vec![
            date(2025, 5, 1),
            date(2025, 5, 10),
            date(2025, 5, 11),
            date(2025, 5, 12),
            date(2025, 5, 20),
            date(2025, 5, 21),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_streak_handles_single_day_and_empty() {
        assert_eq!(longest_streak(&[date(2025, 5, 1)]), 1);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn longest_streak_run_at_end() {
        let dates = vec![
            date(2025, 5, 1),
            date(2025, 5, 5),
            date(2025, 5, 6),
            date(2025, 5, 7),
            date(2025, 5, 8),
        ];
        assert_eq!(longest_streak(&dates), 4);
    }

    #[test]
    fn phase_distribution_counts_each_bucket() {
        let mut mastered = LearningRecord::default();
        mastered.learning_phase = LearningPhase::Mastered;
        let mut learning = LearningRecord::default();
        learning.learning_phase = LearningPhase::Learning;
        let fresh = LearningRecord::default();

        let dist =
            PhaseDistribution::from_records([&mastered, &learning, &fresh, &fresh]);
        assert_eq!(
            dist,
            PhaseDistribution {
                new: 2,
                learning: 1,
                review: 0,
                mastered: 1
            }
        );
    }

    #[test]
    fn average_accuracy_skips_unreviewed_records() {
        let perfect = LearningRecord {
            total_reviews: 4,
            successful_reviews: 4,
            ..LearningRecord::default()
        };
        let half = LearningRecord {
            total_reviews: 4,
            successful_reviews: 2,
            ..LearningRecord::default()
        };
        let untouched = LearningRecord::default();

        let avg = average_accuracy([&perfect, &half, &untouched]);
        assert!((avg - 0.75).abs() < 1e-9);
        assert_eq!(average_accuracy([&untouched]), 0.0);
    }
}
