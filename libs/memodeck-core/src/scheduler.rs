//! SM-2 spaced repetition scheduler.
//!
//! Single canonical implementation of the SuperMemo-2 update rule plus the
//! phase reclassification and mastery scoring that hang off it. Thresholds
//! are configurable fields with the production defaults.

use chrono::{DateTime, Duration, Utc};

use crate::types::{LearningPhase, LearningRecord, Quality};

/// SM-2 scheduler with configurable phase thresholds.
#[derive(Debug, Clone)]
pub struct Sm2Scheduler {
    /// Floor for the easiness factor.
    pub minimum_ease: f64,
    /// Below this accuracy a card drops back to NEW.
    pub new_accuracy_floor: f64,
    /// Below this accuracy (or under 3 repetitions) a card is LEARNING.
    pub learning_accuracy_floor: f64,
    /// Accuracy required for MASTERED.
    pub mastered_accuracy: f64,
    /// Interval required for MASTERED.
    pub mastered_interval_days: i32,
}

impl Default for Sm2Scheduler {
    fn default() -> Self {
        Self {
            minimum_ease: 1.3,
            new_accuracy_floor: 0.5,
            learning_accuracy_floor: 0.8,
            mastered_accuracy: 0.9,
            mastered_interval_days: 21,
        }
    }
}

impl Sm2Scheduler {
    /// Apply a quality rating to a record, producing the updated record.
    ///
    /// Pure with respect to its inputs: the caller decides when and whether
    /// to persist the result. `quality` is validated at construction so no
    /// partial update can ever be observed.
    pub fn apply(
        &self,
        record: &LearningRecord,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> LearningRecord {
        let mut next = record.clone();

        if quality.is_successful() {
            next.repetitions = record.repetitions + 1;
            // Interval growth uses the pre-update interval and easiness.
            next.interval_days = match next.repetitions {
                1 => 1,
                2 => 6,
                _ => (f64::from(record.interval_days) * record.easiness_factor).ceil() as i32,
            };
            next.successful_reviews = record.successful_reviews + 1;
            next.streak_count = record.streak_count + 1;
        } else {
            // Failure is a hard reset regardless of history.
            next.repetitions = 0;
            next.interval_days = 1;
            next.streak_count = 0;
        }

        let q = f64::from(quality.value());
        let ease = record.easiness_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
        next.easiness_factor = ease.max(self.minimum_ease);

        next.total_reviews = record.total_reviews + 1;
        next.next_review_date = Some(now + Duration::days(i64::from(next.interval_days)));

        // Phase is recomputed from scratch every review. Regression from
        // REVIEW back to NEW/LEARNING when accuracy collapses is intended.
        let accuracy = next.accuracy();
        next.learning_phase = self.classify_phase(&next, accuracy);
        next.mastery_level = mastery_level(accuracy, next.interval_days, next.repetitions);

        debug_assert!(next.easiness_factor >= self.minimum_ease);
        debug_assert!(next.interval_days >= 1);

        next
    }

    fn classify_phase(&self, record: &LearningRecord, accuracy: f64) -> LearningPhase {
        if record.repetitions == 0 || accuracy < self.new_accuracy_floor {
            LearningPhase::New
        } else if record.repetitions < 3 || accuracy < self.learning_accuracy_floor {
            LearningPhase::Learning
        } else if record.interval_days >= self.mastered_interval_days
            && accuracy >= self.mastered_accuracy
        {
            LearningPhase::Mastered
        } else {
            LearningPhase::Review
        }
    }
}

/// Composite 0-1 mastery score: accuracy, interval stability, repetitions.
fn mastery_level(accuracy: f64, interval_days: i32, repetitions: i32) -> f64 {
    let stability = (f64::from(interval_days) / 30.0).min(1.0);
    let consistency = (f64::from(repetitions) / 10.0).min(1.0);
    (0.5 * accuracy + 0.3 * stability + 0.2 * consistency).clamp(0.0, 1.0)
}
