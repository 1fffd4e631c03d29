//! Due queue construction.
//!
//! Selects and orders the records eligible for review at a point in time.
//! Pure over records already loaded from storage, so the same inputs always
//! produce the same ordered queue.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LearningPhase, LearningRecord, SessionType};

/// A learning record paired with the card it tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueCard {
    pub card_id: i64,
    pub record: LearningRecord,
}

/// Ordered review queue partitioned by urgency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DueQueue {
    /// More than the grace period past due.
    pub overdue: Vec<DueCard>,
    /// Past due within the grace period.
    pub due: Vec<DueCard>,
    /// No successful reviews yet (repetitions == 0) and not past due.
    pub new_cards: Vec<DueCard>,
}

impl DueQueue {
    pub fn total_due(&self) -> usize {
        self.overdue.len() + self.due.len()
    }

    /// Select up to `max_cards`: overdue first, then due, then new.
    pub fn select(&self, max_cards: usize) -> Vec<DueCard> {
        self.overdue
            .iter()
            .chain(self.due.iter())
            .chain(self.new_cards.iter())
            .take(max_cards)
            .cloned()
            .collect()
    }
}

/// Builds due queues from loaded learning records.
#[derive(Debug, Clone)]
pub struct DueQueueBuilder {
    /// EF below this marks a card as struggling and prioritized.
    pub low_ease_threshold: f64,
    /// Hours past due beyond which a card is force-prioritized.
    pub priority_overdue_hours: i64,
}

impl Default for DueQueueBuilder {
    fn default() -> Self {
        Self {
            low_ease_threshold: 2.0,
            priority_overdue_hours: 48,
        }
    }
}

impl DueQueueBuilder {
    /// Partition and order records eligible for review at `now`.
    ///
    /// Priority is derived here rather than read from storage: a card is
    /// prioritized when its EF has sunk below the threshold or it has been
    /// left overdue past the configured window.
    pub fn build(&self, records: Vec<DueCard>, now: DateTime<Utc>) -> DueQueue {
        let mut queue = DueQueue::default();

        for mut entry in records {
            entry.record.is_priority = self.is_priority(&entry.record, now);

            // Due-ness wins over repetitions: a failed card carries
            // repetitions == 0 but a past review date, and must stay in
            // the due/overdue partitions rather than hide among new cards.
            if entry.record.is_overdue(now) {
                queue.overdue.push(entry);
            } else if entry.record.is_due(now) {
                queue.due.push(entry);
            } else if entry.record.repetitions == 0 {
                queue.new_cards.push(entry);
            }
            // Reviewed and not yet due: excluded from the queue entirely.
        }

        queue.overdue.sort_by(compare_due_cards);
        queue.due.sort_by(compare_due_cards);
        // New cards have no review date; card id keeps the order stable.
        queue.new_cards.sort_by_key(|c| c.card_id);

        queue
    }

    fn is_priority(&self, record: &LearningRecord, now: DateTime<Utc>) -> bool {
        if record.easiness_factor < self.low_ease_threshold {
            return true;
        }
        match record.next_review_date {
            Some(d) => d < now - Duration::hours(self.priority_overdue_hours),
            None => false,
        }
    }
}

/// Ordering key: next_review_date asc, is_priority desc, easiness asc.
fn compare_due_cards(a: &DueCard, b: &DueCard) -> Ordering {
    a.record
        .next_review_date
        .cmp(&b.record.next_review_date)
        .then_with(|| b.record.is_priority.cmp(&a.record.is_priority))
        .then_with(|| {
            a.record
                .easiness_factor
                .partial_cmp(&b.record.easiness_factor)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.card_id.cmp(&b.card_id))
}

/// Classify a selected set by majority phase.
pub fn classify_session(selection: &[DueCard]) -> SessionType {
    if selection.is_empty() {
        return SessionType::ReviewSession;
    }
    let half = selection.len() as f64 * 0.5;
    let new_count = selection
        .iter()
        .filter(|c| c.record.learning_phase == LearningPhase::New)
        .count() as f64;
    let learning_count = selection
        .iter()
        .filter(|c| c.record.learning_phase == LearningPhase::Learning)
        .count() as f64;

    if new_count > half {
        SessionType::NewLearning
    } else if learning_count > half {
        SessionType::ActiveLearning
    } else {
        SessionType::ReviewSession
    }
}
