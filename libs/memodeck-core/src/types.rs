//! Core types for the spaced-repetition engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Hours past the due date after which a card counts as overdue.
pub const OVERDUE_GRACE_HOURS: i64 = 24;

/// Coarse bucket summarizing a card's progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPhase {
    New,
    Learning,
    Review,
    Mastered,
}

impl Default for LearningPhase {
    fn default() -> Self {
        Self::New
    }
}

impl LearningPhase {
    /// Phase identifier as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Mastered => "mastered",
        }
    }

    /// Parse from the stored identifier. Unknown values fall back to New.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "learning" => Self::Learning,
            "review" => Self::Review,
            "mastered" => Self::Mastered,
            _ => Self::New,
        }
    }
}

/// Validated quality rating for a review (0-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(u8);

impl Quality {
    /// Validate a raw rating. Rejects anything outside 0..=5.
    pub fn new(value: i32) -> Result<Self> {
        if (0..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidQuality { value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// A review counts as successful when quality >= 3.
    pub fn is_successful(self) -> bool {
        self.0 >= 3
    }
}

/// Per-(user, card) spaced-repetition state.
///
/// Created lazily with defaults on first review and mutated only by the
/// scheduler. The owning row carries its own identity and audit fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub easiness_factor: f64,
    pub repetitions: i32,
    pub interval_days: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    pub learning_phase: LearningPhase,
    pub mastery_level: f64,
    pub total_reviews: i32,
    pub successful_reviews: i32,
    pub streak_count: i32,
    pub is_priority: bool,
}

impl Default for LearningRecord {
    fn default() -> Self {
        Self {
            easiness_factor: 2.5,
            repetitions: 0,
            interval_days: 0,
            next_review_date: None,
            learning_phase: LearningPhase::New,
            mastery_level: 0.0,
            total_reviews: 0,
            successful_reviews: 0,
            streak_count: 0,
            is_priority: false,
        }
    }
}

impl LearningRecord {
    /// Fraction of reviews answered successfully, 0.0 when never reviewed.
    pub fn accuracy(&self) -> f64 {
        if self.total_reviews == 0 {
            0.0
        } else {
            f64::from(self.successful_reviews) / f64::from(self.total_reviews)
        }
    }

    /// Whether the card's next review date has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        matches!(self.next_review_date, Some(d) if d <= now)
    }

    /// Whether the card is more than the grace period past due.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.next_review_date,
            Some(d) if d < now - Duration::hours(OVERDUE_GRACE_HOURS)
        )
    }

    /// Capture phase/interval/EF as they are right now.
    ///
    /// Taken before a review is applied so the history ledger records the
    /// state the answer was given against, not the post-update state.
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot {
            learning_phase: self.learning_phase,
            interval_days: self.interval_days,
            easiness_factor: self.easiness_factor,
        }
    }
}

/// Pre-update state captured for the review history ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub learning_phase: LearningPhase,
    pub interval_days: i32,
    pub easiness_factor: f64,
}

/// Study session classification by majority phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    NewLearning,
    ActiveLearning,
    ReviewSession,
}
