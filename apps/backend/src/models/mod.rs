//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from memodeck-core
pub use memodeck_core::{
    LearningPhase, LearningRecord, PhaseDistribution, Quality, ReviewSnapshot, SessionType,
};

// === Database Entity Types ===

/// Card stored in PostgreSQL (read-only collaborator for the engine)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardRow {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}

impl CardRow {
    /// Convert to the API card shape
    pub fn to_api_card(&self) -> Card {
        Card {
            id: self.id,
            front: self.front.clone(),
            back: self.back.clone(),
            deck_id: self.deck_id,
        }
    }
}

/// Card content as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub deck_id: i64,
}

/// Learning record row with identity, version and audit fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: i64,
    pub easiness_factor: f64,
    pub repetitions: i32,
    pub interval_days: i32,
    pub next_review_date: Option<DateTime<Utc>>,
    pub learning_phase: String,
    pub mastery_level: f64,
    pub total_reviews: i32,
    pub successful_reviews: i32,
    pub streak_count: i32,
    pub is_priority: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearningRecordRow {
    /// Convert to the core record shape the scheduler operates on
    pub fn to_core_record(&self) -> LearningRecord {
        LearningRecord {
            easiness_factor: self.easiness_factor,
            repetitions: self.repetitions,
            interval_days: self.interval_days,
            next_review_date: self.next_review_date,
            learning_phase: LearningPhase::from_str_lossy(&self.learning_phase),
            mastery_level: self.mastery_level,
            total_reviews: self.total_reviews,
            successful_reviews: self.successful_reviews,
            streak_count: self.streak_count,
            is_priority: self.is_priority,
        }
    }
}

/// Review event to append to the ledger.
///
/// Phase/interval/EF come from the pre-update snapshot, never from the
/// record state after the scheduler ran.
#[derive(Debug, Clone)]
pub struct NewReviewEvent {
    pub user_id: Uuid,
    pub card_id: i64,
    pub quality: i32,
    pub time_spent: Option<i32>,
    pub reviewed_at: DateTime<Utc>,
    pub review_date: NaiveDate,
    pub snapshot: ReviewSnapshot,
    pub is_successful: bool,
}

// === API Request/Response Types ===

/// Query carrying the caller-supplied user id
#[derive(Debug, Serialize, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

/// Suggested next action given the state of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    FocusOverdue,
    SplitSession,
    LearnNew,
    BalancedStudy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub total_due: usize,
    pub overdue_cards: usize,
    pub new_cards: usize,
    pub estimated_time_secs: u32,
    pub current_streak: u32,
    pub has_studied_today: bool,
    pub learning_distribution: PhaseDistribution,
    pub recent_accuracy: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: Uuid,
    pub max_cards: Option<usize>,
}

/// Card content plus scheduling context for a study session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCard {
    #[serde(flatten)]
    pub card: Card,
    pub learning_phase: LearningPhase,
    pub is_priority: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub total_cards: usize,
    pub cards: Vec<SessionCard>,
    pub estimated_time_secs: u32,
    pub session_type: SessionType,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub user_id: Uuid,
    pub quality: i32,
    pub time_spent_secs: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
    pub next_review_date: DateTime<Utc>,
    pub interval_days: i32,
    pub easiness_factor: f64,
    pub learning_phase: LearningPhase,
    pub mastery_level: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_cards: usize,
    pub learning_distribution: PhaseDistribution,
    pub average_accuracy: f64,
    pub recent_accuracy: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub reviews_today: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityDatesQuery {
    pub user_id: Uuid,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityDatesResponse {
    /// Days of the month with at least one review
    pub days: Vec<u32>,
}
