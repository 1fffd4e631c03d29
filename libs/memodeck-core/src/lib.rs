//! Core spaced-repetition library consumed by the backend service.
//!
//! Provides:
//! - The unified SM-2 scheduler (update rule, phase reclassification,
//!   mastery scoring)
//! - Due queue construction and ordering
//! - Streak and accuracy statistics over ledger dates
//! - Shared types (LearningRecord, Quality, LearningPhase, etc.)

pub mod error;
pub mod queue;
pub mod scheduler;
pub mod stats;
pub mod types;

pub use error::{CoreError, Result};
pub use queue::{classify_session, DueCard, DueQueue, DueQueueBuilder};
pub use scheduler::Sm2Scheduler;
pub use stats::{average_accuracy, current_streak, longest_streak, PhaseDistribution};
pub use types::{
    LearningPhase, LearningRecord, Quality, ReviewSnapshot, SessionType, OVERDUE_GRACE_HOURS,
};
