//! Review session orchestration: daily overview, bounded study sessions,
//! and applying a single graded review.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use memodeck_core::{
    classify_session, current_streak, DueCard, DueQueue, DueQueueBuilder, LearningRecord,
    PhaseDistribution, Quality, Sm2Scheduler,
};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{
    NewReviewEvent, OverviewResponse, Recommendation, SessionCard, StartSessionRequest,
    StartSessionResponse, SubmitReviewRequest, SubmitReviewResponse,
};
use crate::services::ensure_user;

/// Rough per-card time estimate used for session planning.
pub const SECONDS_PER_CARD: u32 = 45;

/// Session size when the caller does not ask for one.
pub const DEFAULT_MAX_CARDS: usize = 30;

/// At most this many never-reviewed cards are surfaced per overview.
const NEW_CARD_DAILY_CAP: usize = 20;

/// Ledger window feeding the overview accuracy figure.
const RECENT_ACCURACY_DAYS: i64 = 30;

async fn load_queue(db: &Database, user_id: Uuid, now: DateTime<Utc>) -> Result<DueQueue> {
    let rows = db.get_learning_records(user_id).await?;
    let entries: Vec<DueCard> = rows
        .iter()
        .map(|row| DueCard {
            card_id: row.card_id,
            record: row.to_core_record(),
        })
        .collect();

    Ok(DueQueueBuilder::default().build(entries, now))
}

fn recommend(overdue: usize, total_due: usize, new_cards: usize) -> Recommendation {
    if overdue > 10 {
        Recommendation::FocusOverdue
    } else if total_due > 50 {
        Recommendation::SplitSession
    } else if new_cards > 20 {
        Recommendation::LearnNew
    } else {
        Recommendation::BalancedStudy
    }
}

/// Daily review overview: queue counts, streak, accuracy and a suggested
/// next action.
pub async fn overview(
    db: &Database,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<OverviewResponse> {
    ensure_user(db, user_id).await?;

    let rows = db.get_learning_records(user_id).await?;
    let records: Vec<LearningRecord> = rows.iter().map(|r| r.to_core_record()).collect();
    let entries: Vec<DueCard> = rows
        .iter()
        .map(|row| DueCard {
            card_id: row.card_id,
            record: row.to_core_record(),
        })
        .collect();
    let queue = DueQueueBuilder::default().build(entries, now);

    let total_due = queue.total_due();
    let overdue_cards = queue.overdue.len();
    // The recommendation looks at the full backlog of new cards; the
    // displayed count is capped so the overview stays approachable.
    let new_backlog = queue.new_cards.len();
    let new_cards = new_backlog.min(NEW_CARD_DAILY_CAP);

    let today = now.date_naive();
    let dates = db.distinct_review_dates(user_id).await?;
    let current_streak = current_streak(&dates, today);
    let has_studied_today = dates.first() == Some(&today);

    let since = today - Duration::days(RECENT_ACCURACY_DAYS);
    let recent_accuracy = match db.recent_accuracy(user_id, since).await? {
        Some(accuracy) => accuracy,
        // No reviews in the window: fall back to lifetime per-card accuracy.
        None => memodeck_core::average_accuracy(&records),
    };

    Ok(OverviewResponse {
        total_due,
        overdue_cards,
        new_cards,
        estimated_time_secs: (total_due + new_cards) as u32 * SECONDS_PER_CARD,
        current_streak,
        has_studied_today,
        learning_distribution: PhaseDistribution::from_records(&records),
        recent_accuracy,
        recommendation: recommend(overdue_cards, total_due, new_backlog),
    })
}

/// Assemble a bounded study session from the due queue.
///
/// Ordering is the queue's: overdue first, then due, then new. Card content
/// is joined in afterwards; a record whose card has been deleted is skipped
/// rather than failing the whole session.
pub async fn start_session(
    db: &Database,
    request: &StartSessionRequest,
    now: DateTime<Utc>,
) -> Result<StartSessionResponse> {
    ensure_user(db, request.user_id).await?;

    let queue = load_queue(db, request.user_id, now).await?;
    let max_cards = request.max_cards.unwrap_or(DEFAULT_MAX_CARDS);
    let selection = queue.select(max_cards);

    let card_ids: Vec<i64> = selection.iter().map(|entry| entry.card_id).collect();
    let cards = db.get_cards_by_ids(&card_ids).await?;
    let by_id: HashMap<i64, _> = cards.into_iter().map(|card| (card.id, card)).collect();

    let session_cards: Vec<SessionCard> = selection
        .iter()
        .filter_map(|entry| {
            by_id.get(&entry.card_id).map(|card| SessionCard {
                card: card.to_api_card(),
                learning_phase: entry.record.learning_phase,
                is_priority: entry.record.is_priority,
            })
        })
        .collect();

    let session_type = classify_session(&selection);
    let total_cards = session_cards.len();

    tracing::info!(
        user_id = %request.user_id,
        total_cards,
        session_type = ?session_type,
        "study session assembled"
    );

    Ok(StartSessionResponse {
        session_id: Uuid::new_v4(),
        total_cards,
        cards: session_cards,
        estimated_time_secs: total_cards as u32 * SECONDS_PER_CARD,
        session_type,
        started_at: now,
    })
}

/// Apply one graded review to a card's learning record.
///
/// The record is created lazily with defaults on first review. The update
/// and its ledger entry are persisted atomically; a concurrent review of
/// the same card surfaces as a Conflict for the caller to retry.
pub async fn submit_review(
    db: &Database,
    card_id: i64,
    request: &SubmitReviewRequest,
    now: DateTime<Utc>,
) -> Result<SubmitReviewResponse> {
    let quality = Quality::new(request.quality)?;

    ensure_user(db, request.user_id).await?;
    db.get_card(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("card {}", card_id)))?;

    let existing = db.get_learning_record(request.user_id, card_id).await?;
    let current = existing
        .as_ref()
        .map(|row| row.to_core_record())
        .unwrap_or_default();

    let snapshot = current.snapshot();
    let updated = Sm2Scheduler::default().apply(&current, quality, now);
    let next_review_date = updated
        .next_review_date
        .ok_or_else(|| ApiError::Internal("scheduler produced no next review date".to_string()))?;

    let event = NewReviewEvent {
        user_id: request.user_id,
        card_id,
        quality: request.quality,
        time_spent: request.time_spent_secs,
        reviewed_at: now,
        review_date: now.date_naive(),
        snapshot,
        is_successful: quality.is_successful(),
    };

    db.apply_review(existing.as_ref(), &updated, &event).await?;

    tracing::info!(
        user_id = %request.user_id,
        card_id,
        quality = request.quality,
        interval_days = updated.interval_days,
        phase = updated.learning_phase.as_str(),
        "review applied"
    );

    Ok(SubmitReviewResponse {
        next_review_date,
        interval_days: updated.interval_days,
        easiness_factor: updated.easiness_factor,
        learning_phase: updated.learning_phase,
        mastery_level: updated.mastery_level,
    })
}
