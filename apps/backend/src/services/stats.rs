//! Aggregate learning statistics and the activity calendar.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use memodeck_core::{
    average_accuracy, current_streak, longest_streak, LearningRecord, PhaseDistribution,
};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{ActivityDatesResponse, StatisticsResponse};
use crate::services::ensure_user;

/// Ledger window feeding the recent accuracy figure.
const RECENT_ACCURACY_DAYS: i64 = 30;

/// Summary statistics across a user's whole collection.
pub async fn statistics(db: &Database, user_id: Uuid) -> Result<StatisticsResponse> {
    ensure_user(db, user_id).await?;

    let rows = db.get_learning_records(user_id).await?;
    let records: Vec<LearningRecord> = rows.iter().map(|r| r.to_core_record()).collect();

    let today = Utc::now().date_naive();
    let dates_desc = db.distinct_review_dates(user_id).await?;
    let mut dates_asc = dates_desc.clone();
    dates_asc.reverse();

    let since = today - Duration::days(RECENT_ACCURACY_DAYS);
    let recent_accuracy = match db.recent_accuracy(user_id, since).await? {
        Some(accuracy) => accuracy,
        None => average_accuracy(&records),
    };

    Ok(StatisticsResponse {
        total_cards: records.len(),
        learning_distribution: PhaseDistribution::from_records(&records),
        average_accuracy: average_accuracy(&records),
        recent_accuracy,
        current_streak: current_streak(&dates_desc, today),
        longest_streak: longest_streak(&dates_asc),
        reviews_today: db.reviews_on(user_id, today).await?,
    })
}

/// Days of a calendar month on which the user logged at least one review.
pub async fn activity_dates(
    db: &Database,
    user_id: Uuid,
    year: i32,
    month: u32,
) -> Result<ActivityDatesResponse> {
    ensure_user(db, user_id).await?;

    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ApiError::Validation(format!("invalid month {}-{}", year, month)))?;
    let end = last_day_of_month(start);

    let dates = db.activity_dates_between(user_id, start, end).await?;
    let days = dates.iter().map(|d| d.day()).collect();

    Ok(ActivityDatesResponse { days })
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    // The first of the month always exists, so the unwrap path is dead.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|d| d - Duration::days(1))
        .unwrap_or(first)
}
