//! PostgreSQL database operations

use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

use memodeck_core::LearningRecord;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Collaborator ===

    /// Create a user row. Used by seeding and tests; the engine itself
    /// never creates users.
    pub async fn create_user(&self) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users DEFAULT VALUES
            RETURNING id
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Check whether a user exists
    pub async fn user_exists(&self, user_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    // === Card Collaborator (read-only for the engine) ===

    /// Create a card. Used by seeding and tests.
    pub async fn create_card(&self, deck_id: i64, front: &str, back: &str) -> Result<CardRow> {
        let card = sqlx::query_as::<_, CardRow>(
            r#"
            INSERT INTO cards (deck_id, front, back)
            VALUES ($1, $2, $3)
            RETURNING id, deck_id, front, back, created_at
            "#,
        )
        .bind(deck_id)
        .bind(front)
        .bind(back)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Get card by ID
    pub async fn get_card(&self, card_id: i64) -> Result<Option<CardRow>> {
        let card = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, deck_id, front, back, created_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Get cards by IDs (order not guaranteed)
    pub async fn get_cards_by_ids(&self, card_ids: &[i64]) -> Result<Vec<CardRow>> {
        let cards = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, deck_id, front, back, created_at
            FROM cards
            WHERE id = ANY($1)
            "#,
        )
        .bind(card_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    // === Learning Record Repository ===

    /// Get all learning records for a user
    pub async fn get_learning_records(&self, user_id: Uuid) -> Result<Vec<LearningRecordRow>> {
        let records = sqlx::query_as::<_, LearningRecordRow>(
            r#"
            SELECT id, user_id, card_id, easiness_factor, repetitions, interval_days,
                   next_review_date, learning_phase, mastery_level, total_reviews,
                   successful_reviews, streak_count, is_priority, version,
                   created_at, updated_at
            FROM learning_records
            WHERE user_id = $1
            ORDER BY card_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get the learning record for a (user, card) pair
    pub async fn get_learning_record(
        &self,
        user_id: Uuid,
        card_id: i64,
    ) -> Result<Option<LearningRecordRow>> {
        let record = sqlx::query_as::<_, LearningRecordRow>(
            r#"
            SELECT id, user_id, card_id, easiness_factor, repetitions, interval_days,
                   next_review_date, learning_phase, mastery_level, total_reviews,
                   successful_reviews, streak_count, is_priority, version,
                   created_at, updated_at
            FROM learning_records
            WHERE user_id = $1 AND card_id = $2
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Persist a review atomically: record update plus ledger append.
    ///
    /// When `existing` is Some the update is guarded by the row version;
    /// a stale version means a concurrent review won and the caller gets
    /// a Conflict. When `existing` is None a fresh record is inserted;
    /// a unique violation there is likewise a concurrent first review.
    /// Both writes run in one transaction so a record update without its
    /// history entry (or vice versa) cannot be observed.
    pub async fn apply_review(
        &self,
        existing: Option<&LearningRecordRow>,
        updated: &LearningRecord,
        event: &NewReviewEvent,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        match existing {
            Some(row) => {
                let result = sqlx::query(
                    r#"
                    UPDATE learning_records
                    SET easiness_factor = $1,
                        repetitions = $2,
                        interval_days = $3,
                        next_review_date = $4,
                        learning_phase = $5,
                        mastery_level = $6,
                        total_reviews = $7,
                        successful_reviews = $8,
                        streak_count = $9,
                        is_priority = $10,
                        version = version + 1,
                        updated_at = NOW()
                    WHERE id = $11 AND version = $12
                    "#,
                )
                .bind(updated.easiness_factor)
                .bind(updated.repetitions)
                .bind(updated.interval_days)
                .bind(updated.next_review_date)
                .bind(updated.learning_phase.as_str())
                .bind(updated.mastery_level)
                .bind(updated.total_reviews)
                .bind(updated.successful_reviews)
                .bind(updated.streak_count)
                .bind(updated.is_priority)
                .bind(row.id)
                .bind(row.version)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(ApiError::Conflict(format!(
                        "learning record for card {} was updated concurrently",
                        event.card_id
                    )));
                }
            }
            None => {
                let insert = sqlx::query(
                    r#"
                    INSERT INTO learning_records
                        (user_id, card_id, easiness_factor, repetitions, interval_days,
                         next_review_date, learning_phase, mastery_level, total_reviews,
                         successful_reviews, streak_count, is_priority)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(event.user_id)
                .bind(event.card_id)
                .bind(updated.easiness_factor)
                .bind(updated.repetitions)
                .bind(updated.interval_days)
                .bind(updated.next_review_date)
                .bind(updated.learning_phase.as_str())
                .bind(updated.mastery_level)
                .bind(updated.total_reviews)
                .bind(updated.successful_reviews)
                .bind(updated.streak_count)
                .bind(updated.is_priority)
                .execute(&mut *tx)
                .await;

                match insert {
                    Ok(_) => {}
                    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                        return Err(ApiError::Conflict(format!(
                            "learning record for card {} was created concurrently",
                            event.card_id
                        )));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        sqlx::query(
            r#"
            INSERT INTO review_events
                (user_id, card_id, quality, time_spent, reviewed_at, review_date,
                 learning_phase, interval_days, easiness_factor, is_successful)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.user_id)
        .bind(event.card_id)
        .bind(event.quality)
        .bind(event.time_spent)
        .bind(event.reviewed_at)
        .bind(event.review_date)
        .bind(event.snapshot.learning_phase.as_str())
        .bind(event.snapshot.interval_days)
        .bind(event.snapshot.easiness_factor)
        .bind(event.is_successful)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    // === Review History Ledger ===

    /// Distinct review dates for a user, most recent first
    pub async fn distinct_review_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT review_date
            FROM review_events
            WHERE user_id = $1
            ORDER BY review_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    /// Number of reviews a user logged on a given date
    pub async fn reviews_on(&self, user_id: Uuid, date: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM review_events
            WHERE user_id = $1 AND review_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Trailing-window accuracy: successful / total since `since`, inclusive.
    /// None when the window holds no reviews.
    pub async fn recent_accuracy(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Option<f64>> {
        let accuracy: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(CASE WHEN is_successful THEN 1.0 ELSE 0.0 END)::FLOAT8
            FROM review_events
            WHERE user_id = $1 AND review_date >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(accuracy)
    }

    /// Distinct activity dates within an inclusive date range, ascending
    pub async fn activity_dates_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT review_date
            FROM review_events
            WHERE user_id = $1 AND review_date >= $2 AND review_date <= $3
            ORDER BY review_date
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }
}
