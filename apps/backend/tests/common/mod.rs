//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the test environment with a database
//! - Helper functions for seeding users, cards and learning records
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use memodeck_backend::app;
use memodeck_backend::db::Database;

/// Test context containing database connection and test server.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = app(db.clone());

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its id.
    pub async fn create_test_user(&self) -> Uuid {
        self.db
            .create_user()
            .await
            .expect("Failed to create test user")
    }

    /// Create a test card in the given deck and return its id.
    pub async fn create_test_card(&self, deck_id: i64) -> i64 {
        self.db
            .create_card(deck_id, "Question?", "Answer.")
            .await
            .expect("Failed to create test card")
            .id
    }

    /// Seed a fresh learning record (never reviewed) so the card shows
    /// up in the new-cards partition of the queue.
    pub async fn seed_new_record(&self, user_id: Uuid, card_id: i64) {
        sqlx::query(
            r#"
            INSERT INTO learning_records (user_id, card_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .execute(self.db.pool())
        .await
        .expect("Failed to seed learning record");
    }

    /// Seed a reviewed learning record with a chosen due date.
    pub async fn seed_reviewed_record(
        &self,
        user_id: Uuid,
        card_id: i64,
        repetitions: i32,
        interval_days: i32,
        easiness_factor: f64,
        next_review_date: DateTime<Utc>,
    ) {
        sqlx::query(
            r#"
            INSERT INTO learning_records
                (user_id, card_id, easiness_factor, repetitions, interval_days,
                 next_review_date, learning_phase, total_reviews, successful_reviews)
            VALUES ($1, $2, $3, $4, $5, $6, 'learning', $4, $4)
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .bind(easiness_factor)
        .bind(repetitions)
        .bind(interval_days)
        .bind(next_review_date)
        .execute(self.db.pool())
        .await
        .expect("Failed to seed learning record");
    }

    /// Count ledger entries for a user.
    pub async fn count_review_events(&self, user_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM review_events WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count review events")
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM review_events WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM learning_records WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    /// Clean up all cards in a test deck.
    pub async fn cleanup_deck(&self, deck_id: i64) {
        let _ = sqlx::query("DELETE FROM cards WHERE deck_id = $1")
            .bind(deck_id)
            .execute(self.db.pool())
            .await;
    }
}
