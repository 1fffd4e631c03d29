//! Statistics API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Datelike, Utc};
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

/// Test statistics for a user with no records.
#[tokio::test]
#[ignore = "requires database"]
async fn test_statistics_empty() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = ctx.create_test_user().await;

    let response = server
        .get(&format!("/api/review/statistics?user_id={}", user_id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["total_cards"], 0);
    assert_eq!(body["current_streak"], 0);
    assert_eq!(body["longest_streak"], 0);
    assert_eq!(body["reviews_today"], 0);
    assert_eq!(body["average_accuracy"], 0.0);

    ctx.cleanup_user(user_id).await;
}

/// Test statistics rejects unknown users.
#[tokio::test]
#[ignore = "requires database"]
async fn test_statistics_unknown_user() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .get(&format!(
            "/api/review/statistics?user_id={}",
            Uuid::new_v4()
        ))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test statistics after a day of reviews.
#[tokio::test]
#[ignore = "requires database"]
async fn test_statistics_after_reviews() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = ctx.create_test_user().await;
    let deck_id = fixtures::unique_deck_id();

    let passed_card = ctx.create_test_card(deck_id).await;
    let failed_card = ctx.create_test_card(deck_id).await;

    server
        .post(&format!("/api/review/cards/{}", passed_card))
        .json(&fixtures::submit_review_request(user_id, 4))
        .await
        .assert_status_ok();
    server
        .post(&format!("/api/review/cards/{}", failed_card))
        .json(&fixtures::submit_review_request(user_id, 1))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/review/statistics?user_id={}", user_id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["total_cards"], 2);
    assert_eq!(body["reviews_today"], 2);
    assert_eq!(body["current_streak"], 1);
    assert_eq!(body["longest_streak"], 1);
    // One card at 100%, one at 0%.
    assert_eq!(body["average_accuracy"].as_f64().unwrap(), 0.5);
    assert_eq!(body["recent_accuracy"].as_f64().unwrap(), 0.5);
    assert_eq!(body["learning_distribution"]["learning"], 1);
    assert_eq!(body["learning_distribution"]["new"], 1);

    ctx.cleanup_user(user_id).await;
    ctx.cleanup_deck(deck_id).await;
}

/// Test the activity calendar lists today after a review.
#[tokio::test]
#[ignore = "requires database"]
async fn test_activity_dates_current_month() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = ctx.create_test_user().await;
    let deck_id = fixtures::unique_deck_id();
    let card_id = ctx.create_test_card(deck_id).await;

    server
        .post(&format!("/api/review/cards/{}", card_id))
        .json(&fixtures::submit_review_request(user_id, 3))
        .await
        .assert_status_ok();

    let today = Utc::now().date_naive();
    let response = server
        .get(&format!(
            "/api/review/activity-dates?user_id={}&year={}&month={}",
            user_id,
            today.year(),
            today.month()
        ))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let days: Vec<u64> = body["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_u64().unwrap())
        .collect();
    assert_eq!(days, vec![u64::from(today.day())]);

    ctx.cleanup_user(user_id).await;
    ctx.cleanup_deck(deck_id).await;
}

/// Test a month with no activity returns an empty calendar.
#[tokio::test]
#[ignore = "requires database"]
async fn test_activity_dates_empty_month() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = ctx.create_test_user().await;

    let response = server
        .get(&format!(
            "/api/review/activity-dates?user_id={}&year=2020&month=1",
            user_id
        ))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["days"].as_array().unwrap().len(), 0);

    ctx.cleanup_user(user_id).await;
}

/// Test an out-of-range month is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_activity_dates_invalid_month() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = ctx.create_test_user().await;

    let response = server
        .get(&format!(
            "/api/review/activity-dates?user_id={}&year=2025&month=13",
            user_id
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await;
}
