//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a unique deck id so concurrent test runs don't collide.
pub fn unique_deck_id() -> i64 {
    (Uuid::new_v4().as_u128() as i64) & i64::MAX
}

/// Create a start-session request body.
pub fn start_session_request(user_id: Uuid, max_cards: Option<usize>) -> serde_json::Value {
    match max_cards {
        Some(n) => json!({ "user_id": user_id, "max_cards": n }),
        None => json!({ "user_id": user_id }),
    }
}

/// Create a submit-review request body.
pub fn submit_review_request(user_id: Uuid, quality: i32) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "quality": quality,
        "time_spent_secs": 12
    })
}
