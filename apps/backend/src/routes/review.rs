//! Review endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::services::session;
use crate::AppState;

/// GET /api/review/overview
pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<OverviewResponse>> {
    let response = session::overview(&state.db, query.user_id, Utc::now()).await?;
    Ok(Json(response))
}

/// POST /api/review/session
pub async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>> {
    let response = session::start_session(&state.db, &payload, Utc::now()).await?;
    Ok(Json(response))
}

/// POST /api/review/cards/{card_id}
pub async fn submit_review(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let response = session::submit_review(&state.db, card_id, &payload, Utc::now()).await?;
    Ok(Json(response))
}
