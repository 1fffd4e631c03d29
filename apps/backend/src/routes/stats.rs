//! Statistics endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::Result;
use crate::models::*;
use crate::services::stats;
use crate::AppState;

/// GET /api/review/statistics
pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<StatisticsResponse>> {
    let response = stats::statistics(&state.db, query.user_id).await?;
    Ok(Json(response))
}

/// GET /api/review/activity-dates
pub async fn activity_dates(
    State(state): State<AppState>,
    Query(query): Query<ActivityDatesQuery>,
) -> Result<Json<ActivityDatesResponse>> {
    let response =
        stats::activity_dates(&state.db, query.user_id, query.year, query.month).await?;
    Ok(Json(response))
}
