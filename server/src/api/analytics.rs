//! Page-view analytics: public tracking, admin summary

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::db;
use crate::db::analytics::PathCount;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct TrackRequest {
    pub path: String,
    pub referrer: Option<String>,
    pub visitor_id: Option<String>,
}

/// POST /api/analytics/track (public)
pub async fn track(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> ApiResult<serde_json::Value> {
    let path = req.path.trim();
    if path.is_empty() || path.len() > 2048 {
        return Err(AppError::validation("Invalid path").into());
    }

    db::analytics::record_view(
        &state.pool,
        path,
        req.referrer.as_deref(),
        req.visitor_id.as_deref(),
        now_millis(),
    )
    .await?;

    Ok(Json(serde_json::json!({ "recorded": true })))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub days: Option<i64>,
}

#[derive(Serialize)]
pub struct AnalyticsSummary {
    pub days: i64,
    pub total_views: i64,
    pub unique_visitors: i64,
    pub top_paths: Vec<PathCount>,
}

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;
const TOP_PATHS_LIMIT: i64 = 10;

/// GET /api/analytics/summary?days=N (admin)
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<AnalyticsSummary> {
    let days = query.days.unwrap_or(30);
    if !(1..=365).contains(&days) {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "days must be 1..=365").into(),
        );
    }

    let since = now_millis() - days * DAY_MILLIS;
    let total_views = db::analytics::total_views(&state.pool, since).await?;
    let unique_visitors = db::analytics::unique_visitors(&state.pool, since).await?;
    let top_paths = db::analytics::top_paths(&state.pool, since, TOP_PATHS_LIMIT).await?;

    Ok(Json(AnalyticsSummary {
        days,
        total_views,
        unique_visitors,
        top_paths,
    }))
}
