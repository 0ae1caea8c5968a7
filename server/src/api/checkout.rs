//! Checkout endpoints
//!
//! POST /api/checkout             — memberships and generic products
//! POST /api/events/:id/checkout  — event-scoped inventory

use axum::Json;
use axum::extract::{Path, State};
use axum::Extension;

use crate::auth::Identity;
use crate::checkout::{self, CheckoutRequest, OrderSummary};
use crate::state::AppState;

use super::ApiResult;

pub async fn general_checkout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<OrderSummary> {
    let summary = checkout::submit_general(&state, &identity.company_id, req).await?;
    Ok(Json(summary))
}

pub async fn event_checkout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<OrderSummary> {
    let summary =
        checkout::submit_for_event(&state, &identity.company_id, &event_id, req).await?;
    Ok(Json(summary))
}
