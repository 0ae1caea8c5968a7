//! Orders: listing, detail, admin finalization and deletion

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::auth::Identity;
use crate::checkout::finalize::{self, FinalizedOrder};
use crate::db;
use crate::db::orders::{OrderItem, PurchaseOrder};
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
}

/// GET /api/orders — companies see their own; admins see all, optionally
/// filtered by status
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Vec<PurchaseOrder>> {
    let orders = if identity.is_admin() {
        db::orders::list_all(&state.pool, filter.status.as_deref()).await?
    } else {
        db::orders::list_for_company(&state.pool, &identity.company_id).await?
    };
    Ok(Json(orders))
}

#[derive(Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<OrderItem>,
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> ApiResult<OrderDetail> {
    let order = db::orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if order.company_id != identity.company_id && !identity.is_admin() {
        return Err(AppError::new(ErrorCode::PermissionDenied).into());
    }

    let items = db::orders::items_for(&state.pool, id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// POST /api/orders/:id/mark-paid (admin)
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<FinalizedOrder> {
    let finalized = finalize::finalize_order(&state, id).await?;
    Ok(Json(finalized))
}

/// DELETE /api/orders/:id (admin) — removes line items via cascade
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::orders::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::new(ErrorCode::OrderNotFound).into());
    }
    tracing::info!(order_id = id, "Order deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}
