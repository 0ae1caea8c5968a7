//! Coupon management (admin)
//!
//! Validation is existence-only: no expiry dates or usage limits.

use axum::Json;
use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::commerce::CouponKind;
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::db;
use crate::db::coupons::Coupon;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct CreateCouponRequest {
    pub code: String,
    /// "FIXED" | "PERCENT"
    pub kind: String,
    pub value: Decimal,
}

pub async fn create_coupon(
    State(state): State<AppState>,
    Json(req): Json<CreateCouponRequest>,
) -> ApiResult<Coupon> {
    let code = req.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "code is required").into());
    }

    let kind = CouponKind::from_db(req.kind.trim())
        .ok_or_else(|| AppError::with_message(ErrorCode::InvalidRequest, "kind must be FIXED or PERCENT"))?;

    if req.value <= Decimal::ZERO {
        return Err(AppError::with_message(ErrorCode::ValueOutOfRange, "value must be positive").into());
    }
    if kind == CouponKind::Percent && req.value > Decimal::from(100) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "percent value must be at most 100",
        )
        .into());
    }

    if db::coupons::find_by_code(&state.pool, &code).await?.is_some() {
        return Err(AppError::new(ErrorCode::AlreadyExists).into());
    }

    let id = uuid::Uuid::new_v4().to_string();
    db::coupons::create(&state.pool, &id, &code, kind.as_db(), req.value, now_millis()).await?;

    tracing::info!(coupon_id = %id, code = %code, "Coupon created");

    let coupon = db::coupons::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CouponNotFound))?;
    Ok(Json(coupon))
}

pub async fn list_coupons(State(state): State<AppState>) -> ApiResult<Vec<Coupon>> {
    Ok(Json(db::coupons::list(&state.pool).await?))
}

pub async fn delete_coupon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::coupons::delete(&state.pool, &id).await?;
    if deleted == 0 {
        return Err(AppError::new(ErrorCode::CouponNotFound).into());
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
