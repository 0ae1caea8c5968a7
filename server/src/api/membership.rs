//! Membership plan catalog and per-company state
//!
//! Activation itself only happens through order finalization.

use axum::Json;
use axum::extract::State;
use axum::Extension;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::auth::Identity;
use crate::db;
use crate::db::plans::MembershipPlan;
use crate::state::AppState;

use super::ApiResult;

pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Vec<MembershipPlan>> {
    Ok(Json(db::plans::list(&state.pool).await?))
}

#[derive(Serialize)]
pub struct MembershipState {
    /// "active" | "expired" | "none"
    pub status: &'static str,
    pub plan_id: Option<String>,
    pub purchased_at: Option<i64>,
    /// None for lifetime memberships (and when there is no membership)
    pub expires_at: Option<i64>,
}

pub async fn my_membership(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<MembershipState> {
    let company = db::companies::find_by_id(&state.pool, &identity.company_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;

    let status = match (&company.membership_plan_id, company.membership_expires_at) {
        (None, _) => "none",
        // lifetime plans store no expiry
        (Some(_), None) => "active",
        (Some(_), Some(expiry)) if expiry > now_millis() => "active",
        (Some(_), Some(_)) => "expired",
    };

    Ok(Json(MembershipState {
        status,
        plan_id: company.membership_plan_id,
        purchased_at: company.membership_purchased_at,
        expires_at: company.membership_expires_at,
    }))
}
