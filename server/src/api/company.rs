//! Company directory and profiles

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::auth::Identity;
use crate::db;
use crate::db::companies::Company;
use crate::state::AppState;

use super::ApiResult;

/// Public-safe view of a company row (no credentials)
#[derive(Serialize)]
pub struct CompanyView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub logo_key: Option<String>,
    pub membership_plan_id: Option<String>,
    pub membership_expires_at: Option<i64>,
    pub created_at: i64,
}

impl From<Company> for CompanyView {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            country: c.country,
            website: c.website,
            logo_key: c.logo_key,
            membership_plan_id: c.membership_plan_id,
            membership_expires_at: c.membership_expires_at,
            created_at: c.created_at,
        }
    }
}

pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Vec<CompanyView>> {
    let companies = db::companies::list(&state.pool).await?;
    Ok(Json(companies.into_iter().map(CompanyView::from).collect()))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CompanyView> {
    let company = db::companies::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;
    Ok(Json(company.into()))
}

#[derive(Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub logo_key: Option<String>,
}

/// PUT /api/companies/:id — companies edit themselves; admins edit anyone
pub async fn update_company(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCompanyRequest>,
) -> ApiResult<CompanyView> {
    if identity.company_id != id && !identity.is_admin() {
        return Err(AppError::new(ErrorCode::PermissionDenied).into());
    }

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "name is required").into());
    }

    let updated = db::companies::update_profile(
        &state.pool,
        &id,
        name,
        req.phone.as_deref(),
        req.country.as_deref(),
        req.website.as_deref(),
        req.logo_key.as_deref(),
    )
    .await?;
    if updated == 0 {
        return Err(AppError::new(ErrorCode::CompanyNotFound).into());
    }

    let company = db::companies::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;
    Ok(Json(company.into()))
}

/// DELETE /api/companies/:id (admin) — soft delete
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::companies::delete(&state.pool, &id).await?;
    if deleted == 0 {
        return Err(AppError::new(ErrorCode::CompanyNotFound).into());
    }
    tracing::info!(company_id = %id, "Company deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}
