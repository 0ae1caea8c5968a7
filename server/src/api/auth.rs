//! Registration and login
//!
//! POST /api/auth/register — create a company account + welcome email
//! POST /api/auth/login    — verify credentials, issue a session JWT
//! GET  /api/auth/me       — echo the authenticated identity

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;
use sqlx::error::DatabaseError;

use crate::auth::{Identity, create_token};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::{db, email, util};

use super::ApiResult;

/// A concurrent registration can slip past the pre-insert lookup and hit the
/// unique index on companies.email; that surfaces as EmailTaken, not a 500.
fn map_company_insert_error(e: sqlx::Error) -> ServiceError {
    if e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
    {
        return AppError::new(ErrorCode::EmailTaken).into();
    }
    e.into()
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub company_id: String,
    pub email: String,
    pub role: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<SessionResponse> {
    let email_addr = req.email.trim().to_lowercase();

    if email_addr.is_empty() || !email_addr.contains('@') {
        return Err(AppError::validation("Invalid email").into());
    }
    if req.password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }
    let company_name = req.company_name.trim();
    if company_name.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "company_name is required").into());
    }

    if db::companies::find_by_email(&state.pool, &email_addr)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailTaken).into());
    }

    let hashed = util::hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    let company_id = uuid::Uuid::new_v4().to_string();
    db::companies::create(
        &state.pool,
        &company_id,
        &email_addr,
        &hashed,
        company_name,
        now_millis(),
    )
    .await
    .map_err(map_company_insert_error)?;

    tracing::info!(company_id = %company_id, "Company registered");

    // Welcome email is best-effort
    if let Err(e) =
        email::send_welcome(&state.ses, &state.ses_from_email, &email_addr, company_name).await
    {
        tracing::warn!(error = %e, "Welcome email failed");
    }

    let token = create_token(&company_id, &email_addr, "company", &state.jwt_secret)
        .map_err(|e| {
            tracing::error!(error = %e, "Token creation failed");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(SessionResponse {
        token,
        company_id,
        email: email_addr,
        role: "company".to_owned(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let email_addr = req.email.trim().to_lowercase();

    let company = db::companies::find_by_email(&state.pool, &email_addr)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if company.status != "active" {
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }
    if !util::verify_password(&req.password, &company.hashed_password) {
        return Err(AppError::new(ErrorCode::InvalidCredentials).into());
    }

    let token = create_token(&company.id, &company.email, &company.role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!(error = %e, "Token creation failed");
            AppError::new(ErrorCode::InternalError)
        })?;

    tracing::info!(company_id = %company.id, "Login");

    Ok(Json(SessionResponse {
        token,
        company_id: company.id,
        email: company.email,
        role: company.role,
    }))
}

pub async fn me(Extension(identity): Extension<Identity>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "company_id": identity.company_id,
        "email": identity.email,
        "role": identity.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DuplicateEmail;

    impl std::fmt::Display for DuplicateEmail {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"companies_email_key\"")
        }
    }

    impl std::error::Error for DuplicateEmail {}

    impl sqlx::error::DatabaseError for DuplicateEmail {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"companies_email_key\""
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_maps_to_email_taken() {
        let err = sqlx::Error::Database(Box::new(DuplicateEmail));
        match map_company_insert_error(err) {
            ServiceError::App(app) => assert_eq!(app.code, ErrorCode::EmailTaken),
            other => panic!("expected EmailTaken, got {other:?}"),
        }
    }

    #[test]
    fn other_db_errors_pass_through() {
        match map_company_insert_error(sqlx::Error::RowNotFound) {
            ServiceError::Db(_) => {}
            other => panic!("expected Db error, got {other:?}"),
        }
    }
}
