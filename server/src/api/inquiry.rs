//! Contact-form inquiries

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::db;
use crate::db::inquiries::Inquiry;
use crate::state::AppState;
use crate::email;

use super::ApiResult;

#[derive(Deserialize)]
pub struct InquiryRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// POST /api/inquiries (public)
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(req): Json<InquiryRequest>,
) -> ApiResult<serde_json::Value> {
    let email_addr = req.email.trim().to_lowercase();
    if email_addr.is_empty() || !email_addr.contains('@') {
        return Err(AppError::validation("Invalid email").into());
    }
    let name = req.name.trim();
    let subject = req.subject.trim();
    let message = req.message.trim();
    if name.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "name, subject and message are required",
        )
        .into());
    }

    let id = uuid::Uuid::new_v4().to_string();
    db::inquiries::create(&state.pool, &id, name, &email_addr, subject, message, now_millis())
        .await?;

    tracing::info!(inquiry_id = %id, "Inquiry received");

    // Acknowledgement email is best-effort
    if let Err(e) =
        email::send_inquiry_ack(&state.ses, &state.ses_from_email, &email_addr, name, subject)
            .await
    {
        tracing::warn!(error = %e, "Inquiry acknowledgement email failed");
    }

    Ok(Json(serde_json::json!({ "id": id })))
}

/// GET /api/inquiries (admin)
pub async fn list_inquiries(State(state): State<AppState>) -> ApiResult<Vec<Inquiry>> {
    Ok(Json(db::inquiries::list(&state.pool).await?))
}

#[derive(Deserialize)]
pub struct UpdateInquiryRequest {
    /// "open" | "resolved"
    pub status: String,
}

/// PATCH /api/inquiries/:id (admin)
pub async fn update_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInquiryRequest>,
) -> ApiResult<serde_json::Value> {
    if !matches!(req.status.as_str(), "open" | "resolved") {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "status must be open or resolved",
        )
        .into());
    }

    let updated = db::inquiries::update_status(&state.pool, &id, &req.status).await?;
    if updated == 0 {
        return Err(AppError::new(ErrorCode::InquiryNotFound).into());
    }
    Ok(Json(serde_json::json!({ "status": req.status })))
}
