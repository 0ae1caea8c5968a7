//! Media uploads via presigned S3 URLs
//!
//! The server never proxies bytes: clients PUT directly to S3 and database
//! rows reference the object key.

use axum::Json;
use axum::extract::{Query, State};
use axum::Extension;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use std::time::Duration;

use crate::auth::Identity;
use crate::state::AppState;

use super::ApiResult;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "pdf"];

const PUT_EXPIRY: Duration = Duration::from_secs(15 * 60);
const GET_EXPIRY: Duration = Duration::from_secs(60 * 60);

#[derive(Deserialize)]
pub struct PresignRequest {
    /// Original filename, used only for its extension
    pub filename: String,
}

#[derive(Serialize)]
pub struct PresignResponse {
    pub key: String,
    pub upload_url: String,
    pub expires_in_secs: u64,
}

/// POST /api/uploads/presign
pub async fn presign_upload(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<PresignRequest>,
) -> ApiResult<PresignResponse> {
    let ext = req
        .filename
        .rsplit('.')
        .next()
        .map(|e| e.to_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| AppError::new(ErrorCode::InvalidFileExtension))?;

    let key = format!(
        "uploads/{}/{}.{ext}",
        identity.company_id,
        uuid::Uuid::new_v4()
    );

    let presigning = presigning_config(PUT_EXPIRY)?;
    let presigned = state
        .s3
        .put_object()
        .bucket(&state.media_s3_bucket)
        .key(&key)
        .presigned(presigning)
        .await
        .map_err(|e| {
            tracing::error!(key = %key, error = %e, "Failed to presign upload");
            AppError::new(ErrorCode::StorageFailed)
        })?;

    Ok(Json(PresignResponse {
        key,
        upload_url: presigned.uri().to_string(),
        expires_in_secs: PUT_EXPIRY.as_secs(),
    }))
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    pub key: String,
}

#[derive(Serialize)]
pub struct DownloadResponse {
    pub url: String,
    pub expires_in_secs: u64,
}

/// GET /api/uploads/url?key=...
pub async fn presigned_download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<DownloadResponse> {
    if !query.key.starts_with("uploads/") {
        return Err(AppError::with_message(ErrorCode::InvalidRequest, "Unknown object key").into());
    }

    let presigning = presigning_config(GET_EXPIRY)?;
    let presigned = state
        .s3
        .get_object()
        .bucket(&state.media_s3_bucket)
        .key(&query.key)
        .presigned(presigning)
        .await
        .map_err(|e| {
            tracing::error!(key = %query.key, error = %e, "Failed to presign download");
            AppError::new(ErrorCode::StorageFailed)
        })?;

    Ok(Json(DownloadResponse {
        url: presigned.uri().to_string(),
        expires_in_secs: GET_EXPIRY.as_secs(),
    }))
}

fn presigning_config(
    expiry: Duration,
) -> Result<aws_sdk_s3::presigning::PresigningConfig, AppError> {
    aws_sdk_s3::presigning::PresigningConfig::expires_in(expiry).map_err(|e| {
        tracing::error!(error = %e, "Failed to create presigning config");
        AppError::new(ErrorCode::StorageFailed)
    })
}
