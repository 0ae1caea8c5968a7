//! Invoice listing and detail

use axum::Json;
use axum::extract::{Path, State};
use axum::Extension;
use shared::error::{AppError, ErrorCode};

use crate::auth::Identity;
use crate::db;
use crate::db::invoices::Invoice;
use crate::state::AppState;

use super::ApiResult;

pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<Invoice>> {
    let invoices = if identity.is_admin() {
        db::invoices::list_all(&state.pool).await?
    } else {
        db::invoices::list_for_company(&state.pool, &identity.company_id).await?
    };
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Invoice> {
    let invoice = db::invoices::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvoiceNotFound))?;

    if invoice.company_id != identity.company_id && !identity.is_admin() {
        return Err(AppError::new(ErrorCode::PermissionDenied).into());
    }

    Ok(Json(invoice))
}
