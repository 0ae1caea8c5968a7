//! Order finalization: the admin "mark paid" transition.
//!
//! Everything that must hold together — status flip, inventory decrements,
//! membership activation, invoice row — happens in one transaction. The
//! confirmation email goes out after commit and is best-effort.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::commerce::ProductType;
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;
use sqlx::{Postgres, Transaction};

use crate::db;
use crate::email;
use crate::error::ServiceResult;
use crate::state::AppState;

const MEMBERSHIP_TERM_DAYS: i64 = 365;
const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Serialize)]
pub struct FinalizedOrder {
    pub order_id: i64,
    pub status: &'static str,
    pub total: Decimal,
    pub invoice_number: String,
    pub completed_at: i64,
}

/// New expiry for a non-lifetime membership purchase.
///
/// Extends from the current expiry when it is still in the future, otherwise
/// starts a fresh term from now. Lifetime plans are handled by the caller
/// (expiry stored as NULL).
pub fn extend_membership(current_expiry: Option<i64>, now: i64) -> i64 {
    let base = match current_expiry {
        Some(expiry) if expiry > now => expiry,
        _ => now,
    };
    base + MEMBERSHIP_TERM_DAYS * DAY_MILLIS
}

async fn activate_membership(
    tx: &mut Transaction<'_, Postgres>,
    company_id: &str,
    plan_id: &str,
    now: i64,
) -> ServiceResult<()> {
    let plan: Option<db::plans::MembershipPlan> =
        sqlx::query_as("SELECT * FROM membership_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&mut **tx)
            .await?;
    let plan = plan.ok_or_else(|| AppError::new(ErrorCode::MembershipPlanNotFound))?;

    let current: Option<(Option<i64>,)> =
        sqlx::query_as("SELECT membership_expires_at FROM companies WHERE id = $1 FOR UPDATE")
            .bind(company_id)
            .fetch_optional(&mut **tx)
            .await?;
    let current_expiry = current
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?
        .0;

    let expires_at = if plan.lifetime {
        None
    } else {
        Some(extend_membership(current_expiry, now))
    };

    sqlx::query(
        "UPDATE companies
         SET membership_plan_id = $1, membership_purchased_at = $2, membership_expires_at = $3
         WHERE id = $4",
    )
    .bind(&plan.id)
    .bind(now)
    .bind(expires_at)
    .bind(company_id)
    .execute(&mut **tx)
    .await?;

    tracing::info!(
        company_id = %company_id,
        plan_id = %plan.id,
        lifetime = plan.lifetime,
        "Membership activated"
    );
    Ok(())
}

/// Mark an order paid. Rejects unknown and already-completed orders; commits
/// the COMPLETED status, stock decrements, membership activation, and the
/// invoice atomically.
pub async fn finalize_order(state: &AppState, order_id: i64) -> ServiceResult<FinalizedOrder> {
    let now = now_millis();
    let mut tx = state.pool.begin().await?;

    let order = db::orders::find_for_update(&mut tx, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if order.status == "COMPLETED" {
        return Err(AppError::new(ErrorCode::OrderAlreadyCompleted).into());
    }

    let items = db::orders::items_in_tx(&mut tx, order_id).await?;

    db::orders::mark_completed(&mut tx, order_id, now).await?;

    for item in &items {
        let Some(product_type) = ProductType::from_db(&item.product_type) else {
            tracing::warn!(
                order_id,
                product_type = %item.product_type,
                "Skipping item with unrecognized product type"
            );
            continue;
        };

        if product_type.is_event_scoped() {
            // Failed decrements (missing row, insufficient stock) do not fail
            // the order; they are logged for manual reconciliation.
            match db::inventory::decrement_stock(
                &mut tx,
                product_type,
                &item.product_id,
                item.quantity,
            )
            .await
            {
                Ok(0) => tracing::warn!(
                    order_id,
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "Stock decrement skipped: row missing or insufficient stock"
                ),
                Ok(_) => {}
                Err(e) => tracing::error!(
                    order_id,
                    product_id = %item.product_id,
                    error = %e,
                    "Stock decrement failed"
                ),
            }
        }

        if product_type == ProductType::Membership {
            activate_membership(&mut tx, &order.company_id, &item.product_id, now).await?;
        }
    }

    let year = Utc::now().year();
    let invoice_number = db::invoices::next_number(&mut tx, year).await?;
    let invoice_id = uuid::Uuid::new_v4().to_string();
    db::invoices::create(
        &mut tx,
        &invoice_id,
        order_id,
        &order.company_id,
        &invoice_number,
        order.total,
        now,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(order_id, invoice = %invoice_number, "Order completed");

    // Confirmation email is best-effort, outside the transaction.
    match db::companies::find_by_id(&state.pool, &order.company_id).await {
        Ok(Some(company)) => {
            if let Err(e) = email::send_order_confirmation(
                &state.ses,
                &state.ses_from_email,
                &company.email,
                order_id,
                &invoice_number,
                order.total,
            )
            .await
            {
                tracing::warn!(order_id, error = %e, "Order confirmation email failed");
            }
        }
        Ok(None) => tracing::warn!(
            order_id,
            company_id = %order.company_id,
            "Company not found, confirmation email skipped"
        ),
        Err(e) => tracing::warn!(
            order_id,
            company_id = %order.company_id,
            error = %e,
            "Company lookup for confirmation email failed"
        ),
    }

    Ok(FinalizedOrder {
        order_id,
        status: "COMPLETED",
        total: order.total,
        invoice_number,
        completed_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i64 = MEMBERSHIP_TERM_DAYS * DAY_MILLIS;

    #[test]
    fn fresh_membership_runs_a_year_from_now() {
        let now = 1_700_000_000_000;
        assert_eq!(extend_membership(None, now), now + YEAR);
    }

    #[test]
    fn expired_membership_restarts_from_now() {
        let now = 1_700_000_000_000;
        let expired = now - 10 * DAY_MILLIS;
        assert_eq!(extend_membership(Some(expired), now), now + YEAR);
    }

    #[test]
    fn active_membership_extends_from_current_expiry() {
        let now = 1_700_000_000_000;
        let future = now + 30 * DAY_MILLIS;
        assert_eq!(extend_membership(Some(future), now), future + YEAR);
    }
}
