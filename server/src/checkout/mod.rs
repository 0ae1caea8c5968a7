//! Checkout pipeline: classify cart items, price them, apply an optional
//! coupon, and persist the pending order atomically.
//!
//! Two entry points share the pipeline: general checkout (memberships and
//! generic products only) and event checkout (event-scoped inventory).

pub mod finalize;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::commerce::{CouponKind, ProductType};
use shared::error::{AppError, ErrorCode};
use shared::util::{now_millis, snowflake_id};

use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    /// Coupon id or code (code matched case-insensitively)
    pub coupon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub product_type: String,
    pub product_id: String,
    pub quantity: u32,
    /// Client-declared price, only honored for generic products
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub order_id: i64,
    pub status: &'static str,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

/// Discount for a coupon against a subtotal.
///
/// Fixed coupons are clamped to the subtotal; percent coupons are clamped to
/// 0..=100 and rounded to cents (half away from zero). Never negative.
pub fn compute_discount(subtotal: Decimal, kind: CouponKind, value: Decimal) -> Decimal {
    let discount = match kind {
        CouponKind::Fixed => value.min(subtotal),
        CouponKind::Percent => {
            let pct = value.clamp(Decimal::ZERO, Decimal::from(100));
            (subtotal * pct / Decimal::from(100))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
    };
    discount.max(Decimal::ZERO)
}

/// Final total: subtotal minus discount, floored at zero.
pub fn apply_discount(subtotal: Decimal, discount: Decimal) -> Decimal {
    (subtotal - discount).max(Decimal::ZERO)
}

/// Resolve the coupon reference (id first, then code) and compute the
/// discount. Returns the coupon id alongside so the order can record it.
async fn resolve_coupon(
    state: &AppState,
    reference: &str,
    subtotal: Decimal,
) -> ServiceResult<(String, Decimal)> {
    let coupon = match db::coupons::find_by_id(&state.pool, reference).await? {
        Some(c) => c,
        None => db::coupons::find_by_code(&state.pool, reference)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CouponNotFound))?,
    };

    let kind = CouponKind::from_db(&coupon.kind).ok_or_else(|| {
        tracing::error!(coupon_id = %coupon.id, kind = %coupon.kind, "Unrecognized coupon kind");
        AppError::new(ErrorCode::CouponInvalid)
    })?;

    Ok((coupon.id, compute_discount(subtotal, kind, coupon.value)))
}

struct PricedItem {
    product_type: ProductType,
    product_id: String,
    quantity: i32,
    unit_price: Decimal,
}

fn validate_quantity(item: &CheckoutItem) -> Result<i32, AppError> {
    if item.quantity == 0 || item.quantity > 1000 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Invalid quantity for {}", item.product_id),
        ));
    }
    Ok(item.quantity as i32)
}

/// Event-scoped types cannot go through general checkout.
fn ensure_general_allowed(product_type: ProductType) -> Result<(), AppError> {
    if product_type.is_event_scoped() {
        return Err(AppError::new(ErrorCode::EventRequired)
            .with_detail("product_type", product_type.as_db()));
    }
    Ok(())
}

/// Price one item for general (non-event) checkout.
///
/// Event-scoped types are rejected outright; memberships are priced from the
/// plan catalog; generic products use the client-declared price.
async fn price_general_item(state: &AppState, item: &CheckoutItem) -> ServiceResult<PricedItem> {
    let product_type = ProductType::classify(&item.product_type);
    let quantity = validate_quantity(item)?;

    ensure_general_allowed(product_type)?;

    let unit_price = match product_type {
        ProductType::Membership => {
            let plan = db::plans::find_by_id(&state.pool, &item.product_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::MembershipPlanNotFound))?;
            plan.price
        }
        _ => item
            .unit_price
            .filter(|p| p >= &Decimal::ZERO)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::RequiredField,
                    format!("unit_price is required for product {}", item.product_id),
                )
            })?,
    };

    Ok(PricedItem {
        product_type,
        product_id: item.product_id.clone(),
        quantity,
        unit_price,
    })
}

/// Price one item for event checkout. Event-scoped items must reference
/// inventory belonging to this event; the catalog price always wins.
async fn price_event_item(
    state: &AppState,
    event_id: &str,
    item: &CheckoutItem,
) -> ServiceResult<PricedItem> {
    let product_type = ProductType::classify(&item.product_type);
    let quantity = validate_quantity(item)?;

    let unit_price = if product_type.is_event_scoped() {
        db::inventory::price_in_event(&state.pool, product_type, &item.product_id, event_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ProductNotInEvent)
                    .with_detail("product_id", item.product_id.clone())
            })?
    } else if product_type == ProductType::Membership {
        let plan = db::plans::find_by_id(&state.pool, &item.product_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::MembershipPlanNotFound))?;
        plan.price
    } else {
        item.unit_price
            .filter(|p| p >= &Decimal::ZERO)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::RequiredField,
                    format!("unit_price is required for product {}", item.product_id),
                )
            })?
    };

    Ok(PricedItem {
        product_type,
        product_id: item.product_id.clone(),
        quantity,
        unit_price,
    })
}

async fn persist_order(
    state: &AppState,
    company_id: &str,
    event_id: Option<&str>,
    priced: Vec<PricedItem>,
    coupon: Option<&str>,
) -> ServiceResult<OrderSummary> {
    let subtotal: Decimal = priced
        .iter()
        .map(|p| p.unit_price * Decimal::from(p.quantity))
        .sum();

    let (coupon_id, discount_amount) = match coupon {
        Some(reference) => {
            let (id, discount) = resolve_coupon(state, reference, subtotal).await?;
            (Some(id), discount)
        }
        None => (None, Decimal::ZERO),
    };
    let total = apply_discount(subtotal, discount_amount);

    let order_id = snowflake_id();
    let items: Vec<db::orders::NewOrderItem> = priced
        .into_iter()
        .map(|p| db::orders::NewOrderItem {
            product_type: p.product_type.as_db().to_owned(),
            product_id: p.product_id,
            quantity: p.quantity,
            unit_price: p.unit_price,
        })
        .collect();

    let order = db::orders::NewOrder {
        id: order_id,
        company_id,
        event_id,
        subtotal,
        discount_amount,
        total,
        coupon_id: coupon_id.as_deref(),
        now: now_millis(),
    };
    db::orders::create_with_items(&state.pool, &order, &items).await?;

    tracing::info!(
        order_id,
        company_id = %company_id,
        %total,
        "Order created"
    );

    Ok(OrderSummary {
        order_id,
        status: "PENDING",
        subtotal,
        discount_amount,
        total,
    })
}

/// General checkout: memberships and generic products, no event context.
pub async fn submit_general(
    state: &AppState,
    company_id: &str,
    request: CheckoutRequest,
) -> ServiceResult<OrderSummary> {
    if request.items.is_empty() {
        return Err(ServiceError::App(AppError::new(ErrorCode::OrderEmpty)));
    }

    let mut priced = Vec::with_capacity(request.items.len());
    for item in &request.items {
        priced.push(price_general_item(state, item).await?);
    }

    persist_order(state, company_id, None, priced, request.coupon.as_deref()).await
}

/// Event checkout: inventory items scoped to one event.
pub async fn submit_for_event(
    state: &AppState,
    company_id: &str,
    event_id: &str,
    request: CheckoutRequest,
) -> ServiceResult<OrderSummary> {
    if request.items.is_empty() {
        return Err(ServiceError::App(AppError::new(ErrorCode::OrderEmpty)));
    }

    db::events::find_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;

    let mut priced = Vec::with_capacity(request.items.len());
    for item in &request.items {
        priced.push(price_event_item(state, event_id, item).await?);
    }

    persist_order(
        state,
        company_id,
        Some(event_id),
        priced,
        request.coupon.as_deref(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn fixed_coupon_on_thousand() {
        let subtotal = dec("1000.00");
        let discount = compute_discount(subtotal, CouponKind::Fixed, dec("100"));
        assert_eq!(discount, dec("100"));
        assert_eq!(apply_discount(subtotal, discount), dec("900.00"));
    }

    #[test]
    fn percent_coupon_on_two_fifty() {
        let subtotal = dec("250.00");
        let discount = compute_discount(subtotal, CouponKind::Percent, dec("20"));
        assert_eq!(discount, dec("50.00"));
        assert_eq!(apply_discount(subtotal, discount), dec("200.00"));
    }

    #[test]
    fn fixed_coupon_clamped_to_subtotal() {
        let subtotal = dec("30.00");
        let discount = compute_discount(subtotal, CouponKind::Fixed, dec("100"));
        assert_eq!(discount, dec("30.00"));
        assert_eq!(apply_discount(subtotal, discount), Decimal::ZERO);
    }

    #[test]
    fn percent_rounds_to_cents_half_up() {
        // 33.33 * 15% = 4.9995 -> 5.00
        let discount = compute_discount(dec("33.33"), CouponKind::Percent, dec("15"));
        assert_eq!(discount, dec("5.00"));
    }

    #[test]
    fn percent_clamped_to_hundred() {
        let subtotal = dec("80.00");
        let discount = compute_discount(subtotal, CouponKind::Percent, dec("250"));
        assert_eq!(discount, dec("80.00"));
    }

    #[test]
    fn negative_fixed_value_yields_zero_discount() {
        let discount = compute_discount(dec("50.00"), CouponKind::Fixed, dec("-10"));
        assert_eq!(discount, Decimal::ZERO);
    }

    #[test]
    fn total_never_negative() {
        assert_eq!(apply_discount(dec("10.00"), dec("25.00")), Decimal::ZERO);
    }

    #[test]
    fn general_checkout_rejects_event_scoped_type_strings() {
        // Every spelling a client may send for event inventory must bounce
        // with the "requires an event" error, never price as a generic product.
        for raw in [
            "TICKET",
            "SPONSOR",
            "SPONSORSHIP",
            "HOTEL",
            "HOTEL_ROOM",
            "BOOTH",
            "booth",
        ] {
            let err = ensure_general_allowed(ProductType::classify(raw)).expect_err(raw);
            assert_eq!(err.code, ErrorCode::EventRequired, "{raw}");
            assert!(
                err.message.contains("requires an event"),
                "{raw}: {}",
                err.message
            );
        }

        assert!(ensure_general_allowed(ProductType::classify("MEMBERSHIP")).is_ok());
        assert!(ensure_general_allowed(ProductType::classify("SWAG")).is_ok());
    }
}
