//! API routes
//!
//! Three layers of access:
//! - public: auth, health, event browsing, inquiries, analytics tracking,
//!   chat handshake
//! - authenticated: companies, checkout, orders, invoices, memberships,
//!   uploads
//! - admin: event/inventory/coupon management, order finalization,
//!   inquiry triage, analytics summary

pub mod analytics;
pub mod auth;
pub mod chat_ws;
pub mod checkout;
pub mod company;
pub mod coupon;
pub mod event;
pub mod health;
pub mod inquiry;
pub mod invoice;
pub mod membership;
pub mod order;
pub mod upload;

use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router, middleware};

use crate::auth::rate_limit;
use crate::auth::{admin_middleware, auth_middleware};
use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: JSON body or a typed error response
pub type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Login/registration, per-IP rate limited
    let login = Router::new()
        .route("/api/auth/login", post(auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::login_rate_limit,
        ));
    let register = Router::new()
        .route("/api/auth/register", post(auth::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::register_rate_limit,
        ));

    // Public, no auth
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/events", get(event::list_events))
        .route("/api/events/{id}", get(event::get_event))
        .route("/api/events/{id}/booths", get(event::list_booths))
        .route("/api/events/{id}/tickets", get(event::list_tickets))
        .route("/api/events/{id}/sponsorships", get(event::list_sponsorships))
        .route("/api/events/{id}/rooms", get(event::list_rooms))
        .route("/api/memberships/plans", get(membership::list_plans))
        .route("/api/inquiries", post(inquiry::submit_inquiry))
        .route("/api/analytics/track", post(analytics::track))
        .route("/api/chat/ws", get(chat_ws::handle_chat_ws));

    // Authenticated companies
    let authed = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/companies", get(company::list_companies))
        .route("/api/companies/{id}", get(company::get_company))
        .route("/api/companies/{id}", put(company::update_company))
        .route("/api/checkout", post(checkout::general_checkout))
        .route("/api/events/{id}/checkout", post(checkout::event_checkout))
        .route("/api/orders", get(order::list_orders))
        .route("/api/orders/{id}", get(order::get_order))
        .route("/api/invoices", get(invoice::list_invoices))
        .route("/api/invoices/{id}", get(invoice::get_invoice))
        .route("/api/memberships/me", get(membership::my_membership))
        .route("/api/uploads/presign", post(upload::presign_upload))
        .route("/api/uploads/url", get(upload::presigned_download))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin only
    let admin = Router::new()
        .route("/api/events", post(event::create_event))
        .route("/api/events/{id}", put(event::update_event))
        .route("/api/events/{id}", delete(event::delete_event))
        .route("/api/events/{id}/booths", post(event::create_booth))
        .route("/api/events/{id}/tickets", post(event::create_ticket_type))
        .route(
            "/api/events/{id}/sponsorships",
            post(event::create_sponsor_type),
        )
        .route("/api/events/{id}/rooms", post(event::create_room_type))
        .route(
            "/api/events/{id}/inventory/{kind}/{item_id}",
            delete(event::delete_inventory_item),
        )
        .route("/api/companies/{id}", delete(company::delete_company))
        .route("/api/orders/{id}/mark-paid", post(order::mark_paid))
        .route("/api/orders/{id}", delete(order::delete_order))
        .route("/api/coupons", post(coupon::create_coupon))
        .route("/api/coupons", get(coupon::list_coupons))
        .route("/api/coupons/{id}", delete(coupon::delete_coupon))
        .route("/api/inquiries", get(inquiry::list_inquiries))
        .route("/api/inquiries/{id}", patch(inquiry::update_inquiry))
        .route("/api/analytics/summary", get(analytics::summary))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(register)
        .merge(authed)
        .merge(admin)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
