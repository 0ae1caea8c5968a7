//! Events and their inventory
//!
//! Public browsing of events, booths, tickets, sponsor tiers, and hotel
//! rooms; admin CRUD for all of them.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::commerce::ProductType;
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::db;
use crate::db::events::{Event, NewEvent};
use crate::db::inventory::{Booth, RoomType, SponsorType, TicketType};
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct EventRequest {
    pub name: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub description: Option<String>,
    pub banner_key: Option<String>,
    /// Only honored on update
    pub status: Option<String>,
}

const EVENT_STATUSES: [&str; 4] = ["upcoming", "ongoing", "completed", "cancelled"];

/// Status for an event update: an explicit value must be in the known set,
/// an absent one keeps the stored status.
fn resolve_event_status(requested: Option<&str>, current: &str) -> Result<String, AppError> {
    match requested {
        Some(raw) => {
            let status = raw.trim().to_lowercase();
            if EVENT_STATUSES.contains(&status.as_str()) {
                Ok(status)
            } else {
                Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    format!("Unknown event status: {raw}"),
                ))
            }
        }
        None => Ok(current.to_owned()),
    }
}

fn validate_event(req: &EventRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "name is required"));
    }
    if req.ends_at < req.starts_at {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "ends_at must not precede starts_at",
        ));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> ApiResult<Event> {
    validate_event(&req)?;

    let id = uuid::Uuid::new_v4().to_string();
    let new_event = NewEvent {
        id: &id,
        name: req.name.trim(),
        venue: req.venue.as_deref(),
        city: req.city.as_deref(),
        country: req.country.as_deref(),
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        description: req.description.as_deref(),
        banner_key: req.banner_key.as_deref(),
        now: now_millis(),
    };
    db::events::create(&state.pool, &new_event).await?;

    tracing::info!(event_id = %id, "Event created");

    let event = db::events::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
    Ok(Json(event))
}

pub async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    Ok(Json(db::events::list(&state.pool).await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Event> {
    let event = db::events::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EventRequest>,
) -> ApiResult<Event> {
    validate_event(&req)?;

    let existing = db::events::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
    let status = resolve_event_status(req.status.as_deref(), &existing.status)?;

    let new_event = NewEvent {
        id: &id,
        name: req.name.trim(),
        venue: req.venue.as_deref(),
        city: req.city.as_deref(),
        country: req.country.as_deref(),
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        description: req.description.as_deref(),
        banner_key: req.banner_key.as_deref(),
        now: now_millis(),
    };
    let updated = db::events::update(&state.pool, &new_event, &status).await?;
    if updated == 0 {
        return Err(AppError::new(ErrorCode::EventNotFound).into());
    }

    let event = db::events::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::events::delete(&state.pool, &id).await?;
    if deleted == 0 {
        return Err(AppError::new(ErrorCode::EventNotFound).into());
    }
    tracing::info!(event_id = %id, "Event deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ── Inventory ──

async fn require_event(state: &AppState, event_id: &str) -> Result<(), crate::error::ServiceError> {
    db::events::find_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
    Ok(())
}

fn validate_inventory(price: Decimal, quantity: i32) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::with_message(ErrorCode::ValueOutOfRange, "price must not be negative"));
    }
    if quantity < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "quantity must not be negative",
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct BoothRequest {
    pub label: String,
    pub price: Decimal,
    pub quantity: i32,
}

pub async fn create_booth(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<BoothRequest>,
) -> ApiResult<serde_json::Value> {
    require_event(&state, &event_id).await?;
    validate_inventory(req.price, req.quantity)?;

    let id = uuid::Uuid::new_v4().to_string();
    db::inventory::create_booth(&state.pool, &id, &event_id, &req.label, req.price, req.quantity)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn list_booths(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Vec<Booth>> {
    require_event(&state, &event_id).await?;
    Ok(Json(db::inventory::list_booths(&state.pool, &event_id).await?))
}

#[derive(Deserialize)]
pub struct InventoryRequest {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

pub async fn create_ticket_type(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<InventoryRequest>,
) -> ApiResult<serde_json::Value> {
    require_event(&state, &event_id).await?;
    validate_inventory(req.price, req.quantity)?;

    let id = uuid::Uuid::new_v4().to_string();
    db::inventory::create_ticket_type(
        &state.pool,
        &id,
        &event_id,
        &req.name,
        req.price,
        req.quantity,
    )
    .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Vec<TicketType>> {
    require_event(&state, &event_id).await?;
    Ok(Json(db::inventory::list_ticket_types(&state.pool, &event_id).await?))
}

pub async fn create_sponsor_type(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<InventoryRequest>,
) -> ApiResult<serde_json::Value> {
    require_event(&state, &event_id).await?;
    validate_inventory(req.price, req.quantity)?;

    let id = uuid::Uuid::new_v4().to_string();
    db::inventory::create_sponsor_type(
        &state.pool,
        &id,
        &event_id,
        &req.name,
        req.price,
        req.quantity,
    )
    .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn list_sponsorships(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Vec<SponsorType>> {
    require_event(&state, &event_id).await?;
    Ok(Json(db::inventory::list_sponsor_types(&state.pool, &event_id).await?))
}

#[derive(Deserialize)]
pub struct RoomRequest {
    pub hotel_name: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

pub async fn create_room_type(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<RoomRequest>,
) -> ApiResult<serde_json::Value> {
    require_event(&state, &event_id).await?;
    validate_inventory(req.price, req.quantity)?;

    let id = uuid::Uuid::new_v4().to_string();
    db::inventory::create_room_type(
        &state.pool,
        &id,
        &event_id,
        &req.hotel_name,
        &req.name,
        req.price,
        req.quantity,
    )
    .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn list_rooms(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Vec<RoomType>> {
    require_event(&state, &event_id).await?;
    Ok(Json(db::inventory::list_room_types(&state.pool, &event_id).await?))
}

/// DELETE /api/events/:id/inventory/:kind/:item_id
///
/// `kind` uses the public product-type names (ticket, booth, sponsorship,
/// hotel_room).
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path((event_id, kind, item_id)): Path<(String, String, String)>,
) -> ApiResult<serde_json::Value> {
    require_event(&state, &event_id).await?;

    let product_type = ProductType::classify(&kind);
    if !product_type.is_event_scoped() {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            format!("Unknown inventory kind: {kind}"),
        )
        .into());
    }

    let deleted = db::inventory::delete_item(&state.pool, product_type, &item_id, &event_id).await?;
    if deleted == 0 {
        return Err(AppError::with_message(ErrorCode::NotFound, "Inventory item not found").into());
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_status_keeps_the_stored_one() {
        assert_eq!(resolve_event_status(None, "ongoing").unwrap(), "ongoing");
    }

    #[test]
    fn explicit_status_must_be_known() {
        assert_eq!(
            resolve_event_status(Some("Completed"), "upcoming").unwrap(),
            "completed"
        );
        let err = resolve_event_status(Some("archived"), "upcoming").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
