//! Per-event inventory: booths, ticket types, sponsor tiers, hotel room types.
//!
//! All four tables share the `price` + `quantity` shape; `quantity` is the
//! remaining stock and is only decremented when an order completes.

use rust_decimal::Decimal;
use shared::commerce::ProductType;
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct Booth {
    pub id: String,
    pub event_id: String,
    pub label: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct TicketType {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct SponsorType {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct RoomType {
    pub id: String,
    pub event_id: String,
    pub hotel_name: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

pub async fn create_booth(
    pool: &PgPool,
    id: &str,
    event_id: &str,
    label: &str,
    price: Decimal,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO booths (id, event_id, label, price, quantity) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(event_id)
    .bind(label)
    .bind(price)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_ticket_type(
    pool: &PgPool,
    id: &str,
    event_id: &str,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO ticket_types (id, event_id, name, price, quantity) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(event_id)
    .bind(name)
    .bind(price)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_sponsor_type(
    pool: &PgPool,
    id: &str,
    event_id: &str,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sponsor_types (id, event_id, name, price, quantity) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(event_id)
    .bind(name)
    .bind(price)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_room_type(
    pool: &PgPool,
    id: &str,
    event_id: &str,
    hotel_name: &str,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO room_types (id, event_id, hotel_name, name, price, quantity)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(event_id)
    .bind(hotel_name)
    .bind(name)
    .bind(price)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_booths(pool: &PgPool, event_id: &str) -> Result<Vec<Booth>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM booths WHERE event_id = $1 ORDER BY label")
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn list_ticket_types(
    pool: &PgPool,
    event_id: &str,
) -> Result<Vec<TicketType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM ticket_types WHERE event_id = $1 ORDER BY price")
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn list_sponsor_types(
    pool: &PgPool,
    event_id: &str,
) -> Result<Vec<SponsorType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM sponsor_types WHERE event_id = $1 ORDER BY price")
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn list_room_types(pool: &PgPool, event_id: &str) -> Result<Vec<RoomType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM room_types WHERE event_id = $1 ORDER BY hotel_name, price")
        .bind(event_id)
        .fetch_all(pool)
        .await
}

fn delete_sql(product_type: ProductType) -> Option<&'static str> {
    match product_type {
        ProductType::Booth => Some("DELETE FROM booths WHERE id = $1 AND event_id = $2"),
        ProductType::Ticket => Some("DELETE FROM ticket_types WHERE id = $1 AND event_id = $2"),
        ProductType::Sponsorship => {
            Some("DELETE FROM sponsor_types WHERE id = $1 AND event_id = $2")
        }
        ProductType::HotelRoom => Some("DELETE FROM room_types WHERE id = $1 AND event_id = $2"),
        _ => None,
    }
}

/// Delete an inventory row, scoped to its event. Returns rows affected;
/// `Ok(0)` when the kind has no inventory table or the row is absent.
pub async fn delete_item(
    pool: &PgPool,
    product_type: ProductType,
    id: &str,
    event_id: &str,
) -> Result<u64, sqlx::Error> {
    let Some(sql) = delete_sql(product_type) else {
        return Ok(0);
    };
    let result = sqlx::query(sql).bind(id).bind(event_id).execute(pool).await?;
    Ok(result.rows_affected())
}

fn price_sql(product_type: ProductType) -> Option<&'static str> {
    match product_type {
        ProductType::Booth => Some("SELECT price FROM booths WHERE id = $1 AND event_id = $2"),
        ProductType::Ticket => {
            Some("SELECT price FROM ticket_types WHERE id = $1 AND event_id = $2")
        }
        ProductType::Sponsorship => {
            Some("SELECT price FROM sponsor_types WHERE id = $1 AND event_id = $2")
        }
        ProductType::HotelRoom => {
            Some("SELECT price FROM room_types WHERE id = $1 AND event_id = $2")
        }
        _ => None,
    }
}

/// Look up the catalog price for an event-scoped product, verifying that the
/// product belongs to the event. `Ok(None)` means no such row in this event.
pub async fn price_in_event(
    pool: &PgPool,
    product_type: ProductType,
    product_id: &str,
    event_id: &str,
) -> Result<Option<Decimal>, sqlx::Error> {
    let Some(sql) = price_sql(product_type) else {
        return Ok(None);
    };
    let row: Option<(Decimal,)> = sqlx::query_as(sql)
        .bind(product_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(price,)| price))
}

fn decrement_sql(product_type: ProductType) -> Option<&'static str> {
    match product_type {
        ProductType::Booth => {
            Some("UPDATE booths SET quantity = quantity - $1 WHERE id = $2 AND quantity >= $1")
        }
        ProductType::Ticket => Some(
            "UPDATE ticket_types SET quantity = quantity - $1 WHERE id = $2 AND quantity >= $1",
        ),
        ProductType::Sponsorship => Some(
            "UPDATE sponsor_types SET quantity = quantity - $1 WHERE id = $2 AND quantity >= $1",
        ),
        ProductType::HotelRoom => {
            Some("UPDATE room_types SET quantity = quantity - $1 WHERE id = $2 AND quantity >= $1")
        }
        _ => None,
    }
}

/// Guarded stock decrement inside an open transaction. The `quantity >= $1`
/// guard keeps counters from going negative; returns rows affected (0 when
/// stock is insufficient, the row is missing, or the kind carries no stock).
pub async fn decrement_stock(
    tx: &mut Transaction<'_, Postgres>,
    product_type: ProductType,
    product_id: &str,
    quantity: i32,
) -> Result<u64, sqlx::Error> {
    let Some(sql) = decrement_sql(product_type) else {
        return Ok(0);
    };
    let result = sqlx::query(sql)
        .bind(quantity)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}
