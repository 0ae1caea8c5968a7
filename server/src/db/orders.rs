use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct PurchaseOrder {
    pub id: i64,
    pub company_id: String,
    pub event_id: Option<String>,
    /// "PENDING" | "COMPLETED"
    pub status: String,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub coupon_id: Option<String>,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_type: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Line item as priced by the checkout pipeline, before insertion.
#[derive(Debug)]
pub struct NewOrderItem {
    pub product_type: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

pub struct NewOrder<'a> {
    pub id: i64,
    pub company_id: &'a str,
    pub event_id: Option<&'a str>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub coupon_id: Option<&'a str>,
    pub now: i64,
}

/// Insert the order row and all its items in one transaction.
pub async fn create_with_items(
    pool: &PgPool,
    order: &NewOrder<'_>,
    items: &[NewOrderItem],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO purchase_orders
             (id, company_id, event_id, status, subtotal, discount_amount, total, coupon_id, created_at)
         VALUES ($1, $2, $3, 'PENDING', $4, $5, $6, $7, $8)",
    )
    .bind(order.id)
    .bind(order.company_id)
    .bind(order.event_id)
    .bind(order.subtotal)
    .bind(order.discount_amount)
    .bind(order.total)
    .bind(order.coupon_id)
    .bind(order.now)
    .execute(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_type, product_id, quantity, unit_price)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order.id)
        .bind(&item.product_type)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<PurchaseOrder>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM purchase_orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn items_for(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(pool)
        .await
}

pub async fn list_for_company(
    pool: &PgPool,
    company_id: &str,
) -> Result<Vec<PurchaseOrder>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM purchase_orders WHERE company_id = $1 ORDER BY created_at DESC")
        .bind(company_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(
    pool: &PgPool,
    status: Option<&str>,
) -> Result<Vec<PurchaseOrder>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as(
                "SELECT * FROM purchase_orders WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as("SELECT * FROM purchase_orders ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    // order_items go with it via ON DELETE CASCADE
    let result = sqlx::query("DELETE FROM purchase_orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Load an order with a row lock, for the finalization transaction.
pub async fn find_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<PurchaseOrder>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM purchase_orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn items_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(&mut **tx)
        .await
}

pub async fn mark_completed(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE purchase_orders SET status = 'COMPLETED', completed_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
