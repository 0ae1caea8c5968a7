use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    /// "FIXED" | "PERCENT"
    pub kind: String,
    pub value: Decimal,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    code: &str,
    kind: &str,
    value: Decimal,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO coupons (id, code, kind, value, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(code)
    .bind(kind)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool) -> Result<Vec<Coupon>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM coupons ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Coupon>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM coupons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Code lookup is case-insensitive.
pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Coupon>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM coupons WHERE UPPER(code) = UPPER($1)")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
