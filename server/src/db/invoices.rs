use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: String,
    pub order_id: i64,
    pub company_id: String,
    pub number: String,
    pub amount: Decimal,
    pub issued_at: i64,
    pub pdf_key: Option<String>,
}

/// Allocate the next invoice number: `FE-<year>-<seq>`, zero-padded to 6.
pub async fn next_number(
    tx: &mut Transaction<'_, Postgres>,
    year: i32,
) -> Result<String, sqlx::Error> {
    let (seq,): (i64,) = sqlx::query_as("SELECT nextval('invoice_number_seq')")
        .fetch_one(&mut **tx)
        .await?;
    Ok(format!("FE-{year}-{seq:06}"))
}

pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    id: &str,
    order_id: i64,
    company_id: &str,
    number: &str,
    amount: Decimal,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO invoices (id, order_id, company_id, number, amount, issued_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(order_id)
    .bind(company_id)
    .bind(number)
    .bind(amount)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn list_for_company(
    pool: &PgPool,
    company_id: &str,
) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM invoices WHERE company_id = $1 ORDER BY issued_at DESC")
        .bind(company_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM invoices ORDER BY issued_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM invoices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
