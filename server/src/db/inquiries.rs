use sqlx::PgPool;

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO inquiries (id, name, email, subject, message, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(subject)
    .bind(message)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool) -> Result<Vec<Inquiry>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM inquiries ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn update_status(pool: &PgPool, id: &str, status: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE inquiries SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
