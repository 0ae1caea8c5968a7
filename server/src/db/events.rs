use sqlx::PgPool;

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub status: String,
    pub description: Option<String>,
    pub banner_key: Option<String>,
    pub created_at: i64,
}

pub struct NewEvent<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub venue: Option<&'a str>,
    pub city: Option<&'a str>,
    pub country: Option<&'a str>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub description: Option<&'a str>,
    pub banner_key: Option<&'a str>,
    pub now: i64,
}

pub async fn create(pool: &PgPool, event: &NewEvent<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO events (id, name, venue, city, country, starts_at, ends_at, description, banner_key, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(event.id)
    .bind(event.name)
    .bind(event.venue)
    .bind(event.city)
    .bind(event.country)
    .bind(event.starts_at)
    .bind(event.ends_at)
    .bind(event.description)
    .bind(event.banner_key)
    .bind(event.now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events ORDER BY starts_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update(pool: &PgPool, event: &NewEvent<'_>, status: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE events
         SET name = $1, venue = $2, city = $3, country = $4, starts_at = $5,
             ends_at = $6, description = $7, banner_key = $8, status = $9
         WHERE id = $10",
    )
    .bind(event.name)
    .bind(event.venue)
    .bind(event.city)
    .bind(event.country)
    .bind(event.starts_at)
    .bind(event.ends_at)
    .bind(event.description)
    .bind(event.banner_key)
    .bind(status)
    .bind(event.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
