use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
pub struct Company {
    pub id: String,
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub logo_key: Option<String>,
    pub status: String,
    pub membership_plan_id: Option<String>,
    pub membership_purchased_at: Option<i64>,
    pub membership_expires_at: Option<i64>,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    email: &str,
    hashed_password: &str,
    name: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO companies (id, email, hashed_password, name, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(email)
    .bind(hashed_password)
    .bind(name)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE status = 'active' ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: &str,
    name: &str,
    phone: Option<&str>,
    country: Option<&str>,
    website: Option<&str>,
    logo_key: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE companies
         SET name = $1, phone = $2, country = $3, website = $4, logo_key = $5
         WHERE id = $6",
    )
    .bind(name)
    .bind(phone)
    .bind(country)
    .bind(website)
    .bind(logo_key)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE companies SET status = 'deleted' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
