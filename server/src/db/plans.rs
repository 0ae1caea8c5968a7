use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct MembershipPlan {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub lifetime: bool,
    pub description: Option<String>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<MembershipPlan>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM membership_plans ORDER BY price")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<MembershipPlan>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM membership_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
