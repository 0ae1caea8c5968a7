use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow, serde::Serialize)]
pub struct PathCount {
    pub path: String,
    pub views: i64,
}

pub async fn record_view(
    pool: &PgPool,
    path: &str,
    referrer: Option<&str>,
    visitor_id: Option<&str>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO page_views (path, referrer, visitor_id, viewed_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(path)
    .bind(referrer)
    .bind(visitor_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn total_views(pool: &PgPool, since: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM page_views WHERE viewed_at >= $1")
            .bind(since)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn unique_visitors(pool: &PgPool, since: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(DISTINCT visitor_id) FROM page_views
         WHERE viewed_at >= $1 AND visitor_id IS NOT NULL",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn top_paths(
    pool: &PgPool,
    since: i64,
    limit: i64,
) -> Result<Vec<PathCount>, sqlx::Error> {
    sqlx::query_as(
        "SELECT path, COUNT(*) AS views FROM page_views
         WHERE viewed_at >= $1
         GROUP BY path ORDER BY views DESC LIMIT $2",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await
}
