//! Application state

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;
use dashmap::DashMap;
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use crate::auth::rate_limit::RateLimiter;
use crate::chat::ChatHub;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// AWS SES client for sending emails
    pub ses: SesClient,
    /// SES sender email address
    pub ses_from_email: String,
    /// AWS S3 client (uploaded media)
    pub s3: S3Client,
    /// S3 bucket for uploaded media
    pub media_s3_bucket: String,
    /// JWT secret for session tokens
    pub jwt_secret: String,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
    /// In-memory chat room registry
    pub chat: ChatHub,
    /// Concurrent chat WS connections per company
    pub chat_connections: Arc<DashMap<String, AtomicUsize>>,
}

impl AppState {
    /// Create a new AppState: connect the pool, run migrations, build AWS clients.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3 = S3Client::new(&aws_config);

        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        Ok(Self {
            pool,
            ses,
            ses_from_email: config.ses_from_email.clone(),
            s3,
            media_s3_bucket: config.media_s3_bucket.clone(),
            jwt_secret: config.jwt_secret.clone(),
            rate_limiter: RateLimiter::new(),
            chat: ChatHub::new(),
            chat_connections: Arc::new(DashMap::new()),
        })
    }
}
