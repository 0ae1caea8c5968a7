//! Company JWT authentication for the API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// JWT claims for a company session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Company ID
    pub sub: String,
    /// Company email
    pub email: String,
    /// Role: "company" | "admin"
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated company identity extracted from JWT
#[derive(Debug, Clone)]
pub struct Identity {
    pub company_id: String,
    pub email: String,
    pub role: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Name of the session cookie carrying the JWT (browser clients)
pub const SESSION_COOKIE: &str = "token";

/// Create a JWT token for a company session
pub fn create_token(
    company_id: &str,
    email: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: company_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Pull the token out of `Authorization: Bearer ...` or the session cookie.
fn extract_token(request: &Request) -> Option<String> {
    if let Some(auth) = request.headers().get("Authorization")
        && let Ok(val) = auth.to_str()
        && let Some(token) = val.strip_prefix("Bearer ")
    {
        return Some(token.to_owned());
    }

    let cookies = request.headers().get("Cookie")?.to_str().ok()?;
    for pair in cookies.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(SESSION_COOKIE) {
            return parts.next().map(|v| v.to_owned());
        }
    }
    None
}

pub fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::new(ErrorCode::TokenInvalid)
    })
}

/// Middleware that extracts and verifies the session JWT, inserting `Identity`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(&request)
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let claims =
        verify_token(&token, &state.jwt_secret).map_err(|e| e.into_response())?;

    let identity = Identity {
        company_id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Middleware for admin-only routes. Must run after `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, Response> {
    let is_admin = request
        .extensions()
        .get::<Identity>()
        .is_some_and(|id| id.is_admin());

    if !is_admin {
        return Err(AppError::new(ErrorCode::AdminRequired).into_response());
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = create_token("comp-1", "a@b.com", "member", "test-secret").unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "comp-1");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, "member");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = create_token("comp-1", "a@b.com", "member", "secret-a").unwrap();
        assert!(verify_token(&token, "secret-b").is_err());
    }
}
