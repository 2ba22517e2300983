use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sqlx::PgPool;

use crate::models::User;
use crate::utils::error::AppError;

/// Authenticated identity, resolved from an `Authorization: Bearer <token>`
/// header. Handlers that take this as an argument reject unauthenticated
/// requests with 401 before any of their own logic runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    PgPool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::AuthError("Authentication credentials were not provided".to_string())
        })?;

        let pool = PgPool::from_ref(state);
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, token, created_at FROM users WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid authentication token".to_string()))?;

        tracing::debug!(user = %user.username, "Authenticated request");
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_missing_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_rejects_non_bearer_schemes() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_rejects_empty_token() {
        let headers = headers_with_auth("Bearer   ");
        assert_eq!(bearer_token(&headers), None);
    }
}
