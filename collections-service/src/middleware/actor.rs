//! Actor extraction for the thin API layer.
//!
//! The upstream gateway authenticates the caller and forwards the identity
//! assertion as `X-User-Id` / `X-User-Role` headers. Token issuance and
//! verification happen entirely outside this service; headers are trusted
//! the same way the platform's other services trust their BFF headers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::auth::{Actor, Role};
use service_core::error::AppError;
use uuid::Uuid;

#[async_trait]
impl<S> FromRequestParts<S> for crate::middleware::ActorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthError(anyhow::anyhow!("Missing X-User-Id header"))
            })?;
        let user_id: Uuid = user_id.parse().map_err(|_| {
            AppError::AuthError(anyhow::anyhow!("X-User-Id header is not a valid id"))
        })?;

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthError(anyhow::anyhow!("Missing X-User-Role header"))
            })?;
        let role = Role::from_string(role).ok_or_else(|| {
            AppError::AuthError(anyhow::anyhow!("Unknown role '{}'", role))
        })?;

        let span = tracing::Span::current();
        span.record("user_id", user_id.to_string().as_str());
        span.record("role", role.as_str());

        Ok(crate::middleware::ActorContext(Actor::new(user_id, role)))
    }
}
