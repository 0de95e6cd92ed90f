//! Authenticated-user extractor
//!
//! Verifies the `Authorization: Bearer <token>` header before a handler runs. Requests
//! without a valid, unexpired token are rejected with 401 and never reach the handler.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use uuid::Uuid;

use crate::core::auth::jwt::JwtService;
use crate::core::auth::service::AuthError;

/// Id of the user the request's session token is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let jwt_service = JwtService::from_ref(state);

        match jwt_service.verify_user_id(&token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token.to_string())
}
