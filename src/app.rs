//! Application assembly: shared state and the HTTP router.

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::auth::{
    AuthApiState, AuthService, JwtError, JwtService, PasswordHasher, auth_api_router,
};
use crate::core::config::{Config, ConfigError};
use crate::core::db::{
    DbConfig, DbError, MemoryUserStore, UserRepository, UserStore, create_pool_with_migrations,
};

/// Errors that abort startup
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(auth_service: AuthService) -> Self {
        Self { auth_service }
    }

    /// Build the state from configuration.
    ///
    /// Connects to PostgreSQL and runs migrations when `DATABASE_URL` is set, otherwise
    /// falls back to the in-memory store.
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let user_store: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                let pool = create_pool_with_migrations(&DbConfig::new(url.clone())).await?;
                tracing::info!("Using PostgreSQL user store");
                Arc::new(UserRepository::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, users are kept in memory only");
                Arc::new(MemoryUserStore::new())
            }
        };

        let jwt_service = JwtService::new(config.jwt_config()?);
        let hasher = PasswordHasher::new(config.bcrypt_cost);

        Ok(Self::new(AuthService::new(user_store, jwt_service, hasher)))
    }
}

/// Build the application router with the tower-http layers applied
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_api_router(AuthApiState {
            auth_service: state.auth_service,
        }))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::JwtConfig;
    use crate::core::auth::password::MIN_BCRYPT_COST;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(AuthService::new(
            Arc::new(MemoryUserStore::new()),
            JwtService::new(JwtConfig::new("app_test_secret")),
            PasswordHasher::new(MIN_BCRYPT_COST),
        ))
    }

    #[tokio::test]
    async fn test_from_config_without_database_uses_memory_store() {
        let config = Config {
            token_key: Some("secret".to_string()),
            bcrypt_cost: MIN_BCRYPT_COST,
            ..Default::default()
        };

        let state = AppState::from_config(&config).await.unwrap();

        assert_eq!(state.auth_service.jwt_service().expiration_minutes(), 1440);
    }

    #[tokio::test]
    async fn test_router_register_then_check_auth() {
        let router = build_router(test_state());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "email": "jane@example.com",
                            "fullname": "Jane Doe",
                            "password": "secret1",
                            "member": "gold"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let token = body["data"]["token"].as_str().unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/check-auth")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_cors_preflight() {
        let router = build_router(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/v1/login")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn test_router_unknown_route() {
        let router = build_router(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
