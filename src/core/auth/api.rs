//! Auth API endpoints
//!
//! Provides REST API endpoints for authentication:
//! - POST /api/v1/register - Register a new user
//! - POST /api/v1/login - Login and get a session token
//! - GET /api/v1/check-auth - Get the current user's profile
//!
//! Validation failures are answered with 200 and an `error` object; every other failure
//! uses a non-success status and a `{status: "failed", message}` body.

use axum::{
    Json, Router,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::core::auth::extract::AuthUser;
use crate::core::auth::jwt::JwtService;
use crate::core::auth::service::{
    AccountResponse, AuthError, AuthService, LoginRequest, RegisterRequest,
};
use crate::core::db::models::UserProfile;
use crate::core::validation::ValidationError;

/// Status string of successful responses
pub const STATUS_SUCCESS: &str = "success";

/// Status string of failed responses
pub const STATUS_FAILED: &str = "failed";

/// Message returned for unexpected failures
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Auth API state containing the auth service
#[derive(Clone)]
pub struct AuthApiState {
    pub auth_service: AuthService,
}

impl FromRef<AuthApiState> for JwtService {
    fn from_ref(state: &AuthApiState) -> Self {
        state.auth_service.jwt_service().clone()
    }
}

/// Successful response envelope
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data,
        }
    }
}

/// Failure envelope for credential, lookup and server errors
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub status: &'static str,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED,
            message: message.into(),
        }
    }
}

/// Envelope for validation failures
#[derive(Debug, Serialize)]
pub struct ValidationFailure {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Convert AuthError to API response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Validation(err) => {
                let body = ValidationFailure {
                    error: ErrorMessage {
                        message: err.to_string(),
                    },
                };
                return (StatusCode::OK, Json(body)).into_response();
            }
            AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::InvalidToken | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InternalError(detail) => {
                tracing::error!("Request failed: {}", detail);
                let body = FailureResponse::new(SERVER_ERROR_MESSAGE);
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        (status, Json(FailureResponse::new(self.to_string()))).into_response()
    }
}

/// Turn an undecodable body into a validation failure
fn reject_payload(rejection: JsonRejection) -> AuthError {
    AuthError::Validation(ValidationError::Malformed(rejection.body_text()))
}

/// Create the auth API router
pub fn auth_api_router(state: AuthApiState) -> Router {
    Router::new()
        .route("/api/v1/register", post(register_handler))
        .route("/api/v1/login", post(login_handler))
        .route("/api/v1/check-auth", get(check_auth_handler))
        .with_state(state)
}

/// POST /api/v1/register
async fn register_handler(
    State(state): State<AuthApiState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<AccountResponse>>, AuthError> {
    let Json(request) = payload.map_err(reject_payload)?;

    tracing::info!(
        "Registration attempt for email: {}",
        request.email.as_deref().unwrap_or_default()
    );

    let account = state.auth_service.register(request).await?;

    tracing::info!("User registered successfully: {}", account.email);

    Ok(Json(SuccessResponse::new(account)))
}

/// POST /api/v1/login
async fn login_handler(
    State(state): State<AuthApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<AccountResponse>>, AuthError> {
    let Json(request) = payload.map_err(reject_payload)?;
    let email = request.email.clone().unwrap_or_default();

    tracing::info!("Login attempt for email: {}", email);

    let account = state.auth_service.login(request).await.inspect_err(|e| {
        if matches!(e, AuthError::InvalidCredentials) {
            tracing::warn!("Invalid credentials for email: {}", email);
        }
    })?;

    tracing::info!("User logged in successfully: {}", account.email);

    Ok(Json(SuccessResponse::new(account)))
}

/// GET /api/v1/check-auth
async fn check_auth_handler(
    State(state): State<AuthApiState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SuccessResponse<UserProfile>>, AuthError> {
    let profile = state.auth_service.check_auth(user_id).await?;

    Ok(Json(SuccessResponse::new(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::jwt::JwtConfig;
    use crate::core::auth::password::{MIN_BCRYPT_COST, PasswordHasher};
    use crate::core::db::MemoryUserStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "api_test_secret";

    fn test_router() -> Router {
        let service = AuthService::new(
            Arc::new(MemoryUserStore::new()),
            JwtService::new(JwtConfig::new(SECRET)),
            PasswordHasher::new(MIN_BCRYPT_COST),
        );

        auth_api_router(AuthApiState {
            auth_service: service,
        })
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn check_auth(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/v1/check-auth");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn jane() -> Value {
        json!({
            "email": "jane@example.com",
            "fullname": "Jane Doe",
            "password": "secret1",
            "member": "gold"
        })
    }

    #[tokio::test]
    async fn test_register_success_envelope() {
        let router = test_router();

        let (status, body) = send(&router, post_json("/api/v1/register", jane())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["email"], "jane@example.com");
        assert_eq!(body["data"]["fullname"], "Jane Doe");
        assert_eq!(body["data"]["member"], "gold");
        assert!(body["data"]["token"].as_str().is_some());
        assert!(body["data"].get("id").is_none());
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_validation_failure_is_200_with_error() {
        let router = test_router();
        let mut payload = jane();
        payload["password"] = json!("12345");

        let (status, body) = send(&router, post_json("/api/v1/register", payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["error"]["message"],
            "\"password\" length must be at least 6 characters long"
        );
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_register_malformed_body_is_validation_failure() {
        let router = test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["error"]["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflict() {
        let router = test_router();
        send(&router, post_json("/api/v1/register", jane())).await;

        let (status, body) = send(&router, post_json("/api/v1/register", jane())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "failed");
        assert_eq!(body["message"], "email already registered");
    }

    #[tokio::test]
    async fn test_login_success_and_check_auth() {
        let router = test_router();
        send(&router, post_json("/api/v1/register", jane())).await;

        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/login",
                json!({"email": "jane@example.com", "password": "secret1"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = send(&router, check_auth(Some(&token))).await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_object().unwrap();
        let mut keys: Vec<_> = data.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["email", "fullname", "id", "member"]);
        assert_eq!(data["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let router = test_router();
        send(&router, post_json("/api/v1/register", jane())).await;

        let wrong_password = send(
            &router,
            post_json(
                "/api/v1/login",
                json!({"email": "jane@example.com", "password": "wrong-password"}),
            ),
        )
        .await;
        let unknown_email = send(
            &router,
            post_json(
                "/api/v1/login",
                json!({"email": "nobody@example.com", "password": "secret1"}),
            ),
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.1["message"], "credential is invalid");
    }

    #[tokio::test]
    async fn test_check_auth_requires_token() {
        let router = test_router();

        let (status, body) = send(&router, check_auth(None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "failed");
    }

    #[tokio::test]
    async fn test_check_auth_unknown_user_not_found() {
        let router = test_router();
        let token = JwtService::new(JwtConfig::new(SECRET))
            .issue(Uuid::new_v4())
            .unwrap();

        let (status, body) = send(&router, check_auth(Some(&token))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "user not found");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response =
            AuthError::InternalError("connection refused at 10.0.0.3".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_error_body_is_opaque() {
        let response =
            AuthError::InternalError("connection refused at 10.0.0.3".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body, json!({"status": "failed", "message": "Server Error"}));
    }
}
