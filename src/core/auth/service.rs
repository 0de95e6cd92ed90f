//! Authentication service
//!
//! Provides business logic for registration, login and session checks.
//! Coordinates between the user store, the password hasher and the JWT service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::auth::jwt::{JwtError, JwtService};
use crate::core::auth::password::{PasswordError, PasswordHasher};
use crate::core::db::models::{CreateUser, User, UserProfile, normalize_email};
use crate::core::db::store::{UserRepositoryError, UserStore};
use crate::core::validation::{Fields, LOGIN_RULES, REGISTER_RULES, ValidationError, validate};

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("credential is invalid")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("email already registered")]
    EmailAlreadyExists,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::EmailAlreadyExists => AuthError::EmailAlreadyExists,
            _ => AuthError::InternalError(err.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::InvalidToken => AuthError::InvalidToken,
            _ => AuthError::InternalError(err.to_string()),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::InternalError(err.to_string())
    }
}

/// Registration request data
///
/// Fields are optional so that a missing field is reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub fullname: Option<String>,
    pub password: Option<String>,
    pub member: Option<String>,
}

impl Fields for RegisterRequest {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "email" => self.email.as_deref(),
            "fullname" => self.fullname.as_deref(),
            "password" => self.password.as_deref(),
            "member" => self.member.as_deref(),
            _ => None,
        }
    }
}

/// Login request data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Fields for LoginRequest {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "email" => self.email.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }
}

/// Account data returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub email: String,
    pub fullname: String,
    pub member: String,
    pub token: String,
}

impl AccountResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            email: user.email,
            fullname: user.fullname,
            member: user.member,
            token,
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt_service: JwtService,
    hasher: PasswordHasher,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(
        user_store: Arc<dyn UserStore>,
        jwt_service: JwtService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_store,
            jwt_service,
            hasher,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Register a new user and issue a session token
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountResponse, AuthError> {
        validate(&request, REGISTER_RULES)?;

        // Presence is guaranteed by the rules above
        let email = normalize_email(&request.email.unwrap_or_default());
        let password = request.password.unwrap_or_default();

        let password_hash = self.hasher.hash(&password).await?;

        let user = self
            .user_store
            .create(&CreateUser {
                email,
                fullname: request.fullname.unwrap_or_default(),
                password_hash,
                member: request.member.unwrap_or_default(),
            })
            .await?;

        let token = self.jwt_service.issue(user.id)?;

        Ok(AccountResponse::new(user, token))
    }

    /// Login an existing user
    pub async fn login(&self, request: LoginRequest) -> Result<AccountResponse, AuthError> {
        validate(&request, LOGIN_RULES)?;

        let email = normalize_email(&request.email.unwrap_or_default());
        let password = request.password.unwrap_or_default();

        // A missing account never reaches the hash comparison
        let user = self
            .user_store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(&password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_service.issue(user.id)?;

        Ok(AccountResponse::new(user, token))
    }

    /// Fetch the profile of an already authenticated user
    pub async fn check_auth(&self, user_id: Uuid) -> Result<UserProfile, AuthError> {
        self.user_store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
