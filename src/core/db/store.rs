//! User store abstraction
//!
//! `AuthService` talks to persistence only through [`UserStore`]. Implementations must
//! enforce email uniqueness atomically on create.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::db::models::{CreateUser, User, UserProfile};

/// User store error types
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Persistence for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; fails with `EmailAlreadyExists` when the email is taken
    async fn create(&self, user: &CreateUser) -> Result<User, UserRepositoryError>;

    /// Find a user (including the password hash) by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Find a user's profile by id; the projection never includes the password hash
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, UserRepositoryError>;
}
