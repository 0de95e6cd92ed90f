//! User repository for database operations
//!
//! PostgreSQL-backed [`UserStore`]. Email uniqueness is enforced by the `users_email_key`
//! constraint; a unique violation on insert is reported as `EmailAlreadyExists`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::{CreateUser, User, UserProfile};
use crate::core::db::store::{UserRepositoryError, UserStore};

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete a user by ID
    #[cfg(test)]
    async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_insert_error(err: sqlx::Error) -> UserRepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            UserRepositoryError::EmailAlreadyExists
        }
        _ => UserRepositoryError::DatabaseError(err),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: &CreateUser) -> Result<User, UserRepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, fullname, password_hash, member)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, fullname, password_hash, member, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.fullname)
        .bind(&user.password_hash)
        .bind(&user.member)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, fullname, password_hash, member, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, UserRepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, fullname, member
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
