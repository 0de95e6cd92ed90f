//! Database module
//!
//! This module provides database connectivity, models, the `UserStore` abstraction and its
//! implementations.

pub mod models;
pub mod pool;
pub mod repositories;
pub mod store;

// Re-export commonly used items
pub use models::*;
pub use pool::{DbConfig, DbError, create_pool, create_pool_with_migrations};
pub use repositories::{MemoryUserStore, UserRepository};
pub use store::{UserRepositoryError, UserStore};

// Re-export sqlx types that might be needed
pub use sqlx::PgPool;
