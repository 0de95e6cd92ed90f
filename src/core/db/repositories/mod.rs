//! Database repositories
//!
//! Implementations of [`UserStore`](crate::core::db::UserStore): PostgreSQL for deployments,
//! in-memory for development and tests.

pub mod memory;
pub mod user;

pub use memory::MemoryUserStore;
pub use user::UserRepository;
