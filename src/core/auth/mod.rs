//! Authentication module for memberauth
//!
//! This module provides authentication functionality including:
//! - Password hashing with bcrypt
//! - JWT session token generation and validation
//! - User registration, login and session checks
//! - REST API endpoints for auth operations

pub mod api;
pub mod extract;
pub mod jwt;
pub mod password;
pub mod service;

pub use api::{AuthApiState, auth_api_router};
pub use extract::{AuthUser, extract_bearer_token};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use password::{PasswordError, PasswordHasher};
pub use service::{AccountResponse, AuthError, AuthService, LoginRequest, RegisterRequest};
