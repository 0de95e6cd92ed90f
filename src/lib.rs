//! memberauth - Member Authentication Service
//!
//! A small HTTP service for member accounts: registration, login with bcrypt-hashed
//! passwords, and session checks with JWT bearer tokens. Built with axum and SQLx.
//!
//! # Response format
//!
//! - success: `{"status": "success", "data": {...}}`
//! - validation failure: HTTP 200 with `{"error": {"message": "..."}}`
//! - other failures: `{"status": "failed", "message": "..."}` with a 4xx/5xx status
//!
//! The success status is exactly `"success"`. Earlier deployments of this API answered
//! `"success..."`; clients comparing against that literal must switch to `"success"` or
//! check the HTTP status instead.

pub mod app;
pub mod core;
