//! Core domain logic for member authentication

pub mod auth;
pub mod config;
pub mod db;
pub mod validation;
