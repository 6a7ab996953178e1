//! Shared types, errors, and configuration for Valex.
//!
//! This crate provides common types used across all other crates:
//! - The supported-currency registry with precision and stablecoin flags
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service
//! - Auth request/response payloads

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::Currency;
