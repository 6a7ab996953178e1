//! Core business logic for Valex.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain calculations and validation rules live here.
//!
//! # Modules
//!
//! - `exchange` - Exchange quote math (fees, conversion, rounding)
//! - `deposit` - Static deposit-address directory
//! - `auth` - Password hashing

pub mod auth;
pub mod deposit;
pub mod exchange;
