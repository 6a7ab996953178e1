//! Authentication primitives.
//!
//! Password hashing and verification with Argon2id. Session issuance lives
//! in the API layer; this module only deals with credentials at rest.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
