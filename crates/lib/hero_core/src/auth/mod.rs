//! Authentication primitives.
//!
//! Provides access token payload decoding shared by `hero_client` and any
//! host application that wants to inspect a token directly.

pub mod token;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
}
