//! Domain models shared across the Hero client crates.

pub mod auth;
