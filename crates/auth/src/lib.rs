//! `marquee-auth` — pure credential boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it issues
//! and verifies signed identity assertions and nothing else. Whether the
//! asserted tier still reflects reality is decided elsewhere, against the
//! identity store.

pub mod claims;
pub mod token;

pub use claims::TokenClaims;
pub use token::{SigningError, TokenError, TokenIssuer, TokenVerifier};
