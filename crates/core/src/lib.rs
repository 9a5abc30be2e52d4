//! `marquee-core` — shared vocabulary of the gateway.
//!
//! This crate contains **pure** primitives (no HTTP, no storage): subject
//! identity and the trust-tier vocabulary.

pub mod id;
pub mod tier;

pub use id::SubjectId;
pub use tier::{Tier, TierVocabulary, VocabularyError};
