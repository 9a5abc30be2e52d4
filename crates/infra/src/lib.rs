//! `marquee-infra` — the storage boundary.
//!
//! Everything the gateway knows about the backing store lives here: the
//! closed downstream-failure taxonomy, the three tier-scoped connection
//! handles, and the authoritative identity record. The store's own
//! access-control layer enforces what each handle may do; this crate only
//! picks handles and reports structured errors.

pub mod handles;
pub mod identity;
pub mod store_error;

pub use handles::{HandleConfig, TierHandles};
pub use identity::{IdentityRecord, IdentityStore, PgIdentityStore};
pub use store_error::StoreError;
