//! HTTP API: server, routing, and the authentication/authorization gateway.
//!
//! Request flow: authentication middleware (token → asserted identity) →
//! authorization resolver (identity → reconciled tier + resource handle) →
//! business handler on that handle → downstream error translation.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod resolver;
