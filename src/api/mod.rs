//! # API Module
//!
//! HTTP handlers served by the local OAuth redirect receiver
//! ([`crate::server::RedirectListener`]).
//!
//! ## Endpoints
//!
//! - [`callback`] - Path-agnostic handler for the browser redirect. It pulls
//!   the authorization code out of the request target, hands it to the
//!   listener's one-shot callback and always answers `200 text/html`.
//!
//! The module is built on [Axum](https://docs.rs/axum); the listener mounts
//! [`callback`] as the router fallback so any path is accepted.

mod callback;

pub use callback::callback;
