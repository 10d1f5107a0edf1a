//! # intentcp-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the dispatch endpoints under `/tuya`:
//!   `{device}/{action}`, `sequence`, `sequence/{preset}` and the legacy
//!   `devices/{device}/…` paths. GET and POST are accepted identically.
//! - Serve `/health` and `/status` diagnostics
//! - Map HTTP requests into dispatch service calls (driving adapter)
//! - Map outcomes and errors into JSON envelopes with the right status code
//!
//! ## Dependency rule
//! Depends on `intentcp-app` (for port traits and services) and
//! `intentcp-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
