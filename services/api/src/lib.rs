//! services/api/src/lib.rs
//!
//! The study tracker's HTTP service: store adapters, configuration, and the axum
//! router. The `api` binary wires these together; the `openapi` binary only needs
//! `web::rest::ApiDoc`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
