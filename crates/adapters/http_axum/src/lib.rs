//! # skyhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Map HTTP requests into equipment service calls (driving adapter)
//! - Map typed failures into HTTP responses (`error`)
//! - Stream broadcast events to clients over SSE (`api::events`)
//!
//! ## Dependency rule
//! Depends on `skyhub-app` (ports and services) and `skyhub-domain` (types
//! used in responses). Never leaks axum types into the core.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
