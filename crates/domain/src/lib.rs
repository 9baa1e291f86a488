//! # skyhub-domain
//!
//! Pure domain model for the skyhub observatory equipment gateway.
//!
//! ## Responsibilities
//! - Foundational types: device kinds, error conventions, timestamps
//! - Define **state snapshots** (last-known info per device kind)
//! - Define **device events** (connection and safety transitions) and the
//!   **broadcast records** derived from them
//! - Contain the error taxonomy shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod event;
pub mod info;
pub mod kind;
pub mod time;
