//! # skyhub-app
//!
//! Application layer — equipment orchestration and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define the **mediator ports** through which the core talks to device
//!   drivers: connect/disconnect/rescan, cached state snapshots, event
//!   channels, and cancellable rotator moves
//! - Bridge driver events onto the broadcast channel exactly once per watch
//!   activation (`watcher`)
//! - Fan broadcast events out to subscribers with a bounded history
//!   (`broadcaster`)
//! - Orchestrate connect/disconnect lifecycles and supersede long-running
//!   rotator moves (`services`)
//!
//! ## Dependency rule
//! Depends on `skyhub-domain` only (plus `tokio::sync` for channels and
//! `tokio-util` for cancellation tokens). Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod broadcaster;
pub mod ports;
pub mod services;
pub mod watcher;
