//! Common error types used across the workspace.
//!
//! Every failure is typed: driver faults, state conflicts, deadline expiry,
//! and orchestration faults each have their own source error and convert
//! into [`SkyHubError`] via `#[from]`. Cancellation of a superseded command
//! is not an error and has no representation here.

use std::time::Duration;

use crate::kind::DeviceKind;

/// Top-level error for all equipment operations.
#[derive(Debug, thiserror::Error)]
pub enum SkyHubError {
    /// The underlying hardware/driver call failed.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// The operation is invalid given the current connection state.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// A configured operation deadline expired.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// Unexpected fault in orchestration logic.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// A driver-level call failed.
#[derive(Debug, thiserror::Error)]
#[error("{kind} driver failed during {operation}: {message}")]
pub struct DriverError {
    pub kind: DeviceKind,
    pub operation: &'static str,
    pub message: String,
}

/// The requested operation conflicts with the device's connection state.
#[derive(Debug, thiserror::Error)]
pub enum ConflictError {
    /// A command was issued against a device that is not connected.
    #[error("{kind} is not connected")]
    NotConnected { kind: DeviceKind },
}

/// A configured deadline expired before the driver responded.
#[derive(Debug, thiserror::Error)]
#[error("{kind} {operation} did not complete within {limit:?}")]
pub struct TimeoutError {
    pub kind: DeviceKind,
    pub operation: &'static str,
    pub limit: Duration,
}

/// Unexpected orchestration failure.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    pub message: String,
}
