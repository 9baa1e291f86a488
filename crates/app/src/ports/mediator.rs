//! Mediator ports — capability contracts for device drivers.
//!
//! A mediator is the object through which the core talks to one piece of
//! equipment. Concrete drivers live in adapter crates; the core holds only a
//! shared reference and never owns the device lifecycle.

use std::future::Future;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use skyhub_domain::error::SkyHubError;
use skyhub_domain::event::DeviceEvent;
use skyhub_domain::info::RotatorInfo;
use skyhub_domain::kind::DeviceKind;

/// Capability contract every device kind provides.
pub trait DeviceMediator: Send + Sync {
    /// Kind-specific state snapshot type.
    type Info: Clone + Send;

    /// The kind of equipment behind this mediator.
    fn kind(&self) -> DeviceKind;

    /// Last-known cached state. Non-blocking and infallible: an unreachable
    /// driver yields the default (disconnected) snapshot.
    fn info(&self) -> Self::Info;

    /// Cached connection flag, read without touching the driver.
    fn connected(&self) -> bool;

    /// Connect to the device. Suspends until the driver responds.
    fn connect(&self) -> impl Future<Output = Result<(), SkyHubError>> + Send;

    /// Disconnect from the device. Suspends until the driver responds.
    fn disconnect(&self) -> impl Future<Output = Result<(), SkyHubError>> + Send;

    /// Refresh the set of discoverable devices of this kind.
    fn rescan(&self) -> impl Future<Output = Result<(), SkyHubError>> + Send;

    /// Subscribe to state-transition events.
    ///
    /// Each actual transition fires at most once. Ordering relative to
    /// [`info`](Self::info) freshness is not guaranteed: the snapshot may
    /// already reflect the new state before the event is observed.
    fn subscribe(&self) -> broadcast::Receiver<DeviceEvent>;
}

/// Rotator-specific commands on top of the base contract.
pub trait RotatorMediator: DeviceMediator<Info = RotatorInfo> {
    /// Start moving toward `target`, observing `cancel` between steps.
    ///
    /// Cancellation is an expected outcome, not an error: the future
    /// resolves `Ok(())` with motion stopped wherever it was.
    fn move_to(
        &self,
        target: MoveTarget,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<(), SkyHubError>> + Send;
}

/// Target of a rotator move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    /// Sky angle in degrees.
    Sky(f32),
    /// Raw mechanical angle in degrees.
    Mechanical(f32),
}

impl MoveTarget {
    /// The requested angle in degrees, regardless of reference frame.
    #[must_use]
    pub fn degrees(self) -> f32 {
        match self {
            Self::Sky(degrees) | Self::Mechanical(degrees) => degrees,
        }
    }
}
