//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the orchestration core and the outside
//! world: device drivers on one side, the broadcast transport on the other.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod event_sink;
pub mod mediator;

pub use event_sink::EventSink;
pub use mediator::{DeviceMediator, MoveTarget, RotatorMediator};
