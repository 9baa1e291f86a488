//! Shared application state for axum handlers.

use std::sync::Arc;

use skyhub_app::broadcaster::Broadcaster;
use skyhub_app::services::{EquipmentService, RotatorCommandService};

/// Application state shared across all axum handlers.
///
/// Generic over the three mediator types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the mediators themselves do not need
/// to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<R, S, W> {
    /// Rotator lifecycle controller.
    pub rotator: Arc<EquipmentService<R>>,
    /// Rotator move launcher (command supersession).
    pub rotator_commands: Arc<RotatorCommandService<R>>,
    /// Safety monitor lifecycle controller.
    pub safety_monitor: Arc<EquipmentService<S>>,
    /// Weather station lifecycle controller.
    pub weather: Arc<EquipmentService<W>>,
    /// Broadcast fan-out for the push channel and event history.
    pub broadcaster: Arc<Broadcaster>,
}

impl<R, S, W> Clone for AppState<R, S, W> {
    fn clone(&self) -> Self {
        Self {
            rotator: Arc::clone(&self.rotator),
            rotator_commands: Arc::clone(&self.rotator_commands),
            safety_monitor: Arc::clone(&self.safety_monitor),
            weather: Arc::clone(&self.weather),
            broadcaster: Arc::clone(&self.broadcaster),
        }
    }
}

impl<R, S, W> AppState<R, S, W> {
    /// Create application state from pre-wrapped `Arc` services.
    ///
    /// The services are shared with the watcher and background tasks, so
    /// the composition root wraps them once and hands clones out.
    pub fn new(
        rotator: Arc<EquipmentService<R>>,
        rotator_commands: Arc<RotatorCommandService<R>>,
        safety_monitor: Arc<EquipmentService<S>>,
        weather: Arc<EquipmentService<W>>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            rotator,
            rotator_commands,
            safety_monitor,
            weather,
            broadcaster,
        }
    }
}
