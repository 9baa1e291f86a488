//! Event sink port — fire-and-forget publication of broadcast events.

/// Accepts named events for fan-out to connected subscribers.
///
/// Publication is best-effort and must never block or fail: it is called
/// from event-forwarding tasks that sit directly on the driver event path.
pub trait EventSink: Send + Sync {
    /// Publish a named event to all current subscribers.
    fn publish(&self, name: &str);
}

impl<T: EventSink> EventSink for std::sync::Arc<T> {
    fn publish(&self, name: &str) {
        (**self).publish(name);
    }
}
