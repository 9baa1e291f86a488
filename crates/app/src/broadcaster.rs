//! Process-wide broadcast fan-out backed by a tokio broadcast channel.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use skyhub_domain::event::BroadcastEvent;

use crate::ports::EventSink;

/// Fan-out sink for named equipment events.
///
/// Publishing succeeds even when there are no active subscribers: the event
/// is recorded in the bounded history and otherwise dropped. Delivery to
/// subscribers is asynchronous from the caller's perspective; the caller
/// never blocks on it.
pub struct Broadcaster {
    sender: broadcast::Sender<BroadcastEvent>,
    history: Mutex<VecDeque<BroadcastEvent>>,
    history_limit: usize,
}

impl Broadcaster {
    /// Create a broadcaster with the given live-channel capacity and bounded
    /// history size. A `history_limit` of zero disables history retention.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (a broadcast channel needs room for at
    /// least one event).
    #[must_use]
    pub fn new(capacity: usize, history_limit: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            history: Mutex::new(VecDeque::new()),
            history_limit,
        }
    }

    /// Subscribe to events published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }

    /// Snapshot of retained events, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<BroadcastEvent> {
        self.lock_history().iter().cloned().collect()
    }

    fn lock_history(&self) -> MutexGuard<'_, VecDeque<BroadcastEvent>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for Broadcaster {
    fn publish(&self, name: &str) {
        let event = BroadcastEvent::now(name);
        if self.history_limit > 0 {
            let mut history = self.lock_history();
            if history.len() == self.history_limit {
                history.pop_front();
            }
            history.push_back(event.clone());
        }
        // send fails only when there are zero receivers, which is fine.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let broadcaster = Broadcaster::new(16, 16);
        let mut rx = broadcaster.subscribe();

        broadcaster.publish("ROTATOR-CONNECTED");

        let received = rx.recv().await.unwrap();
        assert_eq!(received.name, "ROTATOR-CONNECTED");
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let broadcaster = Broadcaster::new(16, 16);
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.publish("SAFETY-CHANGED");

        assert_eq!(rx1.recv().await.unwrap().name, "SAFETY-CHANGED");
        assert_eq!(rx2.recv().await.unwrap().name, "SAFETY-CHANGED");
    }

    #[test]
    fn should_succeed_when_no_subscribers() {
        let broadcaster = Broadcaster::new(16, 16);
        broadcaster.publish("WEATHER-DISCONNECTED");
        assert_eq!(broadcaster.history().len(), 1);
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let broadcaster = Broadcaster::new(16, 16);
        broadcaster.publish("ROTATOR-CONNECTED");

        let mut rx = broadcaster.subscribe();
        broadcaster.publish("ROTATOR-DISCONNECTED");

        assert_eq!(rx.recv().await.unwrap().name, "ROTATOR-DISCONNECTED");
    }

    #[test]
    fn should_evict_oldest_history_entry_beyond_limit() {
        let broadcaster = Broadcaster::new(16, 2);
        broadcaster.publish("ROTATOR-CONNECTED");
        broadcaster.publish("SAFETY-CONNECTED");
        broadcaster.publish("WEATHER-CONNECTED");

        let names: Vec<_> = broadcaster
            .history()
            .into_iter()
            .map(|event| event.name)
            .collect();
        assert_eq!(names, vec!["SAFETY-CONNECTED", "WEATHER-CONNECTED"]);
    }

    #[test]
    fn should_retain_nothing_when_history_disabled() {
        let broadcaster = Broadcaster::new(16, 0);
        broadcaster.publish("ROTATOR-CONNECTED");
        assert!(broadcaster.history().is_empty());
    }
}
