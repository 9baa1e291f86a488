//! Device events and the broadcast records derived from them.

use serde::Serialize;

use crate::kind::DeviceKind;
use crate::time::Timestamp;

/// A state transition reported by a device driver.
///
/// Each event fires at most once per actual transition. Delivery order
/// relative to info-snapshot freshness is not guaranteed: a snapshot may
/// reflect the new state before or shortly after the event is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The device completed a connection.
    Connected,
    /// The device was disconnected.
    Disconnected,
    /// The safety monitor's `is_safe` flag flipped.
    IsSafeChanged,
}

impl DeviceEvent {
    /// Fixed broadcast name for this event on the given device kind,
    /// e.g. `ROTATOR-CONNECTED` or `SAFETY-CHANGED`.
    #[must_use]
    pub fn broadcast_name(self, kind: DeviceKind) -> String {
        let suffix = match self {
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
            Self::IsSafeChanged => "CHANGED",
        };
        format!("{}-{suffix}", kind.event_prefix())
    }
}

/// An immutable record pushed to broadcast subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastEvent {
    /// Fixed event name, e.g. `WEATHER-DISCONNECTED`.
    pub name: String,
    /// When the gateway observed the transition.
    pub timestamp: Timestamp,
}

impl BroadcastEvent {
    /// Stamp a new record with the current time.
    #[must_use]
    pub fn now(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_derive_broadcast_names_per_kind() {
        assert_eq!(
            DeviceEvent::Connected.broadcast_name(DeviceKind::Rotator),
            "ROTATOR-CONNECTED"
        );
        assert_eq!(
            DeviceEvent::Disconnected.broadcast_name(DeviceKind::Weather),
            "WEATHER-DISCONNECTED"
        );
        assert_eq!(
            DeviceEvent::IsSafeChanged.broadcast_name(DeviceKind::SafetyMonitor),
            "SAFETY-CHANGED"
        );
    }

    #[test]
    fn should_serialize_broadcast_event_with_name_and_timestamp() {
        let event = BroadcastEvent::now("SAFETY-CONNECTED");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["name"], "SAFETY-CONNECTED");
        assert!(json["timestamp"].is_string());
    }
}
