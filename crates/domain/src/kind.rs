//! Device kinds — the identity of each controllable piece of equipment.

use std::fmt;

/// One category of controllable equipment.
///
/// The kind is the identity of a device within the gateway: the host
/// application exposes at most one active device per kind, and the gateway
/// holds only a reference to it, never its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Field rotator.
    Rotator,
    /// Safety monitor — aggregates rain/power/roof sensors into one flag.
    SafetyMonitor,
    /// Weather station.
    Weather,
}

impl DeviceKind {
    /// Prefix used when deriving broadcast event names.
    #[must_use]
    pub fn event_prefix(self) -> &'static str {
        match self {
            Self::Rotator => "ROTATOR",
            Self::SafetyMonitor => "SAFETY",
            Self::Weather => "WEATHER",
        }
    }

    /// Human-readable label used in response messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rotator => "Rotator",
            Self::SafetyMonitor => "Safety monitor",
            Self::Weather => "Weather",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_kind_to_event_prefix() {
        assert_eq!(DeviceKind::Rotator.event_prefix(), "ROTATOR");
        assert_eq!(DeviceKind::SafetyMonitor.event_prefix(), "SAFETY");
        assert_eq!(DeviceKind::Weather.event_prefix(), "WEATHER");
    }

    #[test]
    fn should_display_human_readable_label() {
        assert_eq!(DeviceKind::Rotator.to_string(), "Rotator");
        assert_eq!(DeviceKind::SafetyMonitor.to_string(), "Safety monitor");
        assert_eq!(DeviceKind::Weather.to_string(), "Weather");
    }
}
