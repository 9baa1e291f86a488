//! Last-known device state snapshots returned by `info` queries.
//!
//! Snapshots are cached by the driver layer; reading one never fails. A
//! driver that cannot be reached yields the `Default` (disconnected)
//! snapshot.

use serde::Serialize;

/// Rotator state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RotatorInfo {
    pub connected: bool,
    pub name: String,
    /// Sky angle in degrees, `0.0..360.0`.
    pub position: f32,
    /// Raw mechanical angle in degrees, `0.0..360.0`.
    pub mechanical_position: f32,
    pub is_moving: bool,
    pub reverse: bool,
    pub synced: bool,
    /// Smallest movement the hardware can make, in degrees.
    pub step_size: f32,
}

/// Safety monitor state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SafetyMonitorInfo {
    pub connected: bool,
    pub name: String,
    /// Whether conditions are currently safe for imaging.
    pub is_safe: bool,
}

/// Weather station snapshot.
///
/// Sensor fields are `None` when the station does not expose that sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherInfo {
    pub connected: bool,
    pub name: String,
    /// Ambient temperature in °C.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Barometric pressure in hPa.
    pub pressure: Option<f64>,
    /// Dew point in °C.
    pub dew_point: Option<f64>,
    /// Wind speed in m/s.
    pub wind_speed: Option<f64>,
    /// Cloud cover in percent.
    pub cloud_cover: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_disconnected_snapshots() {
        assert!(!RotatorInfo::default().connected);
        assert!(!SafetyMonitorInfo::default().connected);
        assert!(!WeatherInfo::default().connected);
    }

    #[test]
    fn should_serialize_optional_sensors_as_null() {
        let json = serde_json::to_value(WeatherInfo::default()).unwrap();
        assert_eq!(json["connected"], false);
        assert!(json["temperature"].is_null());
    }
}
