//! Handlers for the safety monitor endpoints.

use axum::Json;
use axum::extract::{Query, State};

use skyhub_app::ports::{DeviceMediator, RotatorMediator};
use skyhub_domain::info::{SafetyMonitorInfo, WeatherInfo};

use crate::api::{ConnectQuery, StatusMessage};
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/equipment/safetymonitor/info`
pub async fn info<R, S, W>(State(state): State<AppState<R, S, W>>) -> Json<SafetyMonitorInfo>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    Json(state.safety_monitor.info())
}

/// `POST /api/equipment/safetymonitor/connect`
pub async fn connect<R, S, W>(
    State(state): State<AppState<R, S, W>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.safety_monitor.connect(query.skip_rescan).await?;
    Ok(Json(StatusMessage {
        message: format!("{} connected", state.safety_monitor.kind()),
    }))
}

/// `POST /api/equipment/safetymonitor/disconnect`
pub async fn disconnect<R, S, W>(
    State(state): State<AppState<R, S, W>>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.safety_monitor.disconnect().await?;
    Ok(Json(StatusMessage {
        message: format!("{} disconnected", state.safety_monitor.kind()),
    }))
}
