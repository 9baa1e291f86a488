//! Handlers for the weather station endpoints.

use axum::Json;
use axum::extract::{Query, State};

use skyhub_app::ports::{DeviceMediator, RotatorMediator};
use skyhub_domain::info::{SafetyMonitorInfo, WeatherInfo};

use crate::api::{ConnectQuery, StatusMessage};
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/equipment/weather/info`
pub async fn info<R, S, W>(State(state): State<AppState<R, S, W>>) -> Json<WeatherInfo>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    Json(state.weather.info())
}

/// `POST /api/equipment/weather/connect`
pub async fn connect<R, S, W>(
    State(state): State<AppState<R, S, W>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.weather.connect(query.skip_rescan).await?;
    Ok(Json(StatusMessage {
        message: format!("{} connected", state.weather.kind()),
    }))
}

/// `POST /api/equipment/weather/disconnect`
pub async fn disconnect<R, S, W>(
    State(state): State<AppState<R, S, W>>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.weather.disconnect().await?;
    Ok(Json(StatusMessage {
        message: format!("{} disconnected", state.weather.kind()),
    }))
}
