//! Handlers for the rotator endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use skyhub_app::ports::{DeviceMediator, RotatorMediator};
use skyhub_domain::info::{RotatorInfo, SafetyMonitorInfo, WeatherInfo};

use crate::api::{ConnectQuery, StatusMessage};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for move endpoints.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    /// Target angle in degrees.
    pub position: f32,
}

/// `GET /api/equipment/rotator/info`
pub async fn info<R, S, W>(State(state): State<AppState<R, S, W>>) -> Json<RotatorInfo>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    Json(state.rotator.info())
}

/// `POST /api/equipment/rotator/connect`
pub async fn connect<R, S, W>(
    State(state): State<AppState<R, S, W>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.rotator.connect(query.skip_rescan).await?;
    Ok(Json(StatusMessage {
        message: format!("{} connected", state.rotator.kind()),
    }))
}

/// `POST /api/equipment/rotator/disconnect`
pub async fn disconnect<R, S, W>(
    State(state): State<AppState<R, S, W>>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.rotator.disconnect().await?;
    Ok(Json(StatusMessage {
        message: format!("{} disconnected", state.rotator.kind()),
    }))
}

/// `POST /api/equipment/rotator/move`
///
/// Launches the move and returns immediately; progress is observable via
/// the info endpoint or the event stream.
pub async fn move_sky<R, S, W>(
    State(state): State<AppState<R, S, W>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.rotator_commands.move_sky(request.position)?;
    Ok(Json(StatusMessage {
        message: "Rotator move started".to_string(),
    }))
}

/// `POST /api/equipment/rotator/move-mechanical`
pub async fn move_mechanical<R, S, W>(
    State(state): State<AppState<R, S, W>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<StatusMessage>, ApiError>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    state.rotator_commands.move_mechanical(request.position)?;
    Ok(Json(StatusMessage {
        message: "Rotator move started".to_string(),
    }))
}
