//! Broadcast history and the SSE push channel.

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use skyhub_app::ports::{DeviceMediator, RotatorMediator};
use skyhub_domain::event::BroadcastEvent;
use skyhub_domain::info::{SafetyMonitorInfo, WeatherInfo};

use crate::state::AppState;

/// `GET /api/events/history` — recently broadcast events, oldest first.
pub async fn history<R, S, W>(State(state): State<AppState<R, S, W>>) -> Json<Vec<BroadcastEvent>>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    Json(state.broadcaster.history())
}

/// `GET /api/events/stream` — SSE stream of equipment events.
///
/// Subscribes to the broadcaster and forwards each event as a JSON-encoded
/// SSE `data:` frame until the client disconnects.
pub async fn stream<R, S, W>(
    State(state): State<AppState<R, S, W>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    let receiver = state.broadcaster.subscribe();
    let events = BroadcastStream::new(receiver).filter_map(|received| match received {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize broadcast event for SSE");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, events dropped");
            None
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
