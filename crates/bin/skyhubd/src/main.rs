//! # skyhubd — skyhub daemon
//!
//! Composition root that wires the drivers, event bridge, and HTTP adapter
//! together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env overrides)
//! - Initialise tracing
//! - Construct the device mediators and the broadcaster
//! - Start the per-kind event watchers on activation and stop them on
//!   shutdown
//! - Build the axum router, bind to a TCP port, and serve until
//!   SIGTERM/ctrl-c
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no equipment logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use skyhub_adapter_http_axum::state::AppState;
use skyhub_adapter_virtual::{VirtualRotator, VirtualSafetyMonitor, VirtualWeather};
use skyhub_app::broadcaster::Broadcaster;
use skyhub_app::ports::DeviceMediator;
use skyhub_app::services::{EquipmentService, RotatorCommandService};
use skyhub_app::watcher::DeviceWatcher;
use skyhub_domain::kind::DeviceKind;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Drivers (simulated — real hardware lives behind the same ports)
    let rotator = Arc::new(VirtualRotator::default());
    let safety_monitor = Arc::new(VirtualSafetyMonitor::default());
    let weather = Arc::new(VirtualWeather::default());

    // Broadcast fan-out + event bridge, activated once at startup
    let broadcaster = Arc::new(Broadcaster::new(config.events.capacity, config.events.history));
    let watcher = DeviceWatcher::new(Arc::clone(&broadcaster));
    watcher.start_watching(rotator.as_ref());
    watcher.start_watching(safety_monitor.as_ref());
    watcher.start_watching(weather.as_ref());

    // Services
    let deadline = config.operation_timeout();
    let state = AppState::new(
        Arc::new(equipment(Arc::clone(&rotator), deadline)),
        Arc::new(RotatorCommandService::new(Arc::clone(&rotator))),
        Arc::new(equipment(Arc::clone(&safety_monitor), deadline)),
        Arc::new(equipment(Arc::clone(&weather), deadline)),
        Arc::clone(&broadcaster),
    );
    let app = skyhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "skyhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Deactivation: tear the event bridge down before exit.
    watcher.stop_watching(DeviceKind::Rotator).await;
    watcher.stop_watching(DeviceKind::SafetyMonitor).await;
    watcher.stop_watching(DeviceKind::Weather).await;

    Ok(())
}

fn equipment<M: DeviceMediator>(
    mediator: Arc<M>,
    deadline: Option<Duration>,
) -> EquipmentService<M> {
    let service = EquipmentService::new(mediator);
    match deadline {
        Some(limit) => service.with_deadline(limit),
        None => service,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
