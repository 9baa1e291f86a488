//! Equipment lifecycle orchestration — info, connect, disconnect.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use skyhub_domain::error::{SkyHubError, TimeoutError};
use skyhub_domain::kind::DeviceKind;

use crate::ports::DeviceMediator;

/// Per-device-kind lifecycle controller.
///
/// Connect and disconnect are serialized through an internal lock so the
/// connected-flag check and the driver call act as one unit: two concurrent
/// requests against the same kind cannot both issue a hardware connect.
pub struct EquipmentService<M> {
    mediator: Arc<M>,
    op_lock: Mutex<()>,
    deadline: Option<Duration>,
}

impl<M: DeviceMediator> EquipmentService<M> {
    /// Create a controller with no operation deadline (waits are bounded
    /// only by the driver).
    pub fn new(mediator: Arc<M>) -> Self {
        Self {
            mediator,
            op_lock: Mutex::new(()),
            deadline: None,
        }
    }

    /// Bound every suspending driver call by `deadline`, surfacing expiry
    /// as [`SkyHubError::Timeout`].
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The kind this controller manages.
    pub fn kind(&self) -> DeviceKind {
        self.mediator.kind()
    }

    /// Last-known state snapshot. Non-blocking, never fails.
    pub fn info(&self) -> M::Info {
        self.mediator.info()
    }

    /// Connect the device, rescanning first unless `skip_rescan`.
    ///
    /// A device that is already connected is left untouched: no rescan, no
    /// reconnect attempt. Rescanning before connect makes newly plugged-in
    /// or renamed devices discoverable, so a rescan failure aborts the whole
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns [`SkyHubError::Driver`] when the rescan or connect call
    /// fails, or [`SkyHubError::Timeout`] when a configured deadline
    /// expires.
    #[tracing::instrument(skip(self), fields(kind = %self.mediator.kind()))]
    pub async fn connect(&self, skip_rescan: bool) -> Result<(), SkyHubError> {
        let _guard = self.op_lock.lock().await;
        if self.mediator.connected() {
            return Ok(());
        }
        if !skip_rescan {
            self.bounded("rescan", self.mediator.rescan()).await?;
        }
        self.bounded("connect", self.mediator.connect()).await
    }

    /// Disconnect the device. No-op when already disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`SkyHubError::Driver`] when the disconnect call fails, or
    /// [`SkyHubError::Timeout`] when a configured deadline expires.
    #[tracing::instrument(skip(self), fields(kind = %self.mediator.kind()))]
    pub async fn disconnect(&self) -> Result<(), SkyHubError> {
        let _guard = self.op_lock.lock().await;
        if !self.mediator.connected() {
            return Ok(());
        }
        self.bounded("disconnect", self.mediator.disconnect()).await
    }

    async fn bounded<F>(&self, operation: &'static str, call: F) -> Result<(), SkyHubError>
    where
        F: Future<Output = Result<(), SkyHubError>>,
    {
        match self.deadline {
            None => call.await,
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(TimeoutError {
                    kind: self.mediator.kind(),
                    operation,
                    limit,
                }
                .into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::broadcast;

    use skyhub_domain::error::DriverError;
    use skyhub_domain::event::DeviceEvent;
    use skyhub_domain::info::WeatherInfo;

    #[derive(Default)]
    struct RecordingMediator {
        connected: AtomicBool,
        calls: StdMutex<Vec<&'static str>>,
        fail_rescan: AtomicBool,
        fail_connect: AtomicBool,
        hang_connect: AtomicBool,
    }

    impl RecordingMediator {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn driver_error(&self, operation: &'static str) -> SkyHubError {
            DriverError {
                kind: DeviceKind::Weather,
                operation,
                message: "simulated failure".to_string(),
            }
            .into()
        }
    }

    impl DeviceMediator for RecordingMediator {
        type Info = WeatherInfo;

        fn kind(&self) -> DeviceKind {
            DeviceKind::Weather
        }

        fn info(&self) -> WeatherInfo {
            WeatherInfo {
                connected: self.connected.load(Ordering::SeqCst),
                ..WeatherInfo::default()
            }
        }

        fn connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        async fn connect(&self) -> Result<(), SkyHubError> {
            self.record("connect");
            if self.hang_connect.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.fail_connect.load(Ordering::SeqCst) {
                return Err(self.driver_error("connect"));
            }
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), SkyHubError> {
            self.record("disconnect");
            self.connected.store(false, Ordering::SeqCst);
            Ok(())
        }

        async fn rescan(&self) -> Result<(), SkyHubError> {
            self.record("rescan");
            if self.fail_rescan.load(Ordering::SeqCst) {
                return Err(self.driver_error("rescan"));
            }
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
            broadcast::channel(1).1
        }
    }

    fn service() -> (EquipmentService<RecordingMediator>, Arc<RecordingMediator>) {
        let mediator = Arc::new(RecordingMediator::default());
        (EquipmentService::new(Arc::clone(&mediator)), mediator)
    }

    #[tokio::test]
    async fn should_rescan_before_connecting() {
        let (service, mediator) = service();

        service.connect(false).await.unwrap();

        assert_eq!(mediator.calls(), vec!["rescan", "connect"]);
        assert!(service.info().connected);
    }

    #[tokio::test]
    async fn should_not_rescan_when_skipped() {
        let (service, mediator) = service();

        service.connect(true).await.unwrap();

        assert_eq!(mediator.calls(), vec!["connect"]);
    }

    #[tokio::test]
    async fn should_make_zero_driver_calls_when_already_connected() {
        let (service, mediator) = service();
        mediator.connected.store(true, Ordering::SeqCst);

        service.connect(false).await.unwrap();

        assert!(mediator.calls().is_empty());
    }

    #[tokio::test]
    async fn should_make_zero_driver_calls_when_already_disconnected() {
        let (service, mediator) = service();

        service.disconnect().await.unwrap();

        assert!(mediator.calls().is_empty());
    }

    #[tokio::test]
    async fn should_disconnect_when_connected() {
        let (service, mediator) = service();
        mediator.connected.store(true, Ordering::SeqCst);

        service.disconnect().await.unwrap();

        assert_eq!(mediator.calls(), vec!["disconnect"]);
        assert!(!service.info().connected);
    }

    #[tokio::test]
    async fn should_abort_connect_when_rescan_fails() {
        let (service, mediator) = service();
        mediator.fail_rescan.store(true, Ordering::SeqCst);

        let result = service.connect(false).await;

        assert!(matches!(result, Err(SkyHubError::Driver(_))));
        assert_eq!(mediator.calls(), vec!["rescan"]);
    }

    #[tokio::test]
    async fn should_surface_connect_failure() {
        let (service, mediator) = service();
        mediator.fail_connect.store(true, Ordering::SeqCst);

        let result = service.connect(true).await;

        assert!(matches!(result, Err(SkyHubError::Driver(_))));
        assert!(!service.info().connected);
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_timeout_when_deadline_expires() {
        let mediator = Arc::new(RecordingMediator::default());
        mediator.hang_connect.store(true, Ordering::SeqCst);
        let service = EquipmentService::new(Arc::clone(&mediator))
            .with_deadline(Duration::from_secs(5));

        let result = service.connect(true).await;

        assert!(matches!(result, Err(SkyHubError::Timeout(_))));
    }

    #[tokio::test]
    async fn should_serialize_concurrent_connects() {
        let mediator = Arc::new(RecordingMediator::default());
        let service = Arc::new(EquipmentService::new(Arc::clone(&mediator)));

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.connect(true).await })
        };
        let second = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.connect(true).await })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        // one request wins the lock and connects; the other observes the
        // connected flag and becomes a no-op
        assert_eq!(mediator.calls(), vec!["connect"]);
    }
}
