//! Relay server assembly and lifecycle.
//!
//! Wires the registry, device simulator, router, and telemetry scheduler
//! together, serves them over axum, and tears everything down on a
//! shutdown signal.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, ConnectionRegistry, RelayState};
use crate::application::{MessageRouter, TelemetryScheduler};
use crate::config::{AppConfig, ConfigError, ValidationError};
use crate::domain::device::{DeviceSimulator, SensorReadings};

use super::page;

/// Upper bound on how long shutdown waits for open sessions to close.
const SESSION_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        ServerError::Config(ConfigError::from(err))
    }
}

/// A fully wired relay, ready to serve.
pub struct RelayServer {
    config: AppConfig,
    registry: Arc<ConnectionRegistry>,
    readings: Arc<SensorReadings>,
    device: Arc<DeviceSimulator>,
    router: Arc<MessageRouter>,
}

impl RelayServer {
    /// Build a server from configuration.
    ///
    /// Uses `telemetry.seed` for the sensor source when set, entropy otherwise.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any invalid setting, such as a zero
    /// telemetry interval or an empty reading range.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let range = config.telemetry.reading_range()?;
        let readings = match config.telemetry.seed {
            Some(seed) => SensorReadings::seeded(seed, range),
            None => SensorReadings::from_entropy(range),
        };
        Self::with_readings(config, Arc::new(readings))
    }

    /// Build a server around an injected sensor source.
    ///
    /// # Errors
    ///
    /// Same validation as [`new`](Self::new).
    pub fn with_readings(
        config: AppConfig,
        readings: Arc<SensorReadings>,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        let registry = Arc::new(ConnectionRegistry::new());
        let device = Arc::new(DeviceSimulator::new(readings.clone()));
        let router = Arc::new(
            MessageRouter::new(registry.clone(), device.clone())
                .with_echo_to_sender(config.relay.echo_to_sender),
        );

        Ok(Self {
            config,
            registry,
            readings,
            device,
            router,
        })
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }

    pub fn device(&self) -> Arc<DeviceSimulator> {
        self.device.clone()
    }

    /// Build the HTTP application.
    ///
    /// # Routes
    ///
    /// - `GET /` - Reference browser client
    /// - `GET /ws` - WebSocket upgrade
    pub fn app(&self, shutdown: watch::Receiver<bool>) -> Router {
        let state = RelayState::new(
            self.registry.clone(),
            self.router.clone(),
            self.config.relay.outbound_buffer,
            shutdown,
        );

        Router::new()
            .route("/", get(page::index))
            .merge(websocket_router())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind the configured address and serve until `signal` resolves.
    pub async fn run<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.bind_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => return Err(ServerError::Bind { addr, source }),
        };
        self.serve(listener, signal).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    ///
    /// Starts the telemetry scheduler, stops accepting on shutdown, closes
    /// open sessions, and waits for the scheduler to exit.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let scheduler = TelemetryScheduler::new(
            self.registry.clone(),
            self.readings.clone(),
            self.config.telemetry.interval(),
        )
        .spawn(shutdown_rx.clone());

        let app = self.app(shutdown_rx);

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "ZinChat relay listening");
        }

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            })
            .await;

        if let Err(e) = scheduler.await {
            tracing::warn!("Telemetry scheduler ended abnormally: {}", e);
        }

        self.drain_sessions(SESSION_DRAIN_TIMEOUT).await;

        tracing::info!("ZinChat relay stopped");
        result.map_err(ServerError::Serve)
    }

    /// Wait for upgraded sessions, which outlive the HTTP connection
    /// tracking, to observe shutdown and unregister.
    async fn drain_sessions(&self, limit: Duration) {
        let deadline = Instant::now() + limit;
        loop {
            let open = self.registry.connection_count().await;
            if open == 0 {
                return;
            }
            if Instant::now() >= deadline {
                tracing::warn!(open, "Sessions still open after shutdown");
                return;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
    }
}
