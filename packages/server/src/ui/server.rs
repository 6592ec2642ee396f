//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use homedash_shared::time::{Clock, SystemClock};
use tokio::{net::TcpListener, sync::{Mutex, watch}};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    domain::{ConnectionRegistry, DeviceSource},
    usecase::{
        GetConnectionsUseCase, LivenessMonitor, PollDevicesUseCase, PublishSnapshotUseCase,
        SharedRegistry, ShutdownUseCase, SubscribeUseCase,
    },
};

use super::{
    handler::{dashboard_data, health_check, list_connections, sse_handler, thermostat_status},
    signal::shutdown_signal,
    state::AppState,
};

/// Smart-home dashboard server
///
/// This struct wires the use cases together and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let sources = build_sources(&config.hubitat, config.device_timeout)?;
/// let server = Server::new(config, sources);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// SubscribeUseCase（SSE 購読のユースケース）
    subscribe_usecase: Arc<SubscribeUseCase>,
    /// PollDevicesUseCase（デバイスのポーリングのユースケース）
    poll_devices_usecase: Arc<PollDevicesUseCase>,
    /// GetConnectionsUseCase（接続状況取得のユースケース）
    get_connections_usecase: Arc<GetConnectionsUseCase>,
    /// ShutdownUseCase（シャットダウンのユースケース）
    shutdown_usecase: Arc<ShutdownUseCase>,
    /// 死活監視
    liveness_monitor: Arc<LivenessMonitor>,
}

impl Server {
    /// Create a new Server instance using the system clock
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `sources` - Device sources polled for snapshots
    pub fn new(config: ServerConfig, sources: Vec<Arc<dyn DeviceSource>>) -> Self {
        Self::with_clock(config, sources, Arc::new(SystemClock))
    }

    /// Create a new Server instance with the given clock
    pub fn with_clock(
        config: ServerConfig,
        sources: Vec<Arc<dyn DeviceSource>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry: SharedRegistry = Arc::new(Mutex::new(ConnectionRegistry::new(
            config.max_connections,
            clock.clone(),
        )));

        let liveness_monitor = Arc::new(LivenessMonitor::new(
            registry.clone(),
            config.liveness_policy(),
        ));
        let publish_usecase = Arc::new(PublishSnapshotUseCase::new(registry.clone()));
        let poll_devices_usecase = Arc::new(PollDevicesUseCase::new(
            sources,
            publish_usecase.clone(),
            clock,
        ));
        let subscribe_usecase = Arc::new(SubscribeUseCase::new(
            registry.clone(),
            publish_usecase.clone(),
            liveness_monitor.clone(),
            config.retry_after,
        ));
        let get_connections_usecase = Arc::new(GetConnectionsUseCase::new(
            registry.clone(),
            config.emergency_threshold(),
        ));
        let shutdown_usecase = Arc::new(ShutdownUseCase::new(registry, publish_usecase));

        Self {
            config,
            subscribe_usecase,
            poll_devices_usecase,
            get_connections_usecase,
            shutdown_usecase,
            liveness_monitor,
        }
    }

    /// Build the router (API routes, SSE and static assets)
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            subscribe_usecase: self.subscribe_usecase.clone(),
            poll_devices_usecase: self.poll_devices_usecase.clone(),
            get_connections_usecase: self.get_connections_usecase.clone(),
            send_buffer: self.config.send_buffer,
            snapshot_max_age: self.config.snapshot_max_age,
        });

        Router::new()
            // SSE エンドポイント
            .route("/api/events", get(sse_handler))
            // HTTP エンドポイント
            .route("/api/dashboard-data", get(dashboard_data))
            .route("/api/status", get(thermostat_status))
            .route("/api/connections", get(list_connections))
            .route("/api/health", get(health_check))
            .with_state(app_state)
            // 静的ファイル
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the dashboard server until SIGINT / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the static assets are missing, if the server fails to bind
    /// to the configured address or if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.config.check_static_assets()?;

        // Bind the server to the host and port
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Smart home dashboard listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Server-Sent Events available at http://{}/api/events", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes
    ///
    /// Background loops (polling, heartbeat, sweep) run for the lifetime of the server.
    /// On shutdown every SSE client receives a `server-restart` event before its
    /// stream is closed.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let (stop_tx, stop_rx) = watch::channel(false);

        let mut handles = self.liveness_monitor.clone().spawn(stop_rx.clone());
        handles.push(
            self.poll_devices_usecase
                .clone()
                .spawn(self.config.poll_interval, stop_rx),
        );

        let shutdown_usecase = self.shutdown_usecase.clone();
        let graceful = async move {
            shutdown.await;
            let notified = shutdown_usecase.notify_and_close().await;
            tracing::info!("Closed {} SSE connections", notified);
            if stop_tx.send(true).is_err() {
                tracing::debug!("Background tasks already stopped");
            }
        };

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(graceful)
        .await?;

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Background task ended abnormally: {}", e);
            }
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
