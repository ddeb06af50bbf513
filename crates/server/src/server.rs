//! WebSocket listener.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use handwave_common::config::ServerConfig;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::task::TaskTracker;

use crate::factory::SessionFactory;
use crate::session::handle_socket;

#[derive(Clone)]
struct AppState {
    factory: Arc<dyn SessionFactory>,
    queue_capacity: usize,
    next_session: Arc<AtomicU64>,
    shutdown: watch::Receiver<bool>,
    sessions: TaskTracker,
}

/// Accepts WebSocket clients and runs one gesture session per connection.
pub struct GestureServer {
    config: ServerConfig,
    factory: Arc<dyn SessionFactory>,
}

impl GestureServer {
    pub fn new(config: ServerConfig, factory: Arc<dyn SessionFactory>) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn build_router(&self, shutdown: watch::Receiver<bool>, sessions: TaskTracker) -> Router {
        let state = AppState {
            factory: self.factory.clone(),
            queue_capacity: self.config.send_queue_capacity,
            next_session: Arc::new(AtomicU64::new(1)),
            shutdown,
            sessions,
        };
        Router::new().route("/", get(ws_handler)).with_state(state)
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        self.run_until(ctrl_c()).await
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind_address = self.config.bind_address();
        let listener = TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("Failed to bind {bind_address}"))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// Returns once every live session has ended and released its camera.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: SocketAddr = listener.local_addr().context("Listener has no address")?;
        let (stop_tx, stop_rx) = watch::channel(false);
        let sessions = TaskTracker::new();
        let app = self.build_router(stop_rx, sessions.clone());

        tracing::info!(
            address = %local,
            url = %self.config.ws_url(),
            "Gesture server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Stopping server...");
                let _ = stop_tx.send(true);
            })
            .await
            .context("Server error")?;

        sessions.close();
        if !sessions.is_empty() {
            tracing::info!(sessions = sessions.len(), "Waiting for live sessions to end");
        }
        sessions.wait().await;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let session_id = state.next_session.fetch_add(1, Ordering::Relaxed);
    ws.on_upgrade(move |socket| {
        state.sessions.track_future(handle_socket(
            socket,
            session_id,
            state.factory,
            state.queue_capacity,
            state.shutdown,
        ))
    })
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
