//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::core::{Config, Result, ServerError, ServerState};
use crate::services::build_router;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("🦀 Tip server listening on {}", addr);

        let app = build_router(state);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut serve = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stop_rx.await;
                })
                .await
        });

        tokio::select! {
            joined = &mut serve => {
                return match joined {
                    Ok(res) => res.map_err(ServerError::from),
                    Err(e) => Err(ServerError::Internal(e.into())),
                };
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
            }
        }

        let _ = stop_tx.send(());
        match tokio::time::timeout(self.config.shutdown_timeout(), serve).await {
            Ok(Ok(res)) => res.map_err(ServerError::from)?,
            Ok(Err(e)) => return Err(ServerError::Internal(e.into())),
            Err(_) => tracing::warn!(
                timeout_ms = self.config.shutdown_timeout_ms,
                "Graceful shutdown timed out, dropping open connections"
            ),
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
