//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 (含数据库探测) |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "uptime_seconds": 12, "database": "ok" }
//! ```

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | error
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    /// 数据库检查 (ok | error)
    database: &'static str,
}

/// GET /health - 健康检查
async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database, code) = match state.store.ping() {
        Ok(()) => ("ok", "ok", StatusCode::OK),
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unavailable");
            ("error", "error", StatusCode::SERVICE_UNAVAILABLE)
        }
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: state.uptime_secs(),
            database,
        }),
    )
}
