//! Weekly Total API 模块 (只读)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/team-members/{id}/weekly-totals", get(handler::list))
        .route(
            "/api/team-members/{id}/weekly-totals/{date}",
            get(handler::get_by_date),
        )
}
