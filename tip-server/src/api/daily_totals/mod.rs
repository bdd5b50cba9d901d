//! Daily Total API 模块
//!
//! Writes go through the coordinator and resettle the member's cohort.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/daily-totals", get(handler::list_all))
        .route(
            "/api/team-members/{id}/daily-totals",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/team-members/{id}/daily-totals/{daily_total_id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
