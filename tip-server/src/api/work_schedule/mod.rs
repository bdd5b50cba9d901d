//! Work Schedule API 模块
//!
//! Adding or removing a date resettles the member's cohort for that date.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/team-members/{id}/work-schedule", get(handler::get))
        .route(
            "/api/team-members/{id}/work-schedule/add-date",
            put(handler::add_date),
        )
        .route(
            "/api/team-members/{id}/work-schedule/remove-date",
            put(handler::remove_date),
        )
        .route(
            "/api/team-members/{id}/work-schedule/{year}/{month}",
            get(handler::get_month).delete(handler::remove_month),
        )
}
