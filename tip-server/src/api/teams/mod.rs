//! Team API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/teams", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/members/{member_id}",
            post(handler::add_member).delete(handler::remove_member),
        )
        .route("/{id}/work-schedule", get(handler::work_schedules))
}
