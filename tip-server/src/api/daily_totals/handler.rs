//! Daily Total API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{DailyTotal, DailyTotalCreate, DailyTotalUpdate};

/// GET /api/daily-totals - 所有成员的日报
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<DailyTotal>>> {
    Ok(Json(state.ledger.list_all_daily_totals()?))
}

/// GET /api/team-members/{id}/daily-totals - 成员日报列表
pub async fn list(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<DailyTotal>>> {
    Ok(Json(state.ledger.list_daily_totals(id)?))
}

/// GET /api/team-members/{id}/daily-totals/{daily_total_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((id, daily_total_id)): Path<(i64, i64)>,
) -> AppResult<Json<DailyTotal>> {
    Ok(Json(state.ledger.get_daily_total(id, daily_total_id)?))
}

/// POST /api/team-members/{id}/daily-totals - 提交日报
pub async fn create(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DailyTotalCreate>,
) -> AppResult<Json<DailyTotal>> {
    Ok(Json(state.coordinator.submit_daily_total(id, payload).await?))
}

/// PATCH /api/team-members/{id}/daily-totals/{daily_total_id} - 修改日报
pub async fn update(
    State(state): State<ServerState>,
    Path((id, daily_total_id)): Path<(i64, i64)>,
    Json(payload): Json<DailyTotalUpdate>,
) -> AppResult<Json<DailyTotal>> {
    let dt = state
        .coordinator
        .update_daily_total(id, daily_total_id, payload)
        .await?;
    Ok(Json(dt))
}

/// DELETE /api/team-members/{id}/daily-totals/{daily_total_id} - 删除日报
pub async fn delete(
    State(state): State<ServerState>,
    Path((id, daily_total_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    state
        .coordinator
        .delete_daily_total(id, daily_total_id)
        .await?;
    Ok(Json(true))
}
