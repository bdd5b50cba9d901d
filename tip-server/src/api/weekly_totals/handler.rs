//! Weekly Total API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use shared::models::WeeklyTotal;

/// GET /api/team-members/{id}/weekly-totals - 周报列表
pub async fn list(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<WeeklyTotal>>> {
    Ok(Json(state.ledger.list_weekly_totals(id)?))
}

/// GET /api/team-members/{id}/weekly-totals/{date} - 包含该日期的周报
pub async fn get_by_date(
    State(state): State<ServerState>,
    Path((id, date)): Path<(i64, String)>,
) -> AppResult<Json<WeeklyTotal>> {
    let date = parse_date(&date)?;
    Ok(Json(state.ledger.get_weekly_total(id, date)?))
}
