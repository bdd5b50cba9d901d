//! Work Schedule API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;

use crate::core::ServerState;
use crate::tipout::record::parse_date_field;
use crate::utils::AppResult;
use shared::models::{ScheduleDateRequest, WorkScheduleEntry};

/// GET /api/team-members/{id}/work-schedule - 成员排班
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<WorkScheduleEntry>>> {
    Ok(Json(state.ledger.get_work_schedule(id)?))
}

/// GET /api/team-members/{id}/work-schedule/{year}/{month} - 月排班
pub async fn get_month(
    State(state): State<ServerState>,
    Path((id, year, month)): Path<(i64, i32, u32)>,
) -> AppResult<Json<WorkScheduleEntry>> {
    Ok(Json(state.ledger.get_work_schedule_for_month(id, year, month)?))
}

/// PUT /api/team-members/{id}/work-schedule/add-date - 添加排班日期
pub async fn add_date(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleDateRequest>,
) -> AppResult<Json<Vec<WorkScheduleEntry>>> {
    let date = parse_date_field(payload.date.as_deref())?;
    Ok(Json(state.coordinator.add_schedule_date(id, date).await?))
}

/// PUT /api/team-members/{id}/work-schedule/remove-date - 移除排班日期
pub async fn remove_date(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleDateRequest>,
) -> AppResult<Json<Vec<WorkScheduleEntry>>> {
    let date = parse_date_field(payload.date.as_deref())?;
    Ok(Json(state.coordinator.remove_schedule_date(id, date).await?))
}

/// DELETE /api/team-members/{id}/work-schedule/{year}/{month} - 移除整月排班
pub async fn remove_month(
    State(state): State<ServerState>,
    Path((id, year, month)): Path<(i64, i32, u32)>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    Ok(Json(
        state
            .coordinator
            .remove_schedule_month(id, year, month)
            .await?,
    ))
}
