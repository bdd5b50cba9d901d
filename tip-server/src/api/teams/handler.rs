//! Team API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{MemberSchedule, Team, TeamCreate, TeamMember, TeamUpdate};

/// GET /api/teams - 获取团队列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Team>>> {
    Ok(Json(state.roster.list_teams()?))
}

/// GET /api/teams/{id} - 获取单个团队
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Team>> {
    Ok(Json(state.roster.get_team(id)?))
}

/// POST /api/teams - 创建团队
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TeamCreate>,
) -> AppResult<Json<Team>> {
    Ok(Json(state.roster.create_team(payload).await?))
}

/// PATCH /api/teams/{id} - 重命名团队
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TeamUpdate>,
) -> AppResult<Json<Team>> {
    Ok(Json(state.roster.rename_team(id, payload).await?))
}

/// DELETE /api/teams/{id} - 删除团队 (成员移出后重算)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.roster.delete_team(id).await?;
    Ok(Json(true))
}

/// POST /api/teams/{id}/members/{member_id} - 加入团队
pub async fn add_member(
    State(state): State<ServerState>,
    Path((team_id, member_id)): Path<(i64, i64)>,
) -> AppResult<Json<TeamMember>> {
    Ok(Json(state.roster.add_member_to_team(team_id, member_id).await?))
}

/// DELETE /api/teams/{id}/members/{member_id} - 移出团队
pub async fn remove_member(
    State(state): State<ServerState>,
    Path((team_id, member_id)): Path<(i64, i64)>,
) -> AppResult<Json<TeamMember>> {
    Ok(Json(
        state
            .roster
            .remove_member_from_team(team_id, member_id)
            .await?,
    ))
}

/// GET /api/teams/{id}/work-schedule - 团队排班
pub async fn work_schedules(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MemberSchedule>>> {
    Ok(Json(state.roster.team_work_schedules(id)?))
}
