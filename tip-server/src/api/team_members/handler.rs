//! Team Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{TeamMember, TeamMemberCreate, TeamMemberUpdate};

/// GET /api/team-members - 获取成员列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TeamMember>>> {
    Ok(Json(state.roster.list_team_members()?))
}

/// GET /api/team-members/{id} - 获取单个成员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TeamMember>> {
    Ok(Json(state.roster.get_team_member(id)?))
}

/// POST /api/team-members - 创建成员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TeamMemberCreate>,
) -> AppResult<Json<TeamMember>> {
    Ok(Json(state.roster.create_team_member(payload).await?))
}

/// PATCH /api/team-members/{id} - 更新成员 (职位变更会触发重算)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TeamMemberUpdate>,
) -> AppResult<Json<TeamMember>> {
    Ok(Json(state.roster.update_team_member(id, payload).await?))
}

/// DELETE /api/team-members/{id} - 删除成员
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.roster.delete_team_member(id).await?;
    Ok(Json(true))
}
