//! Group member API endpoints

use api_types::member::{MemberNew, MemberView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn member_view(member: engine::GroupMember) -> MemberView {
    MemberView {
        id: member.id,
        name: member.name,
        joined_at: member.joined_at,
    }
}

/// Handle requests for adding a member to a group.
pub async fn add(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<MemberNew>,
) -> Result<Json<MemberView>, ServerError> {
    let member = state
        .engine
        .add_member(group_id, &payload.member_name)
        .await?;

    Ok(Json(member_view(member)))
}

/// Handle requests for removing a member from a group.
///
/// Members referenced by an expense cannot be removed; the engine answers
/// with `MemberInUse` and the client sees a 409.
pub async fn remove(
    State(state): State<ServerState>,
    Path((group_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_member(group_id, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
