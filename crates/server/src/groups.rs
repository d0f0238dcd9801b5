//! Group API endpoints

use api_types::group::{GroupNew, GroupUpdate, GroupView, GroupsResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, members::member_view, server::ServerState};

pub(crate) fn currency_to_engine(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Jpy => engine::Currency::Jpy,
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Gbp => engine::Currency::Gbp,
        api_types::Currency::Cny => engine::Currency::Cny,
        api_types::Currency::Krw => engine::Currency::Krw,
    }
}

pub(crate) fn currency_from_engine(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Jpy => api_types::Currency::Jpy,
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Gbp => api_types::Currency::Gbp,
        engine::Currency::Cny => api_types::Currency::Cny,
        engine::Currency::Krw => api_types::Currency::Krw,
    }
}

fn group_view(group: engine::Group) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        currency: currency_from_engine(group.currency),
        created_at: group.created_at,
        updated_at: group.updated_at,
        members: group.members.into_iter().map(member_view).collect(),
    }
}

/// Handle requests for creating a new group with its founding members.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .create_group(
            &payload.name,
            payload.description.as_deref(),
            payload.currency.map(currency_to_engine),
            &payload.member_names,
        )
        .await?;

    Ok(Json(group_view(group)))
}

/// Handle requests for listing all groups.
pub async fn list(State(state): State<ServerState>) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state
        .engine
        .list_groups()
        .await?
        .into_iter()
        .map(group_view)
        .collect();

    Ok(Json(GroupsResponse { groups }))
}

/// Handle requests for fetching one group with its roster.
pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state.engine.group(group_id).await?;
    Ok(Json(group_view(group)))
}

/// Handle requests for updating a group's name, description and currency.
pub async fn update(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<GroupUpdate>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .update_group(
            group_id,
            &payload.name,
            payload.description.as_deref(),
            currency_to_engine(payload.currency),
        )
        .await?;

    Ok(Json(group_view(group)))
}

/// Handle requests for deleting a group and everything under it.
pub async fn remove(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_group(group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
