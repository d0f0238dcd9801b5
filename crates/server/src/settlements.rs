//! Settlement API endpoint

use api_types::settlement::{BalanceView, SettlementView, SettlementsResponse};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Handle requests for a group's net balances and settlement plan.
pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<SettlementsResponse>, ServerError> {
    let (balances, settlements) = state.engine.settle(group_id).await?;

    Ok(Json(SettlementsResponse {
        balances: balances
            .into_iter()
            .map(|balance| BalanceView {
                member_id: balance.member_id,
                member_name: balance.name,
                balance: balance.amount,
            })
            .collect(),
        settlements: settlements
            .into_iter()
            .map(|settlement| SettlementView {
                from_member_id: settlement.from_member_id,
                to_member_id: settlement.to_member_id,
                amount: settlement.amount,
                from_name: settlement.from_name,
                to_name: settlement.to_name,
            })
            .collect(),
    }))
}
