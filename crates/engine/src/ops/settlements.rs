use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    Balance, Member, ResultEngine, Settlement, compute_balances, compute_settlements,
};

use super::{Engine, with_tx};

impl Engine {
    /// Computes balances and the settlement plan for a group's current
    /// expense snapshot.
    ///
    /// The roster and the expenses are read inside one transaction, so the
    /// snapshot handed to the settlement core is consistent even while
    /// writes land concurrently. Because expense writes validate membership,
    /// such a snapshot always sums to zero and the imbalance error is
    /// unreachable from here.
    pub async fn settle(&self, group_id: Uuid) -> ResultEngine<(Vec<Balance>, Vec<Settlement>)> {
        with_tx!(self, |db_tx| {
            Self::require_group(&db_tx, group_id).await?;

            let members: Vec<Member> = Self::load_members(&db_tx, group_id)
                .await?
                .into_iter()
                .map(|m| Member {
                    id: m.id,
                    name: m.name,
                })
                .collect();

            let expenses: Vec<_> = Self::fetch_expenses(&db_tx, group_id)
                .await?
                .iter()
                .map(|e| e.to_settlement_input())
                .collect();

            let balances = compute_balances(&expenses, &members);
            let settlements = compute_settlements(&balances)?;
            Ok((balances, settlements))
        })
    }
}
