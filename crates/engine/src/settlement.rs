//! Settlement core.
//!
//! Two pure functions working on plain in-memory records:
//!
//! - [`compute_balances`] folds a list of expenses over a group's members
//!   into one signed balance per member.
//! - [`compute_settlements`] turns a zero-sum balance snapshot into the
//!   payments that bring every balance back to zero, pairing the largest
//!   creditor with the largest debtor until nothing is left.
//!
//! Amounts are signed integer **minor units** (yen, cents). Positive balance
//! means the member is owed money, negative means the member owes money.
//! Neither function performs I/O or keeps state between calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A group member, as the settlement core sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
}

/// An expense record: who paid, how much, and who shares the cost.
///
/// `payer_id` does not have to appear in `split_between`. The order of
/// `split_between` matters: when the amount does not divide evenly, the
/// leftover units land on the earliest members of the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub payer_id: Uuid,
    pub amount: i64,
    pub split_between: Vec<Uuid>,
}

/// Net position of one member after all expenses are tallied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub member_id: Uuid,
    pub name: String,
    pub amount: i64,
}

/// One instructed payment from a net debtor to a net creditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from_member_id: Uuid,
    pub to_member_id: Uuid,
    pub amount: i64,
    pub from_name: String,
    pub to_name: String,
}

/// Splits `amount` into `count` integer parts that sum exactly to `amount`.
///
/// Truncating division plus remainder distribution: the first
/// `amount % count` parts are one unit larger, so no unit is lost or
/// invented. Returns an empty vec for `count == 0`.
///
/// The same rule is used when persisting per-member expense shares, so the
/// stored splits and the balances derived from them always agree.
#[must_use]
pub fn split_amounts(amount: i64, count: usize) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as i64;
    let share = amount / n;
    let remainder = amount % n;
    (0..n)
        .map(|i| if i < remainder { share + 1 } else { share })
        .collect()
}

/// Derives per-member balances from an expense snapshot.
///
/// Every member gets a balance, zero included. For each expense, in input
/// order, the payer is credited the full amount and each member of
/// `split_between` is debited their share (list order decides who absorbs
/// the remainder units).
///
/// References to ids outside `members` are silently skipped; such input can
/// break the zero-sum invariant and later trip
/// [`EngineError::ImbalancedLedger`] in [`compute_settlements`]. The
/// DB-backed expense operations reject those references up front, so
/// persisted data never gets here in that shape.
///
/// The output order is map iteration order: unspecified, do not rely on it.
#[must_use]
pub fn compute_balances(expenses: &[Expense], members: &[Member]) -> Vec<Balance> {
    let mut balances: HashMap<Uuid, Balance> = members
        .iter()
        .map(|member| {
            (
                member.id,
                Balance {
                    member_id: member.id,
                    name: member.name.clone(),
                    amount: 0,
                },
            )
        })
        .collect();

    for expense in expenses {
        if let Some(payer) = balances.get_mut(&expense.payer_id) {
            payer.amount += expense.amount;
        }

        let shares = split_amounts(expense.amount, expense.split_between.len());
        for (member_id, share) in expense.split_between.iter().zip(shares) {
            if let Some(balance) = balances.get_mut(member_id) {
                balance.amount -= share;
            }
        }
    }

    balances.into_values().collect()
}

/// Computes the payments that zero out a balance snapshot.
///
/// Fails with [`EngineError::ImbalancedLedger`] when the amounts do not sum
/// to zero; that is a data-integrity bug upstream, not something the
/// optimizer can repair. Empty or all-zero input yields an empty list.
///
/// The greedy loop operates on a private copy of the nonzero balances:
/// sort descending, settle `min(largest credit, largest debt)` between the
/// two ends, drop entries that hit exactly zero, repeat. Each round zeroes
/// at least one entry, so at most `n - 1` settlements are emitted for `n`
/// nonzero balances. That bound is not always the global minimum, but it
/// matches what any pairwise scheme can guarantee.
pub fn compute_settlements(balances: &[Balance]) -> ResultEngine<Vec<Settlement>> {
    let total: i64 = balances.iter().map(|b| b.amount).sum();
    if total != 0 {
        return Err(EngineError::ImbalancedLedger(total));
    }

    let mut working: Vec<Balance> = balances.iter().filter(|b| b.amount != 0).cloned().collect();

    let mut settlements = Vec::new();
    while working.len() > 1 {
        working.sort_by(|a, b| b.amount.cmp(&a.amount));

        let last = working.len() - 1;
        // Creditors sort first, debtors last. Same-sign ends mean nothing is
        // left to settle; with a zero total this only happens when the
        // working set is already balanced.
        if working[0].amount <= 0 || working[last].amount >= 0 {
            break;
        }

        let amount = working[0].amount.min(-working[last].amount);
        settlements.push(Settlement {
            from_member_id: working[last].member_id,
            to_member_id: working[0].member_id,
            amount,
            from_name: working[last].name.clone(),
            to_name: working[0].name.clone(),
        });

        working[0].amount -= amount;
        working[last].amount += amount;
        working.retain(|b| b.amount != 0);
    }

    Ok(settlements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u128, name: &str) -> Member {
        Member {
            id: Uuid::from_u128(id),
            name: name.to_string(),
        }
    }

    fn balance(id: u128, name: &str, amount: i64) -> Balance {
        Balance {
            member_id: Uuid::from_u128(id),
            name: name.to_string(),
            amount,
        }
    }

    fn expense(payer: u128, amount: i64, split: &[u128]) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            payer_id: Uuid::from_u128(payer),
            amount,
            split_between: split.iter().map(|id| Uuid::from_u128(*id)).collect(),
        }
    }

    fn balance_of(balances: &[Balance], id: u128) -> i64 {
        balances
            .iter()
            .find(|b| b.member_id == Uuid::from_u128(id))
            .expect("member missing from balances")
            .amount
    }

    /// Applies every settlement to the starting balances and asserts they
    /// all land on exactly zero.
    fn assert_settles(balances: &[Balance], settlements: &[Settlement]) {
        let mut after: HashMap<Uuid, i64> =
            balances.iter().map(|b| (b.member_id, b.amount)).collect();
        for s in settlements {
            assert!(s.amount > 0, "settlement amount must be strictly positive");
            *after.get_mut(&s.from_member_id).expect("unknown debtor") += s.amount;
            *after.get_mut(&s.to_member_id).expect("unknown creditor") -= s.amount;
        }
        for (id, amount) in after {
            assert_eq!(amount, 0, "member {id} not settled");
        }
    }

    #[test]
    fn split_amounts_conserves_the_total() {
        for (amount, count) in [(1000, 2), (1001, 3), (7, 5), (0, 3), (2, 4)] {
            let parts = split_amounts(amount, count);
            assert_eq!(parts.len(), count);
            assert_eq!(parts.iter().sum::<i64>(), amount);
        }
        assert!(split_amounts(100, 0).is_empty());
    }

    #[test]
    fn split_amounts_biases_earliest_members() {
        assert_eq!(split_amounts(1001, 3), vec![334, 334, 333]);
        assert_eq!(split_amounts(7, 5), vec![2, 2, 1, 1, 1]);
    }

    #[test]
    fn members_without_expenses_keep_zero_balances() {
        let members = vec![member(1, "Alice"), member(2, "Bob")];
        let balances = compute_balances(&[], &members);
        assert_eq!(balances.len(), 2);
        assert_eq!(balance_of(&balances, 1), 0);
        assert_eq!(balance_of(&balances, 2), 0);
    }

    #[test]
    fn even_split_between_two_members() {
        let members = vec![member(1, "Alice"), member(2, "Bob")];
        let expenses = vec![expense(1, 1000, &[1, 2])];

        let balances = compute_balances(&expenses, &members);
        assert_eq!(balance_of(&balances, 1), 500);
        assert_eq!(balance_of(&balances, 2), -500);

        let settlements = compute_settlements(&balances).unwrap();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].from_member_id, Uuid::from_u128(2));
        assert_eq!(settlements[0].to_member_id, Uuid::from_u128(1));
        assert_eq!(settlements[0].amount, 500);
        assert_eq!(settlements[0].from_name, "Bob");
        assert_eq!(settlements[0].to_name, "Alice");
    }

    #[test]
    fn odd_amount_remainder_goes_to_first_in_split_order() {
        let members = vec![member(1, "Alice"), member(2, "Bob"), member(3, "Carol")];
        let expenses = vec![expense(1, 1001, &[1, 2, 3])];

        let balances = compute_balances(&expenses, &members);
        assert_eq!(balance_of(&balances, 1), 667);
        assert_eq!(balance_of(&balances, 2), -334);
        assert_eq!(balance_of(&balances, 3), -333);
    }

    #[test]
    fn multiple_expenses_accumulate() {
        let members = vec![member(1, "Alice"), member(2, "Bob"), member(3, "Carol")];
        let expenses = vec![expense(1, 3000, &[1, 2, 3]), expense(2, 1500, &[1, 2])];

        let balances = compute_balances(&expenses, &members);
        assert_eq!(balance_of(&balances, 1), 1250);
        assert_eq!(balance_of(&balances, 2), -250);
        assert_eq!(balance_of(&balances, 3), -1000);
        assert_eq!(balances.iter().map(|b| b.amount).sum::<i64>(), 0);
    }

    #[test]
    fn payer_outside_split_accrues_full_credit() {
        let members = vec![member(1, "Alice"), member(2, "Bob"), member(3, "Carol")];
        let expenses = vec![expense(1, 600, &[2, 3])];

        let balances = compute_balances(&expenses, &members);
        assert_eq!(balance_of(&balances, 1), 600);
        assert_eq!(balance_of(&balances, 2), -300);
        assert_eq!(balance_of(&balances, 3), -300);
    }

    #[test]
    fn unknown_references_are_skipped() {
        let members = vec![member(1, "Alice"), member(2, "Bob")];
        // Payer 9 and split member 8 are not in the group.
        let expenses = vec![expense(9, 900, &[1, 8, 2])];

        let balances = compute_balances(&expenses, &members);
        assert_eq!(balance_of(&balances, 1), -300);
        assert_eq!(balance_of(&balances, 2), -300);
        // The skipped references leave a nonzero total behind...
        let err = compute_settlements(&balances).unwrap_err();
        // ...which the optimizer reports as a precondition violation.
        assert_eq!(err, EngineError::ImbalancedLedger(-600));
    }

    #[test]
    fn zero_sum_closure_over_a_larger_scenario() {
        let members: Vec<Member> = (1..=6).map(|i| member(i, &format!("m{i}"))).collect();
        let expenses = vec![
            expense(1, 12_345, &[1, 2, 3, 4, 5, 6]),
            expense(3, 999, &[2, 4]),
            expense(6, 1, &[1, 2, 3]),
            expense(2, 70_001, &[5, 6]),
        ];
        let balances = compute_balances(&expenses, &members);
        assert_eq!(balances.iter().map(|b| b.amount).sum::<i64>(), 0);

        let settlements = compute_settlements(&balances).unwrap();
        assert_settles(&balances, &settlements);
    }

    #[test]
    fn empty_balances_settle_trivially() {
        assert_eq!(compute_settlements(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn all_zero_balances_settle_trivially() {
        let balances = vec![balance(1, "Alice", 0), balance(2, "Bob", 0)];
        assert_eq!(compute_settlements(&balances).unwrap(), Vec::new());
    }

    #[test]
    fn two_person_settlement() {
        let balances = vec![balance(1, "Alice", 1000), balance(2, "Bob", -1000)];
        let settlements = compute_settlements(&balances).unwrap();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].amount, 1000);
        assert_eq!(settlements[0].from_name, "Bob");
        assert_eq!(settlements[0].to_name, "Alice");
        assert_settles(&balances, &settlements);
    }

    #[test]
    fn one_creditor_two_debtors() {
        let balances = vec![
            balance(1, "Alice", 2000),
            balance(2, "Bob", -1000),
            balance(3, "Carol", -1000),
        ];
        let settlements = compute_settlements(&balances).unwrap();
        assert_eq!(settlements.len(), 2);
        assert!(settlements.iter().all(|s| s.to_member_id == Uuid::from_u128(1)));
        assert_settles(&balances, &settlements);
    }

    #[test]
    fn four_member_case_stays_within_the_bound() {
        let balances = vec![
            balance(1, "Alice", 3000),
            balance(2, "Bob", 1000),
            balance(3, "Carol", -2000),
            balance(4, "Dave", -2000),
        ];
        let settlements = compute_settlements(&balances).unwrap();
        assert!(settlements.len() <= 3);
        assert_settles(&balances, &settlements);
    }

    #[test]
    fn settlement_count_bounded_by_nonzero_balances_minus_one() {
        let balances = vec![
            balance(1, "a", 5000),
            balance(2, "b", 3000),
            balance(3, "c", -4000),
            balance(4, "d", -4000),
            balance(5, "e", 0),
        ];
        let settlements = compute_settlements(&balances).unwrap();
        assert!(settlements.len() <= 3);
        assert_settles(&balances, &settlements);
    }

    #[test]
    fn imbalanced_snapshot_is_rejected() {
        let balances = vec![balance(1, "Alice", 1000), balance(2, "Bob", -500)];
        assert_eq!(
            compute_settlements(&balances).unwrap_err(),
            EngineError::ImbalancedLedger(500)
        );
    }

    #[test]
    fn input_is_not_mutated() {
        let balances = vec![balance(1, "Alice", 700), balance(2, "Bob", -700)];
        let before = balances.clone();
        compute_settlements(&balances).unwrap();
        assert_eq!(balances, before);
    }
}
