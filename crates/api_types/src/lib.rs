//! Request/response types for the divvy HTTP API.
//!
//! JSON field names are camelCase, matching what the web client sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Jpy,
    Usd,
    Eur,
    Gbp,
    Cny,
    Krw,
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
        pub currency: Option<Currency>,
        pub member_names: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupUpdate {
        pub name: String,
        pub description: Option<String>,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub currency: Currency,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub members: Vec<super::member::MemberView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }
}

pub mod member {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberNew {
        pub member_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberView {
        pub id: Uuid,
        pub name: String,
        pub joined_at: DateTime<Utc>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub amount: i64,
        pub description: String,
        pub paid_by_id: Uuid,
        pub split_member_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        pub amount: i64,
        pub description: String,
        pub paid_by_id: Uuid,
        pub split_member_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SplitView {
        pub member_id: Uuid,
        pub member_name: String,
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub group_id: Uuid,
        pub amount: i64,
        pub description: String,
        pub paid_by_id: Uuid,
        pub paid_by_name: String,
        pub split_members: Vec<SplitView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod settlement {
    use super::*;

    /// Net position of one member: positive means they are owed money.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BalanceView {
        pub member_id: Uuid,
        pub member_name: String,
        pub balance: i64,
    }

    /// One instructed payment from a debtor to a creditor.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettlementView {
        pub from_member_id: Uuid,
        pub to_member_id: Uuid,
        pub amount: i64,
        pub from_name: String,
        pub to_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettlementsResponse {
        pub balances: Vec<BalanceView>,
        pub settlements: Vec<SettlementView>,
    }
}
