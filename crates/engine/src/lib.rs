//! Core library for divvy, a shared-expense tracker.
//!
//! The interesting part lives in [`settlement`]: pure balance derivation and
//! the greedy minimal-settlement optimizer. Around it sit the sea-orm backed
//! group/member/expense operations exposed through [`Engine`].

pub use currency::Currency;
pub use error::EngineError;
pub use expense_splits::ExpenseSplit;
pub use expenses::StoredExpense;
pub use groups::Group;
pub use members::GroupMember;
pub use ops::{Engine, EngineBuilder};
pub use settlement::{
    Balance, Expense, Member, Settlement, compute_balances, compute_settlements, split_amounts,
};

mod currency;
mod error;
mod expense_splits;
mod expenses;
mod groups;
mod members;
mod ops;
pub mod settlement;
pub mod validate;

pub type ResultEngine<T> = Result<T, EngineError>;
