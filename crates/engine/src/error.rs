//! The module contains the errors the engine can throw.
//!
//! The two domain-specific ones are:
//!
//! - [`ImbalancedLedger`] thrown when a balance snapshot handed to the
//!   settlement optimizer does not sum to zero.
//! - [`KeyNotFound`] thrown when a group, member or expense is not found.
//!
//!  [`ImbalancedLedger`]: EngineError::ImbalancedLedger
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Member in use: {0}")]
    MemberInUse(String),
    #[error("Imbalanced ledger: balances sum to {0}, expected 0")]
    ImbalancedLedger(i64),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::MemberInUse(a), Self::MemberInUse(b)) => a == b,
            (Self::ImbalancedLedger(a), Self::ImbalancedLedger(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
