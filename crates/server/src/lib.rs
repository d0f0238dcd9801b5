use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod expenses;
mod groups;
mod health;
mod members;
mod server;
mod settlements;

pub mod types {
    pub mod group {
        pub use api_types::group::{GroupNew, GroupUpdate, GroupView, GroupsResponse};
    }

    pub mod member {
        pub use api_types::member::{MemberNew, MemberView};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseNew, ExpenseUpdate, ExpenseView, ExpensesResponse, SplitView,
        };
    }

    pub mod settlement {
        pub use api_types::settlement::{BalanceView, SettlementView, SettlementsResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::MemberInUse(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidName(_)
        | EngineError::InvalidAmount(_)
        | EngineError::ImbalancedLedger(_)
        | EngineError::CurrencyMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
