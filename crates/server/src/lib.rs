use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod customers;
mod orders;
mod server;
mod transactions;

pub mod types {
    pub mod customer {
        pub use api_types::customer::{
            CustomerDeleted, CustomerNew, CustomerUpdate, CustomerView, TopUp, TopUpResponse,
        };
    }

    pub mod order {
        pub use api_types::order::{CustomerOrders, OrderBuy, OrderView, PurchaseResponse};
    }

    pub mod ledger {
        pub use api_types::ledger::{
            DashboardResponse, EntryDeleted, EntryNew, EntryUpdate, EntryView, GrowthView,
            LedgerQuery, LedgerResponse, MonthView, Summary,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

/// Error body shared by every failure response.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::ExistingKey(_)
        | EngineError::InvalidInput(_)
        | EngineError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
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
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
