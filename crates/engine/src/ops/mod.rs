use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod customers;
mod ledger;
mod purchases;

pub use customers::{CustomerNew, CustomerUpdate};
pub use ledger::{
    Dashboard, EntryNew, EntryUpdate, GrowthRate, KindTotals, LedgerFilter, LedgerSummary,
    MonthlyPoint,
};
pub use purchases::PurchaseReceipt;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Emails are matched case-insensitively; store them lowercased.
fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(EngineError::InvalidInput("invalid email".to_string()));
    }
    Ok(trimmed)
}

fn validate_rate(rate_percent: i32) -> ResultEngine<i32> {
    if !(0..=100).contains(&rate_percent) {
        return Err(EngineError::InvalidInput(format!(
            "discount rate must be between 0 and 100, got {rate_percent}"
        )));
    }
    Ok(rate_percent)
}

fn validate_positive_amount(amount_minor: i64, label: &str) -> ResultEngine<i64> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be > 0"
        )));
    }
    Ok(amount_minor)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
