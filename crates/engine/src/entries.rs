//! Ledger entry primitives.
//!
//! A `LedgerEntry` is a dated income or expense fact, independent of
//! orders. Entries are plain records: they can be created, updated and
//! deleted, and only feed the balance summary and the dashboard.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidInput(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub title: String,
    pub kind: EntryKind,
    /// Amount in minor units, always > 0; the kind carries the sign.
    pub amount: i64,
    pub date: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(title: String, kind: EntryKind, amount: i64, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            kind,
            amount,
            date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub kind: String,
    pub amount: i64,
    pub date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            title: ActiveValue::Set(entry.title.clone()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            amount: ActiveValue::Set(entry.amount),
            date: ActiveValue::Set(entry.date),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("entry not exists".to_string()))?,
            title: model.title,
            kind: EntryKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            date: model.date,
        })
    }
}
