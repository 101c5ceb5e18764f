//! Core engine for the shop backend.
//!
//! Customers hold a wallet balance and an optional discount rate,
//! purchases debit the wallet at discounted price and leave an
//! immutable order receipt, and an independent income/expense ledger
//! feeds the balance summary and the dashboard.
//!
//! All monetary values are integer minor units ([`MoneyCents`]); all
//! wallet mutations are single guarded SQL statements executed inside
//! DB transactions.

pub use customers::Customer;
pub use entries::{EntryKind, LedgerEntry};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{
    CustomerNew, CustomerUpdate, Dashboard, Engine, EngineBuilder, EntryNew, EntryUpdate,
    GrowthRate, KindTotals, LedgerFilter, LedgerSummary, MonthlyPoint, PurchaseReceipt,
};
pub use orders::Order;

mod customers;
mod entries;
mod error;
mod money;
mod ops;
mod orders;

type ResultEngine<T> = Result<T, EngineError>;
