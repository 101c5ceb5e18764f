//! Request/response types shared by the HTTP server and clients.
//!
//! All monetary fields are integer **minor units** (cents); no float
//! ever carries money on the wire. Field names follow the public API
//! contract (`product_price`, `wallet_topup`, `amount`, ...).

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod customer {
    use super::*;

    /// Signup request body.
    ///
    /// Required fields are still `Option` here so an incomplete body
    /// reaches validation and answers 400, not an extractor rejection.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
        pub phone: Option<String>,
        pub rate_discount: Option<i32>,
    }

    /// Partial update body; omitted fields stay unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
        pub phone: Option<String>,
        pub rate_discount: Option<i32>,
        /// Wallet balance in minor units.
        pub wallet: Option<i64>,
    }

    /// Customer as returned by the API. Never carries the password.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub phone: String,
        pub rate_discount: i32,
        pub wallet: i64,
    }

    /// Response body after a delete.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerDeleted {
        pub id: Uuid,
        pub message: String,
    }

    /// Top-up request body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TopUp {
        pub id: Option<Uuid>,
        /// Amount to credit, in minor units; must be > 0.
        pub wallet_topup: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopUpResponse {
        pub message: String,
        pub current_wallet: i64,
    }
}

pub mod order {
    use super::*;

    /// Purchase request body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OrderBuy {
        pub customer_id: Option<Uuid>,
        pub product_name: Option<String>,
        /// Original price in minor units; must be > 0.
        pub product_price: Option<i64>,
    }

    /// An order receipt.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub id: Uuid,
        pub customer_id: Uuid,
        pub product_name: String,
        pub product_price: i64,
        pub discount_rate: i32,
        pub discount_amount: i64,
        pub final_price: i64,
        pub created_at: DateTime<Utc>,
    }

    /// Response body of a successful purchase.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseResponse {
        pub message: String,
        pub order: OrderView,
        pub remaining_wallet: i64,
    }

    /// Request body for listing one customer's orders.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerOrders {
        pub id: Uuid,
    }
}

pub mod ledger {
    use super::*;

    /// New income/expense entry.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EntryNew {
        pub title: Option<String>,
        /// `"income"` or `"expense"`.
        #[serde(rename = "type")]
        pub kind: Option<String>,
        /// Amount in minor units; must be > 0.
        pub amount: Option<i64>,
        /// Defaults to now when omitted.
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Partial update body for an entry.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EntryUpdate {
        pub title: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub amount: Option<i64>,
        pub date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: Uuid,
        pub title: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub amount: i64,
        pub date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryDeleted {
        pub id: Uuid,
        pub message: String,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(rename = "startDate")]
        pub start_date: Option<NaiveDate>,
        /// Inclusive: extended to the end of this day.
        #[serde(rename = "endDate")]
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Summary {
        pub income: i64,
        pub expense: i64,
    }

    /// Response body of `GET /transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        /// `income - expense` over the filtered entries.
        pub balance: i64,
        pub summary: Summary,
        pub transactions: Vec<EntryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GrowthView {
        pub income: f64,
        pub expense: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        /// Calendar month, 1-12.
        pub month: u32,
        pub income: i64,
        pub expense: i64,
    }

    /// Response body of `GET /transactions/dashboard`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub year: i32,
        pub totals: Summary,
        pub growth_rate: GrowthView,
        pub monthly_graph: Vec<MonthView>,
    }
}
