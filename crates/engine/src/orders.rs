//! Order primitives.
//!
//! An `Order` is an immutable receipt: it snapshots the price, the
//! discount rate in force at purchase time and the exact amount
//! debited. Orders are created only by a successful purchase and never
//! updated afterwards.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_name: String,
    /// Original product price in minor units, always > 0.
    pub product_price: i64,
    /// Discount percentage snapshotted from the customer.
    pub discount_rate: i32,
    /// `product_price * discount_rate / 100`, rounded to the cent.
    pub discount_amount: i64,
    /// Amount actually debited: `product_price - discount_amount`.
    pub final_price: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        customer_id: Uuid,
        product_name: String,
        product_price: i64,
        discount_rate: i32,
        discount_amount: i64,
        final_price: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            product_name,
            product_price,
            discount_rate,
            discount_amount,
            final_price,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub product_name: String,
    pub product_price: i64,
    pub discount_rate: i32,
    pub discount_amount: i64,
    pub final_price: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Order> for ActiveModel {
    fn from(order: &Order) -> Self {
        Self {
            id: ActiveValue::Set(order.id.to_string()),
            customer_id: ActiveValue::Set(order.customer_id.to_string()),
            product_name: ActiveValue::Set(order.product_name.clone()),
            product_price: ActiveValue::Set(order.product_price),
            discount_rate: ActiveValue::Set(order.discount_rate),
            discount_amount: ActiveValue::Set(order.discount_amount),
            final_price: ActiveValue::Set(order.final_price),
            created_at: ActiveValue::Set(order.created_at),
        }
    }
}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("order not exists".to_string()))?,
            customer_id: Uuid::parse_str(&model.customer_id)
                .map_err(|_| EngineError::KeyNotFound("customer not exists".to_string()))?,
            product_name: model.product_name,
            product_price: model.product_price,
            discount_rate: model.discount_rate,
            discount_amount: model.discount_amount,
            final_price: model.final_price,
            created_at: model.created_at,
        })
    }
}
