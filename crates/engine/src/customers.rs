//! The module contains the `Customer` struct and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A shop customer.
///
/// Customers hold a spendable wallet balance (integer minor units) and
/// an optional percentage discount applied to every purchase. The
/// wallet is only ever mutated by a top-up (+) or a purchase (-) and
/// never goes negative.
///
/// The stored password never leaves the database layer: it lives on the
/// persistence [`Model`] but not on this struct, so it cannot leak into
/// API responses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    /// Stable identifier, generated once and persisted as a string.
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Percentage discount in `0..=100` applied at purchase time.
    pub rate_discount: i32,
    /// Wallet balance in minor units. Invariant: `wallet >= 0`.
    pub wallet: i64,
}

impl Customer {
    pub fn new(name: String, email: String, phone: String, rate_discount: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            rate_discount,
            wallet: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub rate_discount: i32,
    pub wallet: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Customer {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("customer not exists".to_string()))?,
            name: model.name,
            email: model.email,
            phone: model.phone,
            rate_discount: model.rate_discount,
            wallet: model.wallet,
        })
    }
}

/// Builds the insertable model; the password only exists here.
pub(crate) fn active_model(customer: &Customer, password: &str) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(customer.id.to_string()),
        name: ActiveValue::Set(customer.name.clone()),
        email: ActiveValue::Set(customer.email.clone()),
        password: ActiveValue::Set(password.to_string()),
        phone: ActiveValue::Set(customer.phone.clone()),
        rate_discount: ActiveValue::Set(customer.rate_discount),
        wallet: ActiveValue::Set(customer.wallet),
    }
}
