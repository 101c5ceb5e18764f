use uuid::Uuid;

use sea_orm::{
    ActiveValue, DbErr, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{Customer, EngineError, ResultEngine, customers};

use super::{
    Engine, normalize_email, normalize_required_text, validate_positive_amount, validate_rate,
    with_tx,
};

/// Input for [`Engine::create_customer`].
#[derive(Clone, Debug)]
pub struct CustomerNew {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub rate_discount: Option<i32>,
}

/// Partial update for [`Engine::update_customer`]; `None` fields are
/// left untouched.
#[derive(Clone, Debug, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub rate_discount: Option<i32>,
    pub wallet: Option<i64>,
}

/// Collapses a violation of the unique email index into `ExistingKey`.
fn unique_email_conflict(err: DbErr, email: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(email.to_string()),
        _ => EngineError::Database(err),
    }
}

impl Engine {
    /// Signs up a new customer with an empty wallet.
    ///
    /// All of name, email, password and phone are required; the email
    /// must not already be taken (case-insensitive).
    pub async fn create_customer(&self, input: CustomerNew) -> ResultEngine<Customer> {
        let name = normalize_required_text(&input.name, "name")?;
        let email = normalize_email(&input.email)?;
        let password = normalize_required_text(&input.password, "password")?;
        let phone = normalize_required_text(&input.phone, "phone")?;
        let rate = validate_rate(input.rate_discount.unwrap_or(0))?;

        with_tx!(self, |db_tx| {
            let customer = Customer::new(name, email, phone, rate);

            // The unique index on email is the arbiter; a pre-flight
            // SELECT would race against a concurrent signup.
            if let Err(err) = customers::active_model(&customer, &password)
                .insert(&db_tx)
                .await
            {
                return Err(unique_email_conflict(err, &customer.email));
            }

            Ok(customer)
        })
    }

    /// Returns all customers.
    pub async fn customers(&self) -> ResultEngine<Vec<Customer>> {
        let models = customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Customer::try_from).collect()
    }

    /// Returns a customer snapshot from DB.
    pub async fn customer(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        let model = customers::Entity::find_by_id(customer_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
        Customer::try_from(model)
    }

    /// Applies a partial update to an existing customer.
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        update: CustomerUpdate,
    ) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| {
            let current = customers::Entity::find_by_id(customer_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;

            let mut changed = false;
            let mut new_email = None;
            let mut active = customers::ActiveModel {
                id: ActiveValue::Set(customer_id.to_string()),
                ..Default::default()
            };

            if let Some(name) = update.name {
                active.name = ActiveValue::Set(normalize_required_text(&name, "name")?);
                changed = true;
            }
            if let Some(email) = update.email {
                let email = normalize_email(&email)?;
                let taken = customers::Entity::find()
                    .filter(Expr::cust("LOWER(email)").eq(email.clone()))
                    .filter(customers::Column::Id.ne(customer_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if taken {
                    return Err(EngineError::ExistingKey(email));
                }
                active.email = ActiveValue::Set(email.clone());
                new_email = Some(email);
                changed = true;
            }
            if let Some(password) = update.password {
                active.password =
                    ActiveValue::Set(normalize_required_text(&password, "password")?);
                changed = true;
            }
            if let Some(phone) = update.phone {
                active.phone = ActiveValue::Set(normalize_required_text(&phone, "phone")?);
                changed = true;
            }
            if let Some(rate) = update.rate_discount {
                active.rate_discount = ActiveValue::Set(validate_rate(rate)?);
                changed = true;
            }
            if let Some(wallet) = update.wallet {
                if wallet < 0 {
                    return Err(EngineError::InvalidInput(
                        "wallet must be >= 0".to_string(),
                    ));
                }
                active.wallet = ActiveValue::Set(wallet);
                changed = true;
            }

            if !changed {
                return Customer::try_from(current);
            }

            let model = active.update(&db_tx).await.map_err(|err| {
                unique_email_conflict(err, new_email.as_deref().unwrap_or(&current.email))
            })?;
            Customer::try_from(model)
        })
    }

    /// Removes a customer.
    pub async fn delete_customer(&self, customer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = customers::Entity::delete_by_id(customer_id.to_string())
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("customer not exists".to_string()));
            }
            Ok(())
        })
    }

    /// Credits a wallet by `amount_minor` and returns the new balance.
    ///
    /// The increment happens server-side in a single `UPDATE wallet =
    /// wallet + ?` statement, never as a read-modify-write pair, so
    /// concurrent top-ups cannot lose updates.
    pub async fn top_up(&self, customer_id: Uuid, amount_minor: i64) -> ResultEngine<i64> {
        validate_positive_amount(amount_minor, "top-up amount")?;

        with_tx!(self, |db_tx| {
            let updated = customers::Entity::update_many()
                .col_expr(
                    customers::Column::Wallet,
                    Expr::col(customers::Column::Wallet).add(amount_minor),
                )
                .filter(customers::Column::Id.eq(customer_id.to_string()))
                .exec(&db_tx)
                .await?;
            if updated.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("customer not exists".to_string()));
            }

            let model = customers::Entity::find_by_id(customer_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
            Ok(model.wallet)
        })
    }
}
