use chrono::Utc;
use uuid::Uuid;

use sea_orm::{DbErr, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{EngineError, MoneyCents, Order, ResultEngine, customers, orders};

use super::{Engine, normalize_required_text, validate_positive_amount, with_tx};

/// Result of a successful purchase: the immutable order receipt plus
/// the wallet balance left after the debit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub order: Order,
    pub remaining_wallet: i64,
}

/// Attempts before a contended purchase gives up with a conflict.
const PURCHASE_RETRIES: u32 = 3;

/// Writer-writer contention on the wallet row; the whole transaction
/// can be retried once the competing one finishes.
fn is_lock_contention(err: &DbErr) -> bool {
    let text = err.to_string();
    text.contains("database is locked") || text.contains("database is deadlocked")
}

impl Engine {
    /// Buys a product for a customer.
    ///
    /// Applies the customer's discount rate to the price, debits the
    /// wallet and persists the order receipt, all inside one DB
    /// transaction. The debit is a single guarded statement
    /// (`SET wallet = wallet - ? WHERE id = ? AND wallet >= ?`), so two
    /// concurrent purchases can never both succeed against a balance
    /// that covers only one of them, and the wallet can never go
    /// negative.
    ///
    /// A transaction that loses the wallet row lock to a concurrent
    /// purchase is rolled back and retried up to [`PURCHASE_RETRIES`]
    /// times before surfacing as a conflict, so the caller sees a
    /// success, insufficient funds or a retryable conflict but never a
    /// raw lock error.
    ///
    /// Any failure leaves the wallet and the order set untouched.
    pub async fn purchase(
        &self,
        customer_id: Uuid,
        product_name: &str,
        product_price_minor: i64,
    ) -> ResultEngine<PurchaseReceipt> {
        let product_name = normalize_required_text(product_name, "product name")?;
        validate_positive_amount(product_price_minor, "product price")?;

        for _ in 0..PURCHASE_RETRIES {
            match self
                .purchase_once(customer_id, &product_name, product_price_minor)
                .await
            {
                Err(EngineError::Database(err)) if is_lock_contention(&err) => continue,
                outcome => return outcome,
            }
        }

        Err(EngineError::Conflict(
            "wallet is busy, retry the purchase".to_string(),
        ))
    }

    async fn purchase_once(
        &self,
        customer_id: Uuid,
        product_name: &str,
        product_price_minor: i64,
    ) -> ResultEngine<PurchaseReceipt> {
        let created_at = Utc::now();

        with_tx!(self, |db_tx| {
            let customer = customers::Entity::find_by_id(customer_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;

            let rate = customer.rate_discount;
            let price = MoneyCents::new(product_price_minor);
            let (discount_amount, final_price) = price.apply_discount(rate);

            // Guarded decrement: affordability is checked server-side in the
            // same statement that debits, so a concurrent purchase cannot
            // slip between the check and the write.
            let debited = customers::Entity::update_many()
                .col_expr(
                    customers::Column::Wallet,
                    Expr::col(customers::Column::Wallet).sub(final_price.cents()),
                )
                .filter(customers::Column::Id.eq(customer_id.to_string()))
                .filter(customers::Column::Wallet.gte(final_price.cents()))
                .exec(&db_tx)
                .await?;

            if debited.rows_affected == 0 {
                let available = customers::Entity::find_by_id(customer_id.to_string())
                    .one(&db_tx)
                    .await?
                    .map(|model| model.wallet)
                    .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
                return Err(EngineError::InsufficientFunds {
                    required_minor: final_price.cents(),
                    available_minor: available,
                });
            }

            let order = Order::new(
                customer_id,
                product_name.to_string(),
                price.cents(),
                rate,
                discount_amount.cents(),
                final_price.cents(),
                created_at,
            );
            let order_model: orders::ActiveModel = (&order).into();
            order_model.insert(&db_tx).await?;

            let remaining_wallet = customers::Entity::find_by_id(customer_id.to_string())
                .one(&db_tx)
                .await?
                .map(|model| model.wallet)
                .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;

            Ok(PurchaseReceipt {
                order,
                remaining_wallet,
            })
        })
    }

    /// Returns all orders, newest first.
    pub async fn orders(&self) -> ResultEngine<Vec<Order>> {
        let models = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Order::try_from).collect()
    }

    /// Returns the orders of one customer, newest first.
    pub async fn orders_for_customer(&self, customer_id: Uuid) -> ResultEngine<Vec<Order>> {
        let models = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(customer_id.to_string()))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Order::try_from).collect()
    }
}
