use std::sync::Arc;

use sea_orm::Database;
use uuid::Uuid;

use engine::{CustomerNew, CustomerUpdate, Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

/// Pool capped at one connection so concurrent transactions serialize
/// at the storage boundary, the way a shared external store would.
async fn engine_with_serialized_pool() -> Engine {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

/// File-backed DB behind a multi-connection pool, matching the
/// production connect in the app crate.
async fn engine_with_pooled_file_db(path: &std::path::Path) -> Engine {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let mut options = sea_orm::ConnectOptions::new(url);
    options.max_connections(5);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn shopper(engine: &Engine, rate_discount: i32, wallet_minor: i64) -> engine::Customer {
    let customer = engine
        .create_customer(CustomerNew {
            name: "Rich Shopper".to_string(),
            email: format!("shopper_{}@test.com", Uuid::new_v4()),
            password: "123".to_string(),
            phone: "0888888888".to_string(),
            rate_discount: Some(rate_discount),
        })
        .await
        .unwrap();

    if wallet_minor > 0 {
        engine
            .update_customer(
                customer.id,
                CustomerUpdate {
                    wallet: Some(wallet_minor),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    customer
}

#[tokio::test]
async fn purchase_applies_discount_and_debits_wallet() {
    let engine = engine_with_db().await;
    let customer = shopper(&engine, 10, 1000_00).await;

    let receipt = engine
        .purchase(customer.id, "Gaming Mouse", 500_00)
        .await
        .unwrap();

    assert_eq!(receipt.order.product_price, 500_00);
    assert_eq!(receipt.order.discount_rate, 10);
    assert_eq!(receipt.order.discount_amount, 50_00);
    assert_eq!(receipt.order.final_price, 450_00);
    assert_eq!(receipt.remaining_wallet, 550_00);

    let reloaded = engine.customer(customer.id).await.unwrap();
    assert_eq!(reloaded.wallet, 550_00);
}

#[tokio::test]
async fn failed_purchase_changes_nothing() {
    let engine = engine_with_db().await;
    let customer = shopper(&engine, 10, 1000_00).await;

    engine
        .purchase(customer.id, "Gaming Mouse", 500_00)
        .await
        .unwrap();

    let err = engine
        .purchase(customer.id, "Expensive Car", 100000_00)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds {
            required_minor: 90000_00,
            available_minor: 550_00,
        }
    );

    let reloaded = engine.customer(customer.id).await.unwrap();
    assert_eq!(reloaded.wallet, 550_00);
    assert_eq!(engine.orders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn purchase_unknown_customer_is_not_found() {
    let engine = engine_with_db().await;

    let err = engine
        .purchase(Uuid::new_v4(), "Gaming Mouse", 500_00)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn purchase_rejects_bad_input_without_mutation() {
    let engine = engine_with_db().await;
    let customer = shopper(&engine, 0, 1000_00).await;

    for (name, price) in [("  ", 500_00), ("Gaming Mouse", 0), ("Gaming Mouse", -10)] {
        let err = engine.purchase(customer.id, name, price).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    assert_eq!(engine.customer(customer.id).await.unwrap().wallet, 1000_00);
    assert!(engine.orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn receipt_amounts_always_reconcile() {
    let engine = engine_with_db().await;

    for (rate, price) in [(0, 19_99), (7, 3_33), (25, 1), (50, 999_99), (100, 42_00)] {
        let customer = shopper(&engine, rate, 1_000_000_00).await;
        let receipt = engine.purchase(customer.id, "Widget", price).await.unwrap();

        assert_eq!(
            receipt.order.final_price,
            receipt.order.product_price - receipt.order.discount_amount
        );
        assert_eq!(
            engine.customer(customer.id).await.unwrap().wallet,
            1_000_000_00 - receipt.order.final_price
        );
    }
}

#[tokio::test]
async fn orders_listed_per_customer() {
    let engine = engine_with_db().await;
    let alice = shopper(&engine, 0, 100_00).await;
    let bob = shopper(&engine, 0, 100_00).await;

    engine.purchase(alice.id, "Pen", 5_00).await.unwrap();
    engine.purchase(bob.id, "Pencil", 3_00).await.unwrap();
    engine.purchase(alice.id, "Paper", 2_00).await.unwrap();

    assert_eq!(engine.orders().await.unwrap().len(), 3);

    let alice_orders = engine.orders_for_customer(alice.id).await.unwrap();
    assert_eq!(alice_orders.len(), 2);
    assert!(alice_orders.iter().all(|order| order.customer_id == alice.id));
}

#[tokio::test]
async fn top_up_credits_and_validates() {
    let engine = engine_with_db().await;
    let customer = shopper(&engine, 0, 0).await;

    assert_eq!(engine.top_up(customer.id, 250_00).await.unwrap(), 250_00);
    assert_eq!(engine.top_up(customer.id, 100_00).await.unwrap(), 350_00);

    for bad in [0, -5_00] {
        let err = engine.top_up(customer.id, bad).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    let err = engine.top_up(Uuid::new_v4(), 10_00).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn wallet_never_negative_through_mixed_sequence() {
    let engine = engine_with_db().await;
    let customer = shopper(&engine, 5, 0).await;

    engine.top_up(customer.id, 100_00).await.unwrap();
    engine.purchase(customer.id, "Snack", 40_00).await.unwrap();
    let _ = engine.purchase(customer.id, "Console", 500_00).await;
    engine.top_up(customer.id, 20_00).await.unwrap();
    let _ = engine.purchase(customer.id, "Console", 500_00).await;

    let wallet = engine.customer(customer.id).await.unwrap().wallet;
    assert!(wallet >= 0, "wallet went negative: {wallet}");
}

#[tokio::test]
async fn concurrent_purchases_cannot_overdraw() {
    let engine = Arc::new(engine_with_serialized_pool().await);
    // Each purchase is individually affordable, together they are not.
    let customer = shopper(&engine, 0, 500_00).await;

    let first = {
        let engine = Arc::clone(&engine);
        let id = customer.id;
        tokio::spawn(async move { engine.purchase(id, "Headset", 300_00).await })
    };
    let second = {
        let engine = Arc::clone(&engine);
        let id = customer.id;
        tokio::spawn(async move { engine.purchase(id, "Keyboard", 300_00).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|result| result.is_ok()).count();

    assert_eq!(successes, 1, "exactly one purchase must win the balance");
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(
                err,
                EngineError::InsufficientFunds { .. } | EngineError::Conflict(_)
            ));
        }
    }

    let wallet = engine.customer(customer.id).await.unwrap().wallet;
    assert_eq!(wallet, 200_00);
    assert_eq!(engine.orders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_purchases_on_pooled_connections_resolve_cleanly() {
    let path = std::env::temp_dir().join(format!("shoplet-race-{}.db", Uuid::new_v4()));
    let engine = Arc::new(engine_with_pooled_file_db(&path).await);

    // Racing transactions on separate connections can hit real lock
    // contention, so run several rounds to give it a chance to appear.
    for _ in 0..20 {
        let customer = shopper(&engine, 0, 500_00).await;

        let first = {
            let engine = Arc::clone(&engine);
            let id = customer.id;
            tokio::spawn(async move { engine.purchase(id, "Headset", 300_00).await })
        };
        let second = {
            let engine = Arc::clone(&engine);
            let id = customer.id;
            tokio::spawn(async move { engine.purchase(id, "Keyboard", 300_00).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|result| result.is_ok()).count();

        assert_eq!(successes, 1, "exactly one purchase must win the balance");
        for result in &results {
            if let Err(err) = result {
                assert!(
                    matches!(
                        err,
                        EngineError::InsufficientFunds { .. } | EngineError::Conflict(_)
                    ),
                    "loser must see insufficient funds or a conflict, got {err:?}"
                );
            }
        }

        let wallet = engine.customer(customer.id).await.unwrap().wallet;
        assert_eq!(wallet, 200_00);
    }

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(path.with_extension(format!("db{suffix}")));
    }
}

#[tokio::test]
async fn create_customer_rejects_duplicate_email() {
    let engine = engine_with_db().await;

    let input = CustomerNew {
        name: "Test Robot".to_string(),
        email: "robot@test.com".to_string(),
        password: "123".to_string(),
        phone: "0999999999".to_string(),
        rate_discount: None,
    };
    engine.create_customer(input.clone()).await.unwrap();

    let err = engine
        .create_customer(CustomerNew {
            email: "Robot@Test.com".to_string(),
            ..input
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn update_customer_rejects_taken_email() {
    let engine = engine_with_db().await;
    let first = shopper(&engine, 0, 0).await;
    let second = shopper(&engine, 0, 0).await;

    let err = engine
        .update_customer(
            second.id,
            CustomerUpdate {
                email: Some(first.email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn customer_crud_round_trip() {
    let engine = engine_with_db().await;
    let customer = shopper(&engine, 0, 0).await;

    let updated = engine
        .update_customer(
            customer.id,
            CustomerUpdate {
                name: Some("Renamed Shopper".to_string()),
                rate_discount: Some(15),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed Shopper");
    assert_eq!(updated.rate_discount, 15);

    let err = engine
        .update_customer(
            customer.id,
            CustomerUpdate {
                rate_discount: Some(101),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    engine.delete_customer(customer.id).await.unwrap();
    let err = engine.customer(customer.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
