use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{customers, orders, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/customers",
            post(customers::create).get(customers::list),
        )
        .route(
            "/customers/{id}",
            axum::routing::put(customers::update).delete(customers::delete),
        )
        .route("/customers/topup", post(customers::topup))
        .route("/orders/buy", post(orders::buy))
        .route("/orders", get(orders::list))
        .route("/orders/customer", post(orders::customer_orders))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/transactions/dashboard", get(transactions::dashboard))
        .route(
            "/transactions/{id}",
            axum::routing::put(transactions::update).delete(transactions::delete),
        )
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
