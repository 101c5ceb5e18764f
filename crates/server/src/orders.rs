//! Order API endpoints

use api_types::order::{CustomerOrders, OrderBuy, OrderView, PurchaseResponse};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_order(order: engine::Order) -> OrderView {
    OrderView {
        id: order.id,
        customer_id: order.customer_id,
        product_name: order.product_name,
        product_price: order.product_price,
        discount_rate: order.discount_rate,
        discount_amount: order.discount_amount,
        final_price: order.final_price,
        created_at: order.created_at,
    }
}

pub async fn buy(
    State(state): State<ServerState>,
    Json(payload): Json<OrderBuy>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ServerError> {
    let customer_id = payload
        .customer_id
        .ok_or_else(|| ServerError::Generic("customer_id is required".to_string()))?;
    let product_name = payload.product_name.unwrap_or_default();
    let product_price = payload.product_price.unwrap_or(0);

    let receipt = state
        .engine
        .purchase(customer_id, &product_name, product_price)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            message: "Purchase successful".to_string(),
            order: map_order(receipt.order),
            remaining_wallet: receipt.remaining_wallet,
        }),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<OrderView>>, ServerError> {
    let orders = state.engine.orders().await?;
    Ok(Json(orders.into_iter().map(map_order).collect()))
}

pub async fn customer_orders(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerOrders>,
) -> Result<Json<Vec<OrderView>>, ServerError> {
    let orders = state.engine.orders_for_customer(payload.id).await?;
    Ok(Json(orders.into_iter().map(map_order).collect()))
}
