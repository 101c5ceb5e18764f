//! Customer API endpoints

use api_types::customer::{
    CustomerDeleted, CustomerNew, CustomerUpdate, CustomerView, TopUp, TopUpResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_customer(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        email: customer.email,
        phone: customer.phone,
        rate_discount: customer.rate_discount,
        wallet: customer.wallet,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let customer = state
        .engine
        .create_customer(engine::CustomerNew {
            name: payload.name.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            password: payload.password.unwrap_or_default(),
            phone: payload.phone.unwrap_or_default(),
            rate_discount: payload.rate_discount,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_customer(customer))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CustomerView>>, ServerError> {
    let customers = state.engine.customers().await?;
    Ok(Json(customers.into_iter().map(map_customer).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerUpdate>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state
        .engine
        .update_customer(
            id,
            engine::CustomerUpdate {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                phone: payload.phone,
                rate_discount: payload.rate_discount,
                wallet: payload.wallet,
            },
        )
        .await?;

    Ok(Json(map_customer(customer)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDeleted>, ServerError> {
    state.engine.delete_customer(id).await?;

    Ok(Json(CustomerDeleted {
        id,
        message: "Customer removed".to_string(),
    }))
}

pub async fn topup(
    State(state): State<ServerState>,
    Json(payload): Json<TopUp>,
) -> Result<Json<TopUpResponse>, ServerError> {
    let id = payload
        .id
        .ok_or_else(|| ServerError::Generic("id is required".to_string()))?;
    let amount = payload.wallet_topup.unwrap_or(0);

    let current_wallet = state.engine.top_up(id, amount).await?;

    Ok(Json(TopUpResponse {
        message: "Top-up successful".to_string(),
        current_wallet,
    }))
}
