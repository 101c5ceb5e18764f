//! Ledger (income/expense) API endpoints

use api_types::ledger::{
    DashboardResponse, EntryDeleted, EntryNew, EntryUpdate, EntryView, GrowthView, LedgerQuery,
    LedgerResponse, MonthView, Summary,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_entry(entry: engine::LedgerEntry) -> EntryView {
    EntryView {
        id: entry.id,
        title: entry.title,
        kind: entry.kind.as_str().to_string(),
        amount: entry.amount,
        date: entry.date,
    }
}

fn parse_kind(value: &str) -> Result<engine::EntryKind, ServerError> {
    Ok(engine::EntryKind::try_from(value)?)
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EntryNew>,
) -> Result<(StatusCode, Json<EntryView>), ServerError> {
    let kind = parse_kind(payload.kind.as_deref().unwrap_or(""))?;

    let entry = state
        .engine
        .add_entry(engine::EntryNew {
            title: payload.title.unwrap_or_default(),
            kind,
            amount_minor: payload.amount.unwrap_or(0),
            date: payload.date.map(|dt| dt.with_timezone(&Utc)),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_entry(entry))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let kind = query.kind.as_deref().map(parse_kind).transpose()?;

    let summary = state
        .engine
        .summarize(engine::LedgerFilter {
            kind,
            start: query.start_date,
            end: query.end_date,
        })
        .await?;

    Ok(Json(LedgerResponse {
        balance: summary.balance_minor,
        summary: Summary {
            income: summary.total_income_minor,
            expense: summary.total_expense_minor,
        },
        transactions: summary.entries.into_iter().map(map_entry).collect(),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryUpdate>,
) -> Result<Json<EntryView>, ServerError> {
    let kind = payload.kind.as_deref().map(parse_kind).transpose()?;

    let entry = state
        .engine
        .update_entry(
            id,
            engine::EntryUpdate {
                title: payload.title,
                kind,
                amount_minor: payload.amount,
                date: payload.date.map(|dt| dt.with_timezone(&Utc)),
            },
        )
        .await?;

    Ok(Json(map_entry(entry)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryDeleted>, ServerError> {
    state.engine.delete_entry(id).await?;

    Ok(Json(EntryDeleted {
        id,
        message: "Transaction removed".to_string(),
    }))
}

pub async fn dashboard(
    State(state): State<ServerState>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let year = Utc::now().year();
    let dashboard = state.engine.dashboard(year).await?;

    Ok(Json(DashboardResponse {
        year: dashboard.year,
        totals: Summary {
            income: dashboard.totals.income_minor,
            expense: dashboard.totals.expense_minor,
        },
        growth_rate: GrowthView {
            income: dashboard.growth_rate.income,
            expense: dashboard.growth_rate.expense,
        },
        monthly_graph: dashboard
            .monthly_graph
            .into_iter()
            .map(|point| MonthView {
                month: point.month,
                income: point.income_minor,
                expense: point.expense_minor,
            })
            .collect(),
    }))
}
