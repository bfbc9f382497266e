//! Client onboarding and debt-query handlers.

use crate::dtos::{AdvanceMonthsQuery, CreateClientRequest, UnpaidMonthsQuery};
use crate::middleware::ActorContext;
use crate::models::{Client, CreateClient};
use crate::services::calendar::MonthCharge;
use crate::services::clients;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub async fn create_client(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    payload.validate()?;

    let client = clients::create_client(
        &state.store,
        &actor,
        CreateClient {
            full_name: payload.full_name,
            national_id: payload.national_id,
            contact: payload.contact,
            plan: payload.plan,
            billing_type: payload.billing_type,
            prorated_days: payload.prorated_days,
            preferred_payment_day: payload.preferred_payment_day,
            payment_due_days: payload.payment_due_days,
            assigned_collector: payload.assigned_collector,
            installation_date: payload.installation_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn deactivate_client(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = clients::deactivate_client(&state.store, &actor, client_id).await?;
    Ok(Json(client))
}

pub async fn unpaid_months(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(client_id): Path<Uuid>,
    Query(query): Query<UnpaidMonthsQuery>,
) -> Result<Json<Vec<MonthCharge>>, AppError> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let owed = clients::unpaid_months(&state.store, &actor, client_id, as_of).await?;
    Ok(Json(owed))
}

pub async fn advance_months(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(client_id): Path<Uuid>,
    Query(query): Query<AdvanceMonthsQuery>,
) -> Result<Json<Vec<MonthCharge>>, AppError> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let count = query.count.unwrap_or(1).clamp(1, 24);
    let ahead = clients::advance_months(&state.store, &actor, client_id, count, as_of).await?;
    Ok(Json(ahead))
}
