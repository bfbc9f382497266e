//! Payment transition and listing handlers.

use crate::dtos::{
    CollectPaymentRequest, CreateManualPaymentRequest, ListPaymentsQuery, SweepOverdueRequest,
    SweepOverdueResponse, ValidatePaymentRequest,
};
use crate::middleware::ActorContext;
use crate::models::{CreateManualPayment, ListPaymentsFilter, Payment};
use crate::services::payments::{self, CollectPayment};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

pub async fn list_payments(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = payments::list_payments(
        &state.store,
        &actor,
        ListPaymentsFilter {
            client_id: query.client_id,
            month: query.month,
            status: query.status,
            collector_id: query.collector_id,
        },
    )
    .await?;
    Ok(Json(payments))
}

pub async fn create_manual_payment(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Json(payload): Json<CreateManualPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = payments::create_manual_payment(
        &state.store,
        &actor,
        CreateManualPayment {
            client_id: payload.client_id,
            month: payload.month,
            amount: payload.amount,
            comments: payload.comments,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn collect_payment(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<CollectPaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    let payment = payments::collect(
        &state.store,
        &actor,
        payment_id,
        CollectPayment {
            collector_id: payload.collector_id,
            method: payload.method,
            amount_tendered: payload.amount_tendered,
            comments: payload.comments,
        },
    )
    .await?;
    Ok(Json(payment))
}

pub async fn validate_payment(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<ValidatePaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    let payment =
        payments::validate(&state.store, &actor, payment_id, payload.comments).await?;
    Ok(Json(payment))
}

pub async fn finalize_payment(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    let payment = payments::finalize(&state.store, &actor, payment_id).await?;
    Ok(Json(payment))
}

pub async fn sweep_overdue(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Json(payload): Json<SweepOverdueRequest>,
) -> Result<Json<SweepOverdueResponse>, AppError> {
    let today = payload.today.unwrap_or_else(|| Utc::now().date_naive());
    let updated = payments::sweep_overdue(&state.store, &actor, today).await?;
    Ok(Json(SweepOverdueResponse { updated }))
}
