//! Cash-box request handlers.

use crate::dtos::{
    CloseCashBoxRequestBody, CreateCashBoxRequestBody, ListCashBoxQuery,
    RejectCashBoxRequestBody, UpdateCashBoxRequestBody,
};
use crate::middleware::ActorContext;
use crate::models::{CashBoxRequest, CreateCashBoxRequest, ListCashBoxFilter};
use crate::services::cashbox;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

pub async fn create_request(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Json(payload): Json<CreateCashBoxRequestBody>,
) -> Result<(StatusCode, Json<CashBoxRequest>), AppError> {
    let request = cashbox::create_request(
        &state.store,
        &actor,
        CreateCashBoxRequest {
            work_date: payload.work_date,
            requested: payload.requested,
            notes: payload.notes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_requests(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Query(query): Query<ListCashBoxQuery>,
) -> Result<Json<Vec<CashBoxRequest>>, AppError> {
    let requests = cashbox::list_requests(
        &state.store,
        &actor,
        ListCashBoxFilter {
            collector_id: query.collector_id,
            status: query.status,
            work_date: query.work_date,
        },
    )
    .await?;
    Ok(Json(requests))
}

pub async fn approve_request(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(request_id): Path<Uuid>,
) -> Result<Json<CashBoxRequest>, AppError> {
    let request = cashbox::approve_request(&state.store, &actor, request_id).await?;
    Ok(Json(request))
}

pub async fn reject_request(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<RejectCashBoxRequestBody>,
) -> Result<Json<CashBoxRequest>, AppError> {
    let request =
        cashbox::reject_request(&state.store, &actor, request_id, payload.reason).await?;
    Ok(Json(request))
}

pub async fn close_request(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<CloseCashBoxRequestBody>,
) -> Result<Json<CashBoxRequest>, AppError> {
    let request =
        cashbox::close_request(&state.store, &actor, request_id, payload.closing).await?;
    Ok(Json(request))
}

pub async fn update_request(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateCashBoxRequestBody>,
) -> Result<Json<CashBoxRequest>, AppError> {
    let request = cashbox::update_request(
        &state.store,
        &actor,
        request_id,
        payload.requested,
        payload.notes,
    )
    .await?;
    Ok(Json(request))
}

pub async fn delete_request(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(request_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    cashbox::delete_request(&state.store, &actor, request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
