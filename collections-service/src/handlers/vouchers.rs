//! Voucher submission and review handlers.

use crate::dtos::{ListVouchersQuery, ReviewVoucherRequest, SubmitVoucherRequest};
use crate::middleware::ActorContext;
use crate::models::{ListVouchersFilter, MonthRange, SubmitVoucher, Voucher};
use crate::services::vouchers;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub async fn submit_voucher(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Json(payload): Json<SubmitVoucherRequest>,
) -> Result<(StatusCode, Json<Voucher>), AppError> {
    payload.validate()?;

    let period_to = payload.period_to.unwrap_or(payload.period_from);
    let period = MonthRange::new(payload.period_from, period_to).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "period start must not be after period end"
        ))
    })?;

    let voucher = vouchers::submit_voucher(
        &state.store,
        &actor,
        SubmitVoucher {
            client_id: payload.client_id,
            operation_number: payload.operation_number,
            amount: payload.amount,
            payment_date: payload.payment_date,
            period,
            method: payload.method,
            file_name: payload.file_name,
            size_bytes: payload.size_bytes,
            mime_type: payload.mime_type,
            comments: payload.comments,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(voucher)))
}

pub async fn review_voucher(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(voucher_id): Path<Uuid>,
    Json(payload): Json<ReviewVoucherRequest>,
) -> Result<Json<Voucher>, AppError> {
    let voucher = vouchers::review_voucher(
        &state.store,
        &actor,
        voucher_id,
        payload.decision,
        payload.comments,
    )
    .await?;
    Ok(Json(voucher))
}

pub async fn list_vouchers(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Query(query): Query<ListVouchersQuery>,
) -> Result<Json<Vec<Voucher>>, AppError> {
    let vouchers = vouchers::list_vouchers(
        &state.store,
        &actor,
        ListVouchersFilter {
            client_id: query.client_id,
            status: query.status,
        },
    )
    .await?;
    Ok(Json(vouchers))
}

pub async fn delete_voucher(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Path(voucher_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    vouchers::delete_voucher(&state.store, &actor, voucher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
