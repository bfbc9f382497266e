//! Debt-generation handlers.

use crate::dtos::GenerateDebtsRequest;
use crate::middleware::ActorContext;
use crate::models::BillingMonth;
use crate::services::billing::{self, GeneratedDebts};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use validator::Validate;

pub async fn generate_monthly_debts(
    State(state): State<AppState>,
    ActorContext(actor): ActorContext,
    Json(payload): Json<GenerateDebtsRequest>,
) -> Result<(StatusCode, Json<GeneratedDebts>), AppError> {
    payload.validate()?;

    let month = BillingMonth::new(payload.year, payload.month).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("invalid target month"))
    })?;

    let result = billing::generate_monthly_debts(&state.store, &actor, month).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
