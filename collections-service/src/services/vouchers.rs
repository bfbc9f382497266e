//! Voucher reconciliation workflow.
//!
//! Submitting a voucher records the claim only; approving it does not move
//! any payment. Office staff follow up with the `collect`/`validate`
//! transitions using the voucher's amount, method, and date, which keeps
//! partial and cross-month reconciliation explicit and auditable.

use crate::models::{
    ListVouchersFilter, ReviewDecision, SubmitVoucher, Voucher, VoucherFile, VoucherStatus,
    ALLOWED_VOUCHER_MIME_TYPES, MAX_VOUCHER_FILE_BYTES,
};
use crate::services::store::LedgerStore;
use chrono::Utc;
use service_core::auth::{require_role, Actor, Role, OFFICE_ROLES};
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

fn check_operation_number(operation_number: &str) -> Result<(), AppError> {
    let digits_only = operation_number.chars().all(|c| c.is_ascii_digit());
    if !digits_only || !(6..=20).contains(&operation_number.len()) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "operation number must be 6 to 20 digits"
        )));
    }
    Ok(())
}

fn check_file(size_bytes: u64, mime_type: &str) -> Result<(), AppError> {
    if size_bytes == 0 || size_bytes > MAX_VOUCHER_FILE_BYTES {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "voucher file must be between 1 byte and {} bytes",
            MAX_VOUCHER_FILE_BYTES
        )));
    }
    if !ALLOWED_VOUCHER_MIME_TYPES.contains(&mime_type) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "voucher file type '{}' is not accepted (jpeg, png, pdf only)",
            mime_type
        )));
    }
    Ok(())
}

/// Record a client-submitted proof of payment. Touches no payment rows.
#[instrument(skip(store, input), fields(operation_number = %input.operation_number))]
pub async fn submit_voucher(
    store: &LedgerStore,
    actor: &Actor,
    input: SubmitVoucher,
) -> Result<Voucher, AppError> {
    if actor.role == Role::Client && actor.user_id != input.client_id {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "clients may only submit vouchers for themselves"
        )));
    }
    check_operation_number(&input.operation_number)?;
    check_file(input.size_bytes, &input.mime_type)?;

    let voucher = store
        .transact(move |ledger| {
            if !ledger.clients.contains_key(&input.client_id) {
                return Err(AppError::NotFound(anyhow::anyhow!("client not found")));
            }
            if ledger
                .vouchers
                .values()
                .any(|v| v.operation_number == input.operation_number)
            {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "a voucher with operation number {} was already submitted",
                    input.operation_number
                )));
            }

            let now = Utc::now();
            let voucher = Voucher {
                voucher_id: Uuid::new_v4(),
                client_id: input.client_id,
                operation_number: input.operation_number,
                amount: input.amount,
                payment_date: input.payment_date,
                period: input.period,
                method: input.method,
                file: VoucherFile {
                    file_name: input.file_name,
                    size_bytes: input.size_bytes,
                    mime_type: input.mime_type,
                    storage_key: Uuid::new_v4(),
                },
                comments: input.comments,
                status: VoucherStatus::Pending,
                reviewed_by: None,
                review_date: None,
                review_comments: None,
                created_utc: now,
                updated_utc: now,
            };
            ledger.vouchers.insert(voucher.voucher_id, voucher.clone());
            Ok(voucher)
        })
        .await?;

    info!(voucher_id = %voucher.voucher_id, period = %voucher.period, "Voucher submitted");
    Ok(voucher)
}

/// Approve or reject a pending voucher. A voucher is reviewed exactly once.
#[instrument(skip(store, comments))]
pub async fn review_voucher(
    store: &LedgerStore,
    actor: &Actor,
    voucher_id: Uuid,
    decision: ReviewDecision,
    comments: Option<String>,
) -> Result<Voucher, AppError> {
    require_role(actor, OFFICE_ROLES)?;
    let reviewer_id = actor.user_id;

    let voucher = store
        .transact(move |ledger| {
            let voucher = ledger
                .vouchers
                .get_mut(&voucher_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("voucher not found")))?;

            if voucher.status != VoucherStatus::Pending {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "voucher was already reviewed ({})",
                    voucher.status.as_str()
                )));
            }

            voucher.status = match decision {
                ReviewDecision::Approved => VoucherStatus::Approved,
                ReviewDecision::Rejected => VoucherStatus::Rejected,
            };
            voucher.reviewed_by = Some(reviewer_id);
            voucher.review_date = Some(Utc::now());
            voucher.review_comments = comments;
            voucher.updated_utc = Utc::now();

            Ok(voucher.clone())
        })
        .await?;

    info!(voucher_id = %voucher.voucher_id, status = voucher.status.as_str(), "Voucher reviewed");
    Ok(voucher)
}

/// List vouchers; client actors only ever see their own.
#[instrument(skip(store, filter))]
pub async fn list_vouchers(
    store: &LedgerStore,
    actor: &Actor,
    filter: ListVouchersFilter,
) -> Result<Vec<Voucher>, AppError> {
    let actor = *actor;
    let mut vouchers = store
        .read(move |ledger| {
            ledger
                .vouchers
                .values()
                .filter(|v| filter.client_id.map_or(true, |id| v.client_id == id))
                .filter(|v| filter.status.map_or(true, |s| v.status == s))
                .filter(|v| match actor.role {
                    Role::Client => v.client_id == actor.user_id,
                    _ => true,
                })
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;

    vouchers.sort_by_key(|v| v.created_utc);
    Ok(vouchers)
}

/// Administrative override; vouchers are never deleted by normal workflow.
#[instrument(skip(store))]
pub async fn delete_voucher(
    store: &LedgerStore,
    actor: &Actor,
    voucher_id: Uuid,
) -> Result<(), AppError> {
    require_role(actor, &[Role::Admin])?;

    store
        .transact(move |ledger| {
            ledger
                .vouchers
                .remove(&voucher_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("voucher not found")))?;
            Ok(())
        })
        .await
}
