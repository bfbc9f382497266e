//! Cash-box request workflow: a collector asks for a starting float for a
//! work day; office staff approve or reject, and the day is closed with the
//! counted float.

use crate::models::{
    CashBoxRequest, CashBoxStatus, CashFloat, CreateCashBoxRequest, ListCashBoxFilter,
};
use crate::services::store::LedgerStore;
use chrono::Utc;
use service_core::auth::{require_role, Actor, Role, OFFICE_ROLES};
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

/// Create a float request. A collector may have at most one pending
/// request per work date.
#[instrument(skip(store, input), fields(work_date = %input.work_date))]
pub async fn create_request(
    store: &LedgerStore,
    actor: &Actor,
    input: CreateCashBoxRequest,
) -> Result<CashBoxRequest, AppError> {
    require_role(actor, &[Role::Collector])?;
    let collector_id = actor.user_id;

    let request = store
        .transact(move |ledger| {
            let duplicate = ledger.cashbox_requests.values().any(|r| {
                r.collector_id == collector_id
                    && r.work_date == input.work_date
                    && r.status == CashBoxStatus::Pending
            });
            if duplicate {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "a pending cash-box request for {} already exists",
                    input.work_date
                )));
            }

            let now = Utc::now();
            let request = CashBoxRequest {
                request_id: Uuid::new_v4(),
                collector_id,
                work_date: input.work_date,
                requested: input.requested,
                notes: input.notes,
                status: CashBoxStatus::Pending,
                approved_by: None,
                approval_date: None,
                rejected_by: None,
                rejection_reason: None,
                closed_at: None,
                closing: None,
                created_utc: now,
                updated_utc: now,
            };
            ledger
                .cashbox_requests
                .insert(request.request_id, request.clone());
            Ok(request)
        })
        .await?;

    info!(request_id = %request.request_id, "Cash-box request created");
    Ok(request)
}

/// Approve a pending request.
#[instrument(skip(store))]
pub async fn approve_request(
    store: &LedgerStore,
    actor: &Actor,
    request_id: Uuid,
) -> Result<CashBoxRequest, AppError> {
    require_role(actor, OFFICE_ROLES)?;
    let approver_id = actor.user_id;

    store
        .transact(move |ledger| {
            let request = ledger
                .cashbox_requests
                .get_mut(&request_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("cash-box request not found")))?;

            if request.status != CashBoxStatus::Pending {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "only pending requests can be approved, request is {}",
                    request.status.as_str()
                )));
            }

            request.status = CashBoxStatus::Approved;
            request.approved_by = Some(approver_id);
            request.approval_date = Some(Utc::now());
            request.updated_utc = Utc::now();
            Ok(request.clone())
        })
        .await
}

/// Reject a pending request with a reason.
#[instrument(skip(store, reason))]
pub async fn reject_request(
    store: &LedgerStore,
    actor: &Actor,
    request_id: Uuid,
    reason: String,
) -> Result<CashBoxRequest, AppError> {
    require_role(actor, OFFICE_ROLES)?;
    let rejecter_id = actor.user_id;

    store
        .transact(move |ledger| {
            let request = ledger
                .cashbox_requests
                .get_mut(&request_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("cash-box request not found")))?;

            if request.status != CashBoxStatus::Pending {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "only pending requests can be rejected, request is {}",
                    request.status.as_str()
                )));
            }

            request.status = CashBoxStatus::Rejected;
            request.rejected_by = Some(rejecter_id);
            request.rejection_reason = Some(reason);
            request.updated_utc = Utc::now();
            Ok(request.clone())
        })
        .await
}

/// Close an approved request with the counted day-end float.
#[instrument(skip(store, closing))]
pub async fn close_request(
    store: &LedgerStore,
    actor: &Actor,
    request_id: Uuid,
    closing: CashFloat,
) -> Result<CashBoxRequest, AppError> {
    require_role(actor, &[Role::Admin, Role::Subadmin, Role::Collector])?;
    let actor = *actor;

    store
        .transact(move |ledger| {
            let request = ledger
                .cashbox_requests
                .get_mut(&request_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("cash-box request not found")))?;

            if actor.role == Role::Collector && request.collector_id != actor.user_id {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "request belongs to another collector"
                )));
            }
            if request.status == CashBoxStatus::Closed {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "cash-box request is already closed"
                )));
            }
            if request.status != CashBoxStatus::Approved {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "only approved requests can be closed, request is {}",
                    request.status.as_str()
                )));
            }

            request.status = CashBoxStatus::Closed;
            request.closing = Some(closing);
            request.closed_at = Some(Utc::now());
            request.updated_utc = Utc::now();
            Ok(request.clone())
        })
        .await
}

/// Amend a request while it is still pending; only the requesting
/// collector may do so.
#[instrument(skip(store, requested, notes))]
pub async fn update_request(
    store: &LedgerStore,
    actor: &Actor,
    request_id: Uuid,
    requested: Option<CashFloat>,
    notes: Option<String>,
) -> Result<CashBoxRequest, AppError> {
    require_role(actor, &[Role::Collector])?;
    let actor = *actor;

    store
        .transact(move |ledger| {
            let request = ledger
                .cashbox_requests
                .get_mut(&request_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("cash-box request not found")))?;

            if request.collector_id != actor.user_id {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "request belongs to another collector"
                )));
            }
            if request.status != CashBoxStatus::Pending {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "only pending requests can be updated, request is {}",
                    request.status.as_str()
                )));
            }

            if let Some(requested) = requested {
                request.requested = requested;
            }
            if notes.is_some() {
                request.notes = notes;
            }
            request.updated_utc = Utc::now();
            Ok(request.clone())
        })
        .await
}

/// Withdraw a pending request: the requesting collector or an office role.
#[instrument(skip(store))]
pub async fn delete_request(
    store: &LedgerStore,
    actor: &Actor,
    request_id: Uuid,
) -> Result<(), AppError> {
    let actor = *actor;

    store
        .transact(move |ledger| {
            let request = ledger
                .cashbox_requests
                .get(&request_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("cash-box request not found")))?;

            let allowed = actor.role.is_office()
                || (actor.role == Role::Collector && request.collector_id == actor.user_id);
            if !allowed {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "not allowed to delete this cash-box request"
                )));
            }
            if request.status != CashBoxStatus::Pending {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "only pending requests can be deleted, request is {}",
                    request.status.as_str()
                )));
            }

            ledger.cashbox_requests.remove(&request_id);
            Ok(())
        })
        .await
}

/// List requests; collector actors only see their own.
#[instrument(skip(store, filter))]
pub async fn list_requests(
    store: &LedgerStore,
    actor: &Actor,
    filter: ListCashBoxFilter,
) -> Result<Vec<CashBoxRequest>, AppError> {
    require_role(actor, &[Role::Admin, Role::Subadmin, Role::Collector])?;
    let actor = *actor;

    let mut requests = store
        .read(move |ledger| {
            ledger
                .cashbox_requests
                .values()
                .filter(|r| filter.collector_id.map_or(true, |id| r.collector_id == id))
                .filter(|r| filter.status.map_or(true, |s| r.status == s))
                .filter(|r| filter.work_date.map_or(true, |d| r.work_date == d))
                .filter(|r| match actor.role {
                    Role::Collector => r.collector_id == actor.user_id,
                    _ => true,
                })
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;

    requests.sort_by_key(|r| (r.work_date, r.created_utc));
    Ok(requests)
}
