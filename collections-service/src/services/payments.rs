//! Payment state machine and overdue sweep.
//!
//! Every transition checks role and current state at the top; the store
//! transaction guarantees two concurrent transitions on the same payment
//! cannot both commit.

use crate::models::{
    CreateManualPayment, ListPaymentsFilter, Payment, PaymentMethod, PaymentStatus,
};
use crate::services::calendar::{due_date_for, payment_date_for};
use crate::services::store::LedgerStore;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use service_core::auth::{require_role, Actor, Role, OFFICE_ROLES};
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

/// Input for a field collection.
#[derive(Debug, Clone)]
pub struct CollectPayment {
    /// Required when the actor is an office role; ignored for collector
    /// actors, who always collect under their own identity.
    pub collector_id: Option<Uuid>,
    pub method: PaymentMethod,
    /// Amount physically tendered. Below the amount owed the payment
    /// parks in `Partial`; absent means collected in full.
    pub amount_tendered: Option<Decimal>,
    pub comments: Option<String>,
}

fn append_comment(existing: &mut Option<String>, addition: Option<String>) {
    if let Some(addition) = addition {
        match existing {
            Some(current) => {
                current.push_str(" | ");
                current.push_str(&addition);
            }
            None => *existing = Some(addition),
        }
    }
}

/// Record a field collection: `Pending`/`Overdue`/`Partial` -> `Collected`
/// (or `Partial` when the tendered amount is below the amount owed).
#[instrument(skip(store, input))]
pub async fn collect(
    store: &LedgerStore,
    actor: &Actor,
    payment_id: Uuid,
    input: CollectPayment,
) -> Result<Payment, AppError> {
    require_role(actor, &[Role::Admin, Role::Subadmin, Role::Collector])?;

    let collector_id = match actor.role {
        Role::Collector => actor.user_id,
        _ => input.collector_id.ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("collector_id is required"))
        })?,
    };
    let actor = *actor;

    let payment = store
        .transact(move |ledger| {
            let payment = ledger
                .payments
                .get_mut(&payment_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("payment not found")))?;

            if !payment.status.is_collectible() {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "payment is {} and can no longer be collected",
                    payment.status.as_str()
                )));
            }
            // A collector may only collect their own or unassigned payments.
            if actor.role == Role::Collector {
                if let Some(assigned) = payment.collector_id {
                    if assigned != actor.user_id {
                        return Err(AppError::Forbidden(anyhow::anyhow!(
                            "payment is assigned to another collector"
                        )));
                    }
                }
            }

            let already_paid = payment.amount_paid.unwrap_or(Decimal::ZERO);
            let tendered = input.amount_tendered.unwrap_or(payment.amount - already_paid);
            if tendered <= Decimal::ZERO {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "tendered amount must be positive"
                )));
            }
            let total_paid = already_paid + tendered;

            payment.status = if total_paid < payment.amount {
                PaymentStatus::Partial
            } else {
                PaymentStatus::Collected
            };
            payment.amount_paid = Some(total_paid);
            payment.method = Some(input.method);
            payment.collector_id = Some(collector_id);
            payment.payment_date = Some(Utc::now());
            append_comment(&mut payment.comments, input.comments);
            payment.updated_utc = Utc::now();

            Ok(payment.clone())
        })
        .await?;

    info!(payment_id = %payment.payment_id, status = payment.status.as_str(), "Payment collected");
    Ok(payment)
}

/// Office confirmation that the collected funds were received:
/// `Collected` -> `Validated`. Collectors can never validate.
#[instrument(skip(store, comments))]
pub async fn validate(
    store: &LedgerStore,
    actor: &Actor,
    payment_id: Uuid,
    comments: Option<String>,
) -> Result<Payment, AppError> {
    require_role(actor, OFFICE_ROLES)?;
    let validator_id = actor.user_id;

    let payment = store
        .transact(move |ledger| {
            let payment = ledger
                .payments
                .get_mut(&payment_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("payment not found")))?;

            if payment.status != PaymentStatus::Collected {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "only collected payments can be validated, payment is {}",
                    payment.status.as_str()
                )));
            }

            payment.status = PaymentStatus::Validated;
            payment.validated_by = Some(validator_id);
            payment.validated_date = Some(Utc::now());
            append_comment(&mut payment.comments, comments);
            payment.updated_utc = Utc::now();

            Ok(payment.clone())
        })
        .await?;

    info!(payment_id = %payment.payment_id, "Payment validated");
    Ok(payment)
}

/// Finalization: `Validated` -> `Paid`. The only path into `Paid`.
#[instrument(skip(store))]
pub async fn finalize(
    store: &LedgerStore,
    actor: &Actor,
    payment_id: Uuid,
) -> Result<Payment, AppError> {
    // No role gate beyond being a platform actor; typically triggered
    // right after validation.
    let _ = actor;

    let payment = store
        .transact(move |ledger| {
            let payment = ledger
                .payments
                .get_mut(&payment_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("payment not found")))?;

            if payment.status != PaymentStatus::Validated {
                return Err(AppError::InvalidState(anyhow::anyhow!(
                    "payment must be validated before it can be finalized"
                )));
            }

            payment.status = PaymentStatus::Paid;
            payment.updated_utc = Utc::now();
            Ok(payment.clone())
        })
        .await?;

    info!(payment_id = %payment.payment_id, "Payment finalized");
    Ok(payment)
}

/// Create an ad-hoc (manual or advance) payment obligation.
#[instrument(skip(store, input))]
pub async fn create_manual_payment(
    store: &LedgerStore,
    actor: &Actor,
    input: CreateManualPayment,
) -> Result<Payment, AppError> {
    require_role(actor, OFFICE_ROLES)?;

    store
        .transact(move |ledger| {
            let client = ledger
                .clients
                .get(&input.client_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("client not found")))?;

            if ledger.payment_for(input.client_id, input.month).is_some() {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "a payment for {} already exists for this client",
                    input.month
                )));
            }

            let now = Utc::now();
            let payment = Payment {
                payment_id: Uuid::new_v4(),
                client_id: client.client_id,
                month: input.month,
                amount: input.amount.unwrap_or_else(|| client.plan.monthly_price()),
                billing_type: client.billing_type,
                due_date: payment_date_for(input.month, client.preferred_payment_day),
                status: PaymentStatus::Pending,
                method: None,
                payment_date: None,
                amount_paid: None,
                collector_id: client.assigned_collector,
                validated_by: None,
                validated_date: None,
                comments: input.comments,
                created_utc: now,
                updated_utc: now,
            };
            ledger.payments.insert(payment.payment_id, payment.clone());
            Ok(payment)
        })
        .await
}

/// List payments, shaped by the actor's visibility:
/// collectors see their own or unassigned payments, clients their own.
#[instrument(skip(store, filter))]
pub async fn list_payments(
    store: &LedgerStore,
    actor: &Actor,
    filter: ListPaymentsFilter,
) -> Result<Vec<Payment>, AppError> {
    let actor = *actor;
    let mut payments = store
        .read(move |ledger| {
            ledger
                .payments
                .values()
                .filter(|p| filter.client_id.map_or(true, |id| p.client_id == id))
                .filter(|p| filter.month.map_or(true, |m| p.month == m))
                .filter(|p| filter.status.map_or(true, |s| p.status == s))
                .filter(|p| filter.collector_id.map_or(true, |id| p.collector_id == Some(id)))
                .filter(|p| match actor.role {
                    Role::Collector => {
                        p.collector_id == Some(actor.user_id) || p.collector_id.is_none()
                    }
                    Role::Client => p.client_id == actor.user_id,
                    _ => true,
                })
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;

    payments.sort_by(|a, b| (a.month, a.created_utc).cmp(&(b.month, b.created_utc)));
    Ok(payments)
}

/// Flip pending payments whose grace period has expired to `Overdue`.
/// Idempotent; never touches collected, validated, paid, or partial rows.
#[instrument(skip(store))]
pub async fn sweep_overdue(
    store: &LedgerStore,
    actor: &Actor,
    today: NaiveDate,
) -> Result<usize, AppError> {
    require_role(actor, OFFICE_ROLES)?;

    let updated = store
        .transact(move |ledger| {
            let grace_by_client: std::collections::HashMap<Uuid, u32> = ledger
                .clients
                .values()
                .map(|c| (c.client_id, c.payment_due_days))
                .collect();

            let mut updated = 0;
            for payment in ledger.payments.values_mut() {
                if payment.status != PaymentStatus::Pending {
                    continue;
                }
                let grace = grace_by_client.get(&payment.client_id).copied().unwrap_or(0);
                if due_date_for(payment.due_date, grace) < today {
                    payment.status = PaymentStatus::Overdue;
                    payment.updated_utc = Utc::now();
                    updated += 1;
                }
            }
            Ok(updated)
        })
        .await?;

    info!(updated, "Overdue sweep completed");
    Ok(updated)
}
