//! Client onboarding and "what do I owe" queries.
//!
//! General client CRUD (name/address edits) lives outside this service;
//! only the operations the billing engine depends on are exposed.

use crate::models::{BillingType, Client, CreateClient, DEFAULT_PAYMENT_DUE_DAYS};
use crate::services::calendar::{advance_months_for, unpaid_months_for, MonthCharge};
use crate::services::store::LedgerStore;
use chrono::{NaiveDate, Utc};
use service_core::auth::{require_role, Actor, Role, OFFICE_ROLES};
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

#[instrument(skip(store, input), fields(national_id = %input.national_id))]
pub async fn create_client(
    store: &LedgerStore,
    actor: &Actor,
    input: CreateClient,
) -> Result<Client, AppError> {
    require_role(actor, OFFICE_ROLES)?;

    if !(1..=31).contains(&input.preferred_payment_day) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "preferred payment day must be between 1 and 31"
        )));
    }
    if input.billing_type == BillingType::Prorated && input.prorated_days.is_none() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "prorated billing requires prorated_days"
        )));
    }

    let now = Utc::now();
    let client = Client {
        client_id: Uuid::new_v4(),
        full_name: input.full_name,
        national_id: input.national_id,
        contact: input.contact,
        plan: input.plan,
        billing_type: input.billing_type,
        prorated_days: input.prorated_days,
        preferred_payment_day: input.preferred_payment_day,
        payment_due_days: input.payment_due_days.unwrap_or(DEFAULT_PAYMENT_DUE_DAYS),
        assigned_collector: input.assigned_collector,
        is_active: true,
        installation_date: input.installation_date,
        created_utc: now,
        updated_utc: now,
    };

    let stored = client.clone();
    store
        .transact(move |ledger| {
            if ledger
                .clients
                .values()
                .any(|c| c.national_id == stored.national_id)
            {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "a client with national id '{}' already exists",
                    stored.national_id
                )));
            }
            ledger.clients.insert(stored.client_id, stored);
            Ok(())
        })
        .await?;

    info!(client_id = %client.client_id, "Client onboarded");
    Ok(client)
}

/// Soft-delete: clients with payment history are deactivated, never removed.
#[instrument(skip(store))]
pub async fn deactivate_client(
    store: &LedgerStore,
    actor: &Actor,
    client_id: Uuid,
) -> Result<Client, AppError> {
    require_role(actor, OFFICE_ROLES)?;

    store
        .transact(|ledger| {
            let client = ledger
                .clients
                .get_mut(&client_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("client not found")))?;
            client.is_active = false;
            client.updated_utc = Utc::now();
            Ok(client.clone())
        })
        .await
}

fn authorize_client_query(actor: &Actor, client: &Client) -> Result<(), AppError> {
    match actor.role {
        Role::Admin | Role::Subadmin => Ok(()),
        Role::Collector if client.assigned_collector == Some(actor.user_id) => Ok(()),
        Role::Client if client.client_id == actor.user_id => Ok(()),
        _ => Err(AppError::Forbidden(anyhow::anyhow!(
            "not allowed to query this client's debts"
        ))),
    }
}

/// Months the client still owes, annotated with computed schedule dates.
#[instrument(skip(store))]
pub async fn unpaid_months(
    store: &LedgerStore,
    actor: &Actor,
    client_id: Uuid,
    as_of: NaiveDate,
) -> Result<Vec<MonthCharge>, AppError> {
    let actor = *actor;
    store
        .read(move |ledger| {
            let client = ledger
                .clients
                .get(&client_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("client not found")))?;
            authorize_client_query(&actor, client)?;
            let payments = ledger.client_payments(client_id);
            Ok(unpaid_months_for(client, &payments, as_of))
        })
        .await
}

/// Consecutive future months for "pay N months in advance" flows.
#[instrument(skip(store))]
pub async fn advance_months(
    store: &LedgerStore,
    actor: &Actor,
    client_id: Uuid,
    count: u32,
    as_of: NaiveDate,
) -> Result<Vec<MonthCharge>, AppError> {
    let actor = *actor;
    store
        .read(move |ledger| {
            let client = ledger
                .clients
                .get(&client_id)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("client not found")))?;
            authorize_client_query(&actor, client)?;
            let payments = ledger.client_payments(client_id);
            Ok(advance_months_for(client, &payments, count, as_of))
        })
        .await
}
