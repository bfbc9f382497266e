//! Monthly debt generation.

use crate::models::{
    BillingMonth, BillingType, Client, Payment, PaymentMethod, PaymentStatus,
};
use crate::services::calendar::payment_date_for;
use crate::services::store::LedgerStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use service_core::auth::{require_role, Actor, OFFICE_ROLES};
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

/// Result of one generation run.
#[derive(Debug, Serialize)]
pub struct GeneratedDebts {
    pub month: BillingMonth,
    pub generated: usize,
    pub payments: Vec<Payment>,
}

fn debt_for(client: &Client, month: BillingMonth, now: DateTime<Utc>) -> Payment {
    let price = client.plan.monthly_price();
    let due_date = payment_date_for(month, client.preferred_payment_day);

    let (amount, status, method, collector_id, payment_date, comments) = match client.billing_type
    {
        BillingType::Free => (
            Decimal::ZERO,
            // Free months never require collection or reconciliation.
            PaymentStatus::Paid,
            Some(PaymentMethod::Free),
            client.assigned_collector,
            Some(now),
            Some("Free service month".to_string()),
        ),
        BillingType::Prorated => {
            let days_in_month = month.days_in_month();
            let prorated_days = client.prorated_days.unwrap_or(days_in_month);
            let amount = (price / Decimal::from(days_in_month) * Decimal::from(prorated_days))
                .round_dp(2);
            let comment = format!(
                "Prorated: {} / {} days x {} days = {}",
                price, days_in_month, prorated_days, amount
            );
            (
                amount,
                PaymentStatus::Pending,
                None,
                client.assigned_collector,
                None,
                Some(comment),
            )
        }
        BillingType::Normal => (
            price,
            PaymentStatus::Pending,
            None,
            client.assigned_collector,
            None,
            None,
        ),
    };

    Payment {
        payment_id: Uuid::new_v4(),
        client_id: client.client_id,
        month,
        amount,
        billing_type: client.billing_type,
        due_date,
        status,
        method,
        payment_date,
        amount_paid: (status == PaymentStatus::Paid).then_some(amount),
        collector_id,
        validated_by: None,
        validated_date: None,
        comments,
        created_utc: now,
        updated_utc: now,
    }
}

/// Create one payment per active client for the target month.
///
/// Idempotent by rejection: if any payment already exists for the month
/// the whole run fails with `Conflict` and nothing is written.
#[instrument(skip(store, actor), fields(month = %month))]
pub async fn generate_monthly_debts(
    store: &LedgerStore,
    actor: &Actor,
    month: BillingMonth,
) -> Result<GeneratedDebts, AppError> {
    require_role(actor, OFFICE_ROLES)?;

    let result = store
        .transact(move |ledger| {
            if ledger.month_generated(month) {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "debts for {} have already been generated",
                    month
                )));
            }

            let now = Utc::now();
            let rows: Vec<Payment> = ledger
                .clients
                .values()
                .filter(|c| c.is_active)
                .filter(|c| BillingMonth::from_date(c.installation_date) <= month)
                .map(|c| debt_for(c, month, now))
                .collect();

            for row in &rows {
                ledger.payments.insert(row.payment_id, row.clone());
            }

            Ok(GeneratedDebts {
                month,
                generated: rows.len(),
                payments: rows,
            })
        })
        .await?;

    info!(generated = result.generated, "Monthly debts generated");
    Ok(result)
}
