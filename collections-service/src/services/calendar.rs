//! Billing calendar: pure date and amount computations, no side effects.

use crate::models::{BillingMonth, BillingType, Client, Payment, PaymentStatus};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// One month a client owes (or may pre-pay), annotated with its computed
/// schedule.
#[derive(Debug, Clone, Serialize)]
pub struct MonthCharge {
    pub month: BillingMonth,
    pub amount: Decimal,
    /// Scheduled payment date: preferred day clamped to the month's end.
    pub payment_date: NaiveDate,
    /// Payment date plus the client's grace period.
    pub due_date: NaiveDate,
    pub is_past_due: bool,
    /// Status of the existing payment row, when one exists.
    pub status: Option<PaymentStatus>,
}

/// Scheduled payment date for a month: `min(preferred_day, last day)`.
pub fn payment_date_for(month: BillingMonth, preferred_day: u32) -> NaiveDate {
    month.clamped_day(preferred_day)
}

/// Due date: payment date plus the grace period in calendar days.
pub fn due_date_for(payment_date: NaiveDate, grace_days: u32) -> NaiveDate {
    payment_date
        .checked_add_days(Days::new(grace_days as u64))
        .unwrap_or(payment_date)
}

fn monthly_amount(client: &Client) -> Decimal {
    match client.billing_type {
        BillingType::Free => Decimal::ZERO,
        _ => client.plan.monthly_price(),
    }
}

fn charge_for(client: &Client, month: BillingMonth, row: Option<&Payment>, today: NaiveDate) -> MonthCharge {
    let payment_date = payment_date_for(month, client.preferred_payment_day);
    let due_date = due_date_for(payment_date, client.payment_due_days);
    MonthCharge {
        month,
        amount: row.map(|p| p.amount).unwrap_or_else(|| monthly_amount(client)),
        payment_date,
        due_date,
        is_past_due: today > due_date,
        status: row.map(|p| p.status),
    }
}

/// Every month the client still owes, from the installation month through
/// the month of `today`. A month is owed when no payment row exists for it
/// or the existing row is still `Pending`/`Overdue`.
pub fn unpaid_months_for(client: &Client, payments: &[&Payment], today: NaiveDate) -> Vec<MonthCharge> {
    let start = BillingMonth::from_date(client.installation_date);
    let end = BillingMonth::from_date(today);
    if start > end {
        return Vec::new();
    }

    let mut owed = Vec::new();
    let mut month = start;
    loop {
        let row = payments.iter().find(|p| p.month == month).copied();
        let is_owed = match row {
            None => true,
            Some(p) => matches!(p.status, PaymentStatus::Pending | PaymentStatus::Overdue),
        };
        if is_owed {
            owed.push(charge_for(client, month, row, today));
        }
        if month == end {
            break;
        }
        month = month.next();
    }
    owed
}

/// `count` consecutive months for "pay N months in advance", starting at
/// the first owed month or, when nothing is owed, at the first month with
/// no payment row after the billed horizon.
pub fn advance_months_for(
    client: &Client,
    payments: &[&Payment],
    count: u32,
    today: NaiveDate,
) -> Vec<MonthCharge> {
    let owed = unpaid_months_for(client, payments, today);
    let mut month = match owed.first() {
        Some(first) => first.month,
        None => {
            // Walk forward from the current month to the first unbilled one.
            let mut m = BillingMonth::from_date(today);
            while payments.iter().any(|p| p.month == m) {
                m = m.next();
            }
            m
        }
    };

    let mut ahead = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let row = payments.iter().find(|p| p.month == month).copied();
        ahead.push(charge_for(client, month, row, today));
        month = month.next();
    }
    ahead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ServicePlan, DEFAULT_PAYMENT_DUE_DAYS};
    use chrono::Utc;
    use uuid::Uuid;

    fn client_installed(date: &str, preferred_day: u32) -> Client {
        let now = Utc::now();
        Client {
            client_id: Uuid::new_v4(),
            full_name: "Test Client".to_string(),
            national_id: "12345678".to_string(),
            contact: None,
            plan: ServicePlan::Premium,
            billing_type: BillingType::Normal,
            prorated_days: None,
            preferred_payment_day: preferred_day,
            payment_due_days: DEFAULT_PAYMENT_DUE_DAYS,
            assigned_collector: None,
            is_active: true,
            installation_date: date.parse().unwrap(),
            created_utc: now,
            updated_utc: now,
        }
    }

    #[test]
    fn payment_day_clamps_to_february() {
        let feb = BillingMonth::new(2024, 2).unwrap();
        assert_eq!(
            payment_date_for(feb, 31),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn due_date_adds_grace_days() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            due_date_for(date, 5),
            NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()
        );
    }

    #[test]
    fn unpaid_months_with_clamped_payment_days() {
        // Installed 2024-01-01, preferred day 31, no payments recorded,
        // today 2024-03-10: January and February are past due, March is not.
        let client = client_installed("2024-01-01", 31);
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let owed = unpaid_months_for(&client, &[], today);
        assert_eq!(owed.len(), 3);

        assert_eq!(owed[0].month.to_string(), "2024-01");
        assert_eq!(
            owed[0].payment_date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(owed[0].is_past_due);

        assert_eq!(owed[1].month.to_string(), "2024-02");
        assert_eq!(
            owed[1].payment_date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(owed[1].is_past_due);

        assert_eq!(owed[2].month.to_string(), "2024-03");
        assert!(!owed[2].is_past_due);
    }

    #[test]
    fn advance_months_start_after_billed_horizon_when_nothing_owed() {
        let client = client_installed("2024-01-01", 15);
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

        // January is billed and already paid.
        let now = Utc::now();
        let paid = Payment {
            payment_id: Uuid::new_v4(),
            client_id: client.client_id,
            month: BillingMonth::new(2024, 1).unwrap(),
            amount: client.plan.monthly_price(),
            billing_type: BillingType::Normal,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: PaymentStatus::Paid,
            method: None,
            payment_date: Some(now),
            amount_paid: Some(client.plan.monthly_price()),
            collector_id: None,
            validated_by: None,
            validated_date: None,
            comments: None,
            created_utc: now,
            updated_utc: now,
        };

        let ahead = advance_months_for(&client, &[&paid], 3, today);
        let months: Vec<String> = ahead.iter().map(|c| c.month.to_string()).collect();
        assert_eq!(months, vec!["2024-02", "2024-03", "2024-04"]);
        assert!(ahead.iter().all(|c| c.amount == Decimal::from(120)));
    }
}
