//! Payment model.

use crate::models::{BillingMonth, BillingType};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment status.
///
/// Legal transitions: `Pending -> Overdue` (time-driven),
/// `Pending|Overdue|Partial -> Collected` (field collection),
/// `Pending|Overdue -> Partial` (partial collection),
/// `Collected -> Validated` (office review), `Validated -> Paid`
/// (finalization). A payment can never reach `Paid` without passing
/// through `Validated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Overdue,
    Partial,
    Collected,
    Validated,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Collected => "collected",
            PaymentStatus::Validated => "validated",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "overdue" => PaymentStatus::Overdue,
            "partial" => PaymentStatus::Partial,
            "collected" => PaymentStatus::Collected,
            "validated" => PaymentStatus::Validated,
            "paid" => PaymentStatus::Paid,
            _ => PaymentStatus::Pending,
        }
    }

    /// States a field collection is accepted from.
    pub fn is_collectible(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Pending | PaymentStatus::Overdue | PaymentStatus::Partial
        )
    }
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Yape,
    Plin,
    Card,
    Free,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Yape => "yape",
            PaymentMethod::Plin => "plin",
            PaymentMethod::Card => "card",
            PaymentMethod::Free => "free",
        }
    }
}

/// One billing obligation for one client for one calendar month.
/// At most one payment exists per (client_id, month).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: Uuid,
    pub client_id: Uuid,
    pub month: BillingMonth,
    pub amount: Decimal,
    pub billing_type: BillingType,
    /// Scheduled payment day for the month (clamped preferred day).
    /// The overdue sweep adds the client's grace period on top.
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub payment_date: Option<DateTime<Utc>>,
    /// Cumulative amount tendered so far; below `amount` while `Partial`.
    pub amount_paid: Option<Decimal>,
    pub collector_id: Option<Uuid>,
    pub validated_by: Option<Uuid>,
    pub validated_date: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating an ad-hoc (manual or advance) payment.
#[derive(Debug, Clone)]
pub struct CreateManualPayment {
    pub client_id: Uuid,
    pub month: BillingMonth,
    pub amount: Option<Decimal>,
    pub comments: Option<String>,
}

/// Filter parameters for listing payments.
#[derive(Debug, Clone, Default)]
pub struct ListPaymentsFilter {
    pub client_id: Option<Uuid>,
    pub month: Option<BillingMonth>,
    pub status: Option<PaymentStatus>,
    pub collector_id: Option<Uuid>,
}
