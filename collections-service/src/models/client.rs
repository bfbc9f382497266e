//! Client model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service plan with a fixed monthly price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePlan {
    Basic,
    Standard,
    Premium,
}

impl ServicePlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServicePlan::Basic => "basic",
            ServicePlan::Standard => "standard",
            ServicePlan::Premium => "premium",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "basic" => ServicePlan::Basic,
            "premium" => ServicePlan::Premium,
            _ => ServicePlan::Standard,
        }
    }

    /// Fixed monthly price for the plan.
    pub fn monthly_price(&self) -> Decimal {
        match self {
            ServicePlan::Basic => Decimal::from(50),
            ServicePlan::Standard => Decimal::from(80),
            ServicePlan::Premium => Decimal::from(120),
        }
    }
}

/// How monthly debts are generated for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    Normal,
    Prorated,
    Free,
}

impl BillingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingType::Normal => "normal",
            BillingType::Prorated => "prorated",
            BillingType::Free => "free",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "prorated" => BillingType::Prorated,
            "free" => BillingType::Free,
            _ => BillingType::Normal,
        }
    }
}

/// Default grace period, in calendar days, between the scheduled payment
/// day and the moment a pending payment becomes overdue.
pub const DEFAULT_PAYMENT_DUE_DAYS: u32 = 5;

/// Subscribed client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub client_id: Uuid,
    pub full_name: String,
    pub national_id: String,
    pub contact: Option<String>,
    pub plan: ServicePlan,
    pub billing_type: BillingType,
    /// Days of service billed in the first month; used only when
    /// `billing_type` is `Prorated`.
    pub prorated_days: Option<u32>,
    /// Day of month (1-31) the client prefers to pay on; clamped to the
    /// month's last day when shorter.
    pub preferred_payment_day: u32,
    /// Grace period in days before a pending payment goes overdue.
    pub payment_due_days: u32,
    pub assigned_collector: Option<Uuid>,
    pub is_active: bool,
    /// Anchors the earliest billable month.
    pub installation_date: NaiveDate,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for onboarding a client.
#[derive(Debug, Clone)]
pub struct CreateClient {
    pub full_name: String,
    pub national_id: String,
    pub contact: Option<String>,
    pub plan: ServicePlan,
    pub billing_type: BillingType,
    pub prorated_days: Option<u32>,
    pub preferred_payment_day: u32,
    pub payment_due_days: Option<u32>,
    pub assigned_collector: Option<Uuid>,
    pub installation_date: NaiveDate,
}
