//! Cash-box request model: a collector's request for a starting cash and
//! digital float for one work day, approved by office staff.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cash-box request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashBoxStatus {
    Pending,
    Approved,
    Rejected,
    Closed,
}

impl CashBoxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashBoxStatus::Pending => "pending",
            CashBoxStatus::Approved => "approved",
            CashBoxStatus::Rejected => "rejected",
            CashBoxStatus::Closed => "closed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "approved" => CashBoxStatus::Approved,
            "rejected" => CashBoxStatus::Rejected,
            "closed" => CashBoxStatus::Closed,
            _ => CashBoxStatus::Pending,
        }
    }
}

/// Cash plus digital-channel breakdown of a float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFloat {
    pub cash: Decimal,
    pub yape: Decimal,
    pub plin: Decimal,
    pub transfer: Decimal,
}

impl CashFloat {
    pub fn total(&self) -> Decimal {
        self.cash + self.yape + self.plin + self.transfer
    }
}

/// A collector's float request for one work date. At most one pending
/// request may exist per (collector_id, work_date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashBoxRequest {
    pub request_id: Uuid,
    pub collector_id: Uuid,
    pub work_date: NaiveDate,
    pub requested: CashFloat,
    pub notes: Option<String>,
    pub status: CashBoxStatus,
    pub approved_by: Option<Uuid>,
    pub approval_date: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Counted float at day close.
    pub closing: Option<CashFloat>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a cash-box request.
#[derive(Debug, Clone)]
pub struct CreateCashBoxRequest {
    pub work_date: NaiveDate,
    pub requested: CashFloat,
    pub notes: Option<String>,
}

/// Filter parameters for listing cash-box requests.
#[derive(Debug, Clone, Default)]
pub struct ListCashBoxFilter {
    pub collector_id: Option<Uuid>,
    pub status: Option<CashBoxStatus>,
    pub work_date: Option<NaiveDate>,
}
