//! Voucher model: client-submitted proof of a payment made outside the
//! system (bank transfer, mobile wallet, etc.).

use crate::models::{MonthRange, PaymentMethod};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted voucher file size.
pub const MAX_VOUCHER_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted voucher file mime types.
pub const ALLOWED_VOUCHER_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// Voucher review status. A voucher is reviewed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    Pending,
    Approved,
    Rejected,
}

impl VoucherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherStatus::Pending => "pending",
            VoucherStatus::Approved => "approved",
            VoucherStatus::Rejected => "rejected",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "approved" => VoucherStatus::Approved,
            "rejected" => VoucherStatus::Rejected,
            _ => VoucherStatus::Pending,
        }
    }
}

/// Reviewer decision on a pending voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

/// Metadata of the uploaded proof file. The binary payload lives in blob
/// storage under `storage_key`; this service only keeps the reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherFile {
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub storage_key: Uuid,
}

/// Client-submitted claim of payment for one or more billing months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    pub voucher_id: Uuid,
    pub client_id: Uuid,
    /// External transaction reference, globally unique, 6-20 digits.
    pub operation_number: String,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub period: MonthRange,
    pub method: PaymentMethod,
    pub file: VoucherFile,
    pub comments: Option<String>,
    pub status: VoucherStatus,
    pub reviewed_by: Option<Uuid>,
    pub review_date: Option<DateTime<Utc>>,
    pub review_comments: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for submitting a voucher.
#[derive(Debug, Clone)]
pub struct SubmitVoucher {
    pub client_id: Uuid,
    pub operation_number: String,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub period: MonthRange,
    pub method: PaymentMethod,
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub comments: Option<String>,
}

/// Filter parameters for listing vouchers.
#[derive(Debug, Clone, Default)]
pub struct ListVouchersFilter {
    pub client_id: Option<Uuid>,
    pub status: Option<VoucherStatus>,
}
