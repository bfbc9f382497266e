//! Request and response shapes for the HTTP API.

use crate::models::{
    BillingMonth, BillingType, CashFloat, PaymentMethod, PaymentStatus, ReviewDecision,
    ServicePlan, VoucherStatus,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(length(min = 6, max = 20))]
    pub national_id: String,
    pub contact: Option<String>,
    pub plan: ServicePlan,
    pub billing_type: BillingType,
    pub prorated_days: Option<u32>,
    #[validate(range(min = 1, max = 31))]
    pub preferred_payment_day: u32,
    pub payment_due_days: Option<u32>,
    pub assigned_collector: Option<Uuid>,
    pub installation_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateDebtsRequest {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateManualPaymentRequest {
    pub client_id: Uuid,
    pub month: BillingMonth,
    pub amount: Option<Decimal>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectPaymentRequest {
    pub collector_id: Option<Uuid>,
    pub method: PaymentMethod,
    pub amount_tendered: Option<Decimal>,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidatePaymentRequest {
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SweepOverdueRequest {
    /// Defaults to the current date; injectable for scheduled runs.
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SweepOverdueResponse {
    pub updated: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPaymentsQuery {
    pub client_id: Option<Uuid>,
    pub month: Option<BillingMonth>,
    pub status: Option<PaymentStatus>,
    pub collector_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitVoucherRequest {
    pub client_id: Uuid,
    #[validate(length(min = 6, max = 20))]
    pub operation_number: String,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub period_from: BillingMonth,
    /// Inclusive end of the covered period; defaults to `period_from`.
    pub period_to: Option<BillingMonth>,
    pub method: PaymentMethod,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewVoucherRequest {
    pub decision: ReviewDecision,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListVouchersQuery {
    pub client_id: Option<Uuid>,
    pub status: Option<VoucherStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCashBoxRequestBody {
    pub work_date: NaiveDate,
    pub requested: CashFloat,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCashBoxRequestBody {
    pub requested: Option<CashFloat>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectCashBoxRequestBody {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseCashBoxRequestBody {
    pub closing: CashFloat,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCashBoxQuery {
    pub collector_id: Option<Uuid>,
    pub status: Option<crate::models::CashBoxStatus>,
    pub work_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnpaidMonthsQuery {
    /// Evaluation date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdvanceMonthsQuery {
    pub count: Option<u32>,
    pub as_of: Option<NaiveDate>,
}
