//! Domain models for the collections service.

mod cashbox;
mod client;
mod month;
mod payment;
mod voucher;

pub use cashbox::{
    CashBoxRequest, CashBoxStatus, CashFloat, CreateCashBoxRequest, ListCashBoxFilter,
};
pub use client::{
    BillingType, Client, CreateClient, ServicePlan, DEFAULT_PAYMENT_DUE_DAYS,
};
pub use month::{BillingMonth, MonthRange, ParseMonthError};
pub use payment::{
    CreateManualPayment, ListPaymentsFilter, Payment, PaymentMethod, PaymentStatus,
};
pub use voucher::{
    ListVouchersFilter, ReviewDecision, SubmitVoucher, Voucher, VoucherFile, VoucherStatus,
    ALLOWED_VOUCHER_MIME_TYPES, MAX_VOUCHER_FILE_BYTES,
};
