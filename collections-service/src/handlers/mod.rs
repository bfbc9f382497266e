//! HTTP handlers: a thin layer translating requests into core operations.

pub mod billing;
pub mod cashbox;
pub mod clients;
pub mod payments;
pub mod vouchers;
