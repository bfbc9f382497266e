//! Business services for the collections engine.

pub mod billing;
pub mod calendar;
pub mod cashbox;
pub mod clients;
pub mod payments;
pub mod store;
pub mod vouchers;
