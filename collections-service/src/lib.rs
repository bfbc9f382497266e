//! Recurring billing, field collection, and payment reconciliation.
//!
//! The engine generates monthly debts per client, drives each payment
//! through the collected -> validated -> paid workflow, reconciles
//! client-submitted vouchers, and governs collector cash-box requests.
//! Transport, token auth, and UI live upstream; this service consumes an
//! identity assertion and a ledger store.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::Application;
