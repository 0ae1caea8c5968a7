//! Data access layer — free functions over the PostgreSQL pool.
//!
//! Multi-step writes (checkout, finalization) open their own transaction and
//! commit before returning.

pub mod analytics;
pub mod companies;
pub mod coupons;
pub mod events;
pub mod inquiries;
pub mod inventory;
pub mod invoices;
pub mod orders;
pub mod plans;
