//! API Handlers

pub mod accounts;
pub mod admins;
pub mod health;
pub mod metrics;
pub mod tokens;
