//! # Account Service
//!
//! Account/identity microservice: registration, login, profile
//! retrieval and credential authentication for user and administrative
//! accounts, backed by a relational store, with best-effort
//! notifications dispatched to an external messaging service.
//!
//! ## Architecture
//!
//! - **domain**: Core entities, repository traits and the error taxonomy
//! - **auth**: Password hashing, JWT issuance/verification, admin-level
//!   authorization and the bearer-token middleware
//! - **api**: HTTP handlers, DTOs with per-operation credential
//!   validation, and the router composing the middleware chain
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **notifications**: Fire-and-forget trigger client for the external
//!   notification service
//! - **support**: Graceful shutdown and request deadline/cancellation
//! - **config**: TOML + env configuration bundle

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::{create_api_router, ApiState};
