//! HTTP API module
//!
//! Request handlers, DTOs, the middleware chain and the router wiring
//! them together.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{create_api_router, ApiState};
