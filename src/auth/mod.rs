//! Authentication and Authorization module
//!
//! JWT issuance/verification, password hashing and the bearer-token
//! middleware enforcing authentication on every inbound call.

pub mod authorize;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use authorize::{require_level, resolve_admin_level};
pub use jwt::{AdminClaims, Claims, JwtConfig, ProfileClaims, TokenService};
pub use middleware::{auth_middleware, AuthState, AuthenticatedCaller};
pub use password::{hash_password, verify_password};
