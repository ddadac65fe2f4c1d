//! Bearer-token authentication middleware for Axum
//!
//! Applied to the whole RPC surface; routes on the configured exempt
//! list (initial logins, the default-token probe) pass through
//! untouched. Everything else must present `Authorization: Bearer
//! <token>`, and the verified identity is injected into request
//! extensions for handlers to take as an explicit `Extension` parameter.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::jwt::{AdminClaims, Claims, ProfileClaims, TokenService};
use crate::domain::ServiceError;

/// Authentication state shared by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
    /// Full request paths exempt from authentication; configured, not
    /// hardcoded per deployment.
    pub public_paths: Arc<HashSet<String>>,
}

impl AuthState {
    pub fn new(tokens: TokenService, public_paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens,
            public_paths: Arc::new(public_paths.into_iter().collect()),
        }
    }
}

/// Verified caller identity resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedCaller {
    pub subject: String,
    pub profile: Option<ProfileClaims>,
    pub admin: Option<AdminClaims>,
}

impl AuthenticatedCaller {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            profile: claims.profile,
            admin: claims.admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}

/// Extract token from Authorization header
fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Whether `path` is on the exempt list
pub fn is_public_path(public_paths: &HashSet<String>, path: &str) -> bool {
    public_paths.contains(path)
}

/// Authentication middleware - requires a valid bearer token unless the
/// request path is exempt
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(&state.public_paths, request.uri().path()) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let Some(auth_header) = auth_header else {
        return ServiceError::InvalidToken.into_response();
    };

    let Some(token) = extract_bearer(auth_header) else {
        return ServiceError::InvalidToken.into_response();
    };

    match state.tokens.verify(token) {
        Ok(claims) => {
            let caller = AuthenticatedCaller::from_claims(claims);
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
