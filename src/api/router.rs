//! API router and middleware chain composition

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto;
use crate::api::handlers::{accounts, admins, health, metrics, tokens};
use crate::api::middleware::{http_metrics_middleware, recovery_middleware};
use crate::auth::{auth_middleware, AuthState, TokenService};
use crate::domain::{AccountRepository, AdminRepository};
use crate::notifications::Notifier;
use crate::support::RequestGuard;

/// Shared state for all account/admin handlers
#[derive(Clone)]
pub struct ApiState {
    pub accounts: Arc<dyn AccountRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub tokens: TokenService,
    pub notifier: Arc<dyn Notifier>,
    pub guard: RequestGuard,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        tokens::default_token,
        accounts::create_account,
        accounts::login,
        accounts::get_account,
        accounts::authenticate_account,
        accounts::list_accounts,
        admins::create_admin,
        admins::login_admin,
        admins::get_admin,
        admins::authenticate_admin,
    ),
    components(
        schemas(
            dto::ApiResponse<String>,
            dto::EmptyData,
            dto::TokenResponse,
            dto::AuthenticateResponse,
            dto::CreateAccountRequest,
            dto::LoginRequest,
            dto::FederatedProvider,
            dto::ContactQuery,
            dto::ProfileView,
            dto::CreateAdminRequest,
            dto::AdminPayload,
            dto::LoginAdminRequest,
            dto::AuthenticateAdminRequest,
            dto::AdminView,
            health::HealthResponse,
            crate::domain::Gender,
            crate::domain::AdminLevel,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness probe; no authentication."),
        (name = "Tokens", description = "Unauthenticated probe issuing a throwaway bearer token for bootstrap calls."),
        (name = "Accounts", description = "User account registration, login, retrieval, credential checks and the NDJSON profile stream. Authenticated via `Authorization: Bearer <token>` except for login."),
        (name = "Admins", description = "Administrative accounts with levels `reader`, `limited_writer`, `super_admin`. Creating admins requires a super admin authoriser."),
    ),
    info(
        title = "Account Service API",
        version = "1.0.0",
        description = "Account/identity microservice: registration, login and \
credential authentication for user and administrative accounts, with JWT \
bearer authentication enforced by the middleware chain on every call.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
///
/// The middleware chain is composed once here and its order is part of
/// the contract: logging/metrics run outermost, then panic recovery.
/// Authentication wraps only the RPC surface; its exempt paths come
/// from configuration.
pub fn create_api_router(
    state: ApiState,
    auth_state: AuthState,
    prometheus_handle: PrometheusHandle,
) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // RPC surface. Routes keep their full paths (no nesting) so the
    // authentication middleware sees the same path the exempt list names.
    let rpc_routes = Router::new()
        .route("/api/v1/accounts", post(accounts::create_account))
        .route("/api/v1/accounts/login", post(accounts::login))
        .route("/api/v1/accounts/profile", get(accounts::get_account))
        .route(
            "/api/v1/accounts/authenticate",
            post(accounts::authenticate_account),
        )
        .route("/api/v1/accounts/stream", get(accounts::list_accounts))
        .route("/api/v1/admins", post(admins::create_admin))
        .route("/api/v1/admins/login", post(admins::login_admin))
        .route(
            "/api/v1/admins/authenticate",
            post(admins::authenticate_admin),
        )
        .route("/api/v1/admins/{username}", get(admins::get_admin))
        .route("/api/v1/token", get(tokens::default_token))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new());

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(prometheus_handle);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(rpc_routes)
        // Outer interceptors, applied top-down: logging, metrics, recovery
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(http_metrics_middleware))
                .layer(middleware::from_fn(recovery_middleware)),
        )
        .layer(cors)
}
