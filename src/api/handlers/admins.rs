//! Admin API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;

use crate::api::dto::{
    AdminView, ApiResponse, AuthenticateAdminRequest, AuthenticateResponse, CreateAdminRequest,
    EmptyData, LoginAdminRequest, TokenResponse, ValidatedJson,
};
use crate::api::router::ApiState;
use crate::auth::{hash_password, require_level, resolve_admin_level, verify_password, AuthenticatedCaller};
use crate::domain::{AdminLevel, NewAdmin, ServiceError};
use crate::notifications::{dispatch, Notification};

/// Create an administrative account
///
/// The named super admin's level is resolved and checked before
/// anything touches the store; any level other than super admin aborts
/// with nothing written.
#[utoipa::path(
    post,
    path = "/api/v1/admins",
    tag = "Admins",
    request_body = CreateAdminRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<EmptyData>),
        (status = 400, description = "Missing or malformed credential field"),
        (status = 403, description = "Authorising admin is not a super admin"),
        (status = 404, description = "Authorising admin does not exist"),
        (status = 409, description = "An admin with this username already exists")
    )
)]
pub async fn create_admin(
    State(state): State<ApiState>,
    Extension(caller): Extension<AuthenticatedCaller>,
    ValidatedJson(request): ValidatedJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmptyData>>), ServiceError> {
    state.guard.check("CreateAdmin")?;
    request.check_credentials()?;

    let level = state
        .guard
        .run(
            "CheckAdminLevel (SELECT)",
            resolve_admin_level(&*state.admins, &request.super_admin_username),
        )
        .await?;
    require_level(level, AdminLevel::SuperAdmin, "CreateAdmin")?;

    info!(
        caller = %caller.subject,
        authorised_by = %request.super_admin_username,
        new_admin = %request.admin.username,
        "creating admin account"
    );

    let existing = state
        .guard
        .run(
            "CreateAdmin (SELECT)",
            state.admins.find_by_username(&request.admin.username),
        )
        .await?;
    if existing.is_some() {
        return Err(ServiceError::AccountExists);
    }

    let password_hash = hash_password(&request.password)?;
    let welcome = Notification::admin_created(
        &request.admin.first_name,
        &request.admin.last_name,
        &request.admin.email,
    );

    let admin = NewAdmin {
        first_name: request.admin.first_name,
        last_name: request.admin.last_name,
        email: request.admin.email,
        phone: request.admin.phone,
        username: request.admin.username,
        level: request.admin.level,
        trusted_devices: request.admin.trusted_devices,
        password_hash,
    };

    state
        .guard
        .run("CreateAdmin (INSERT)", state.admins.insert(admin))
        .await?;

    dispatch(state.notifier.clone(), welcome);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(EmptyData {}))))
}

/// Log in to an administrative account
#[utoipa::path(
    post,
    path = "/api/v1/admins/login",
    tag = "Admins",
    request_body = LoginAdminRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Admin does not exist")
    )
)]
pub async fn login_admin(
    State(state): State<ApiState>,
    Json(request): Json<LoginAdminRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ServiceError> {
    state.guard.check("LoginAdmin")?;
    request.check_credentials()?;

    let admin = state
        .guard
        .run(
            "LoginAdmin (SELECT)",
            state.admins.find_by_username(&request.username),
        )
        .await?
        .ok_or(ServiceError::AccountNotFound)?;

    if !verify_password(&request.password, &admin.password_hash)? {
        return Err(ServiceError::WrongPassword);
    }

    let token = state.tokens.issue_for_admin(&admin)?;
    Ok(Json(ApiResponse::success(TokenResponse::bearer(
        token,
        state.tokens.expires_in_secs(),
    ))))
}

/// Retrieve an admin by username
#[utoipa::path(
    get,
    path = "/api/v1/admins/{username}",
    tag = "Admins",
    params(("username" = String, Path, description = "Admin username")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin found", body = ApiResponse<AdminView>),
        (status = 404, description = "Admin does not exist")
    )
)]
pub async fn get_admin(
    State(state): State<ApiState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<AdminView>>, ServiceError> {
    state.guard.check("GetAdmin")?;
    if username.trim_matches(' ').is_empty() {
        return Err(ServiceError::MissingCredential("username"));
    }

    let admin = state
        .guard
        .run("GetAdmin (SELECT)", state.admins.find_by_username(&username))
        .await?
        .ok_or(ServiceError::AccountNotFound)?;

    Ok(Json(ApiResponse::success(AdminView::from_admin(&admin))))
}

/// Check that an admin exists and holds the requested level
///
/// A level mismatch is a normal `valid: false` outcome, not a fault;
/// only a missing admin raises an error.
#[utoipa::path(
    post,
    path = "/api/v1/admins/authenticate",
    tag = "Admins",
    request_body = AuthenticateAdminRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Credentials checked", body = ApiResponse<AuthenticateResponse>),
        (status = 404, description = "Admin does not exist")
    )
)]
pub async fn authenticate_admin(
    State(state): State<ApiState>,
    Json(request): Json<AuthenticateAdminRequest>,
) -> Result<Json<ApiResponse<AuthenticateResponse>>, ServiceError> {
    state.guard.check("AuthenticateAdmin")?;
    request.check_credentials()?;

    let admin = state
        .guard
        .run(
            "AuthenticateAdmin (SELECT)",
            state.admins.find_by_username(&request.username),
        )
        .await?
        .ok_or(ServiceError::AccountNotFound)?;

    Ok(Json(ApiResponse::success(AuthenticateResponse {
        valid: admin.level == request.level,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::AdminPayload;
    use crate::api::router::test_support::{state_with, test_caller, FakeAccounts, FakeAdmins, RecordingNotifier};
    use crate::domain::Admin;
    use chrono::Utc;

    fn stored_admin(username: &str, level: AdminLevel, password: &str) -> Admin {
        let now = Utc::now();
        Admin {
            id: format!("adm-{}", username),
            first_name: "Root".to_string(),
            last_name: "Admin".to_string(),
            email: format!("{}@x.com", username),
            phone: "100".to_string(),
            username: username.to_string(),
            level,
            trusted_devices: vec![],
            password_hash: hash_password(password).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_request(super_admin: &str) -> CreateAdminRequest {
        CreateAdminRequest {
            super_admin_username: super_admin.to_string(),
            admin: AdminPayload {
                first_name: "New".to_string(),
                last_name: "Admin".to_string(),
                email: "new@x.com".to_string(),
                phone: "0700".to_string(),
                username: "new-admin".to_string(),
                level: AdminLevel::Reader,
                trusted_devices: vec!["laptop".to_string()],
            },
            password: "p1p1p1p1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_admin_requires_super_admin_level() {
        for level in [AdminLevel::Reader, AdminLevel::LimitedWriter] {
            let admins = FakeAdmins::with(vec![stored_admin("boss", level, "pw-pw-pw")]);
            let state = state_with(FakeAccounts::empty(), admins.clone(), RecordingNotifier::new(false));

            let err = create_admin(
                State(state),
                Extension(test_caller()),
                ValidatedJson(create_request("boss")),
            )
            .await
            .unwrap_err();

            assert_eq!(err.kind(), "PERMISSION_DENIED");
            // nothing was written
            assert_eq!(admins.stored(), 1);
        }
    }

    #[tokio::test]
    async fn test_create_admin_succeeds_for_super_admin() {
        let admins = FakeAdmins::with(vec![stored_admin(
            "root",
            AdminLevel::SuperAdmin,
            "pw-pw-pw",
        )]);
        let notifier = RecordingNotifier::new(false);
        let state = state_with(FakeAccounts::empty(), admins.clone(), notifier.clone());

        let (status, _) = create_admin(
            State(state),
            Extension(test_caller()),
            ValidatedJson(create_request("root")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(admins.stored(), 2);
        notifier.assert_triggered(1).await;
    }

    #[tokio::test]
    async fn test_create_admin_unknown_authoriser_is_not_found() {
        let admins = FakeAdmins::empty();
        let state = state_with(FakeAccounts::empty(), admins.clone(), RecordingNotifier::new(false));

        let err = create_admin(
            State(state),
            Extension(test_caller()),
            ValidatedJson(create_request("ghost")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "ACCOUNT_NOT_FOUND");
        assert_eq!(admins.stored(), 0);
    }

    #[tokio::test]
    async fn test_login_admin_round_trips_identity() {
        let admins = FakeAdmins::with(vec![stored_admin(
            "root",
            AdminLevel::SuperAdmin,
            "pw-pw-pw",
        )]);
        let state = state_with(FakeAccounts::empty(), admins, RecordingNotifier::new(false));
        let tokens = state.tokens.clone();

        let response = login_admin(
            State(state),
            Json(LoginAdminRequest {
                username: "root".to_string(),
                password: "pw-pw-pw".to_string(),
            }),
        )
        .await
        .unwrap();

        let claims = tokens.verify(&response.0.data.unwrap().token).unwrap();
        let admin = claims.admin.unwrap();
        assert_eq!(admin.username, "root");
        assert_eq!(admin.level, AdminLevel::SuperAdmin);
    }

    #[tokio::test]
    async fn test_login_admin_wrong_password() {
        let admins = FakeAdmins::with(vec![stored_admin("root", AdminLevel::Reader, "pw-pw-pw")]);
        let state = state_with(FakeAccounts::empty(), admins, RecordingNotifier::new(false));

        let err = login_admin(
            State(state),
            Json(LoginAdminRequest {
                username: "root".to_string(),
                password: "nope-nope".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "WRONG_PASSWORD");
    }

    #[tokio::test]
    async fn test_authenticate_admin_level_mismatch_is_valid_false() {
        let admins = FakeAdmins::with(vec![stored_admin("root", AdminLevel::Reader, "pw-pw-pw")]);
        let state = state_with(FakeAccounts::empty(), admins, RecordingNotifier::new(false));

        let response = authenticate_admin(
            State(state),
            Json(AuthenticateAdminRequest {
                username: "root".to_string(),
                level: AdminLevel::SuperAdmin,
            }),
        )
        .await
        .unwrap();

        assert!(!response.0.data.unwrap().valid);
    }

    #[tokio::test]
    async fn test_authenticate_admin_level_match_is_valid_true() {
        let admins = FakeAdmins::with(vec![stored_admin("root", AdminLevel::Reader, "pw-pw-pw")]);
        let state = state_with(FakeAccounts::empty(), admins, RecordingNotifier::new(false));

        let response = authenticate_admin(
            State(state),
            Json(AuthenticateAdminRequest {
                username: "root".to_string(),
                level: AdminLevel::Reader,
            }),
        )
        .await
        .unwrap();

        assert!(response.0.data.unwrap().valid);
    }

    #[tokio::test]
    async fn test_get_admin_exposes_trusted_devices_but_no_hash() {
        let mut admin = stored_admin("root", AdminLevel::Reader, "pw-pw-pw");
        admin.trusted_devices = vec!["laptop".to_string()];
        let state = state_with(
            FakeAccounts::empty(),
            FakeAdmins::with(vec![admin]),
            RecordingNotifier::new(false),
        );

        let response = get_admin(State(state), Path("root".to_string()))
            .await
            .unwrap();
        let view = response.0.data.unwrap();
        assert_eq!(view.trusted_devices, vec!["laptop"]);

        let value = serde_json::to_value(&view).unwrap();
        assert!(value.get("password_hash").is_none());
    }
}
