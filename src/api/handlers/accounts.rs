//! Account API handlers
//!
//! Every handler walks the same pipeline: cancellation check →
//! credential validation → store lookup → hasher/issuer → response,
//! failing out at the first step that rejects.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::collections::VecDeque;

use crate::api::dto::{
    ApiResponse, AuthenticateResponse, ContactQuery, CreateAccountRequest, EmptyData,
    LoginRequest, ProfileView, TokenResponse, ValidatedJson,
};
use crate::api::router::ApiState;
use crate::auth::{hash_password, verify_password};
use crate::domain::{Account, NewAccount, ServiceError, ServiceResult};
use crate::notifications::{dispatch, Notification};

/// Register a new account
///
/// Requires email or phone plus both names. Fires a welcome
/// notification on success; notification delivery is best-effort and
/// never fails the registration.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "Accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<EmptyData>),
        (status = 400, description = "Missing or malformed credential field"),
        (status = 409, description = "An account with this email or phone already exists")
    )
)]
pub async fn create_account(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmptyData>>), ServiceError> {
    state.guard.check("CreateAccount")?;
    request.check_credentials()?;

    let existing = state
        .guard
        .run(
            "CreateAccount (SELECT)",
            state
                .accounts
                .find_by_contact(request.email.as_deref(), request.phone.as_deref()),
        )
        .await?;
    if existing.is_some() {
        return Err(ServiceError::AccountExists);
    }

    // Federated registrations carry no password; an empty hash makes
    // password login impossible for them.
    let password_hash = match request.password.as_deref() {
        Some(p) if !p.trim_matches(' ').is_empty() => hash_password(p)?,
        _ => String::new(),
    };

    let welcome = Notification::account_created(
        &request.first_name,
        &request.last_name,
        request.email.as_deref(),
    );

    let account = NewAccount {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
        birth_date: request.birth_date,
        gender: request.gender,
        security_question: request.security_question,
        security_answer: request.security_answer,
        password_hash,
    };

    state
        .guard
        .run("CreateAccount (INSERT)", state.accounts.insert(account))
        .await?;

    dispatch(state.notifier.clone(), welcome);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(EmptyData {}))))
}

/// Log in to an account
///
/// Accepts a tagged credential: `phone` logins verify the password,
/// `federated` logins trust the named provider and only need a known
/// email or phone. Returns a bearer token embedding a profile snapshot.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Wrong password"),
        (status = 403, description = "Account is blocked"),
        (status = 404, description = "Account does not exist")
    )
)]
pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ServiceError> {
    state.guard.check("Login")?;
    request.check_credentials()?;

    let (email, phone) = request.contact();
    let account = state
        .guard
        .run("Login (SELECT)", state.accounts.find_by_contact(email, phone))
        .await?
        .ok_or(ServiceError::AccountNotFound)?;

    if !account.is_active {
        return Err(ServiceError::AccountBlocked);
    }

    if let LoginRequest::Phone { password, .. } = &request {
        if account.password_hash.is_empty() || !verify_password(password, &account.password_hash)? {
            return Err(ServiceError::WrongPassword);
        }
    }

    let token = state.tokens.issue_for_profile(&account)?;
    Ok(Json(ApiResponse::success(TokenResponse::bearer(
        token,
        state.tokens.expires_in_secs(),
    ))))
}

/// Retrieve a profile by email or phone
#[utoipa::path(
    get,
    path = "/api/v1/accounts/profile",
    tag = "Accounts",
    params(ContactQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile found", body = ApiResponse<ProfileView>),
        (status = 403, description = "Account is blocked"),
        (status = 404, description = "Account does not exist")
    )
)]
pub async fn get_account(
    State(state): State<ApiState>,
    Query(query): Query<ContactQuery>,
) -> Result<Json<ApiResponse<ProfileView>>, ServiceError> {
    state.guard.check("GetProfile")?;
    query.check_credentials()?;

    let account = state
        .guard
        .run(
            "GetProfile (SELECT)",
            state
                .accounts
                .find_by_contact(query.email.as_deref(), query.phone.as_deref()),
        )
        .await?
        .ok_or(ServiceError::AccountNotFound)?;

    if !account.is_active {
        return Err(ServiceError::AccountBlocked);
    }

    Ok(Json(ApiResponse::success(ProfileView::from_account(
        &account,
    ))))
}

/// Check that an account exists for the given contact
#[utoipa::path(
    post,
    path = "/api/v1/accounts/authenticate",
    tag = "Accounts",
    request_body = ContactQuery,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Credentials checked", body = ApiResponse<AuthenticateResponse>),
        (status = 404, description = "Account does not exist")
    )
)]
pub async fn authenticate_account(
    State(state): State<ApiState>,
    Json(request): Json<ContactQuery>,
) -> Result<Json<ApiResponse<AuthenticateResponse>>, ServiceError> {
    state.guard.check("AuthenticateAccount")?;
    request.check_credentials()?;

    state
        .guard
        .run(
            "AuthenticateAccount (SELECT)",
            state
                .accounts
                .find_by_contact(request.email.as_deref(), request.phone.as_deref()),
        )
        .await?
        .ok_or(ServiceError::AccountNotFound)?;

    Ok(Json(ApiResponse::success(AuthenticateResponse {
        valid: true,
    })))
}

/// Accounts fetched per page while streaming
const STREAM_PAGE_SIZE: u64 = 64;

struct StreamPage {
    buffered: VecDeque<Account>,
    after_id: Option<String>,
    exhausted: bool,
}

fn encode_profile_line(account: &Account) -> ServiceResult<Vec<u8>> {
    let mut line = serde_json::to_vec(&ProfileView::from_account(account)).map_err(|e| {
        ServiceError::Serialization {
            what: "Profile",
            source: e,
        }
    })?;
    line.push(b'\n');
    Ok(line)
}

/// Stream every profile as newline-delimited JSON
///
/// Lazy and finite: rows are fetched in keyset pages as the stream
/// drains. The first page failing produces an error response; any later
/// page-fetch or encode failure aborts the stream at that point.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/stream",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "NDJSON stream of profiles", content_type = "application/x-ndjson")
    )
)]
pub async fn list_accounts(State(state): State<ApiState>) -> Result<Response, ServiceError> {
    state.guard.check("ListAccounts")?;

    let first = state
        .guard
        .run(
            "ListAccounts (SELECT)",
            state.accounts.page_after(None, STREAM_PAGE_SIZE),
        )
        .await?;

    let page = StreamPage {
        exhausted: (first.len() as u64) < STREAM_PAGE_SIZE,
        after_id: first.last().map(|a| a.id.clone()),
        buffered: first.into(),
    };

    let repo = state.accounts.clone();
    let guard = state.guard.clone();

    let stream = futures_util::stream::try_unfold(page, move |mut page| {
        let repo = repo.clone();
        let guard = guard.clone();
        async move {
            loop {
                if let Some(account) = page.buffered.pop_front() {
                    let line = encode_profile_line(&account)?;
                    return Ok::<Option<(Vec<u8>, StreamPage)>, ServiceError>(Some((line, page)));
                }
                if page.exhausted {
                    return Ok(None);
                }

                let next = guard
                    .run(
                        "ListAccounts (SELECT)",
                        repo.page_after(page.after_id.as_deref(), STREAM_PAGE_SIZE),
                    )
                    .await?;
                page.exhausted = (next.len() as u64) < STREAM_PAGE_SIZE;
                if let Some(last) = next.last() {
                    page.after_id = Some(last.id.clone());
                }
                page.buffered = next.into();
            }
        }
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(stream))
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::test_support::{state_with, FakeAccounts, FakeAdmins, RecordingNotifier};
    use crate::domain::Gender;
    use chrono::Utc;

    fn stored_account(password: Option<&str>) -> Account {
        let now = Utc::now();
        Account {
            id: "acct-1".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: Some("a@x.com".to_string()),
            phone: Some("0700".to_string()),
            birth_date: None,
            gender: Gender::Unspecified,
            is_active: true,
            security_question: None,
            security_answer: None,
            password_hash: password.map(|p| hash_password(p).unwrap()).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_request() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: Some("a@x.com".to_string()),
            phone: None,
            birth_date: None,
            gender: Gender::Unspecified,
            security_question: None,
            security_answer: None,
            password: Some("p1p1p1p1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_account_inserts_and_notifies_once() {
        let accounts = FakeAccounts::empty();
        let notifier = RecordingNotifier::new(false);
        let state = state_with(accounts.clone(), FakeAdmins::empty(), notifier.clone());

        let (status, _) = create_account(State(state), ValidatedJson(create_request()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(accounts.stored(), 1);
        notifier.assert_triggered(1).await;
    }

    #[tokio::test]
    async fn test_duplicate_account_is_conflict_without_second_notification() {
        let accounts = FakeAccounts::with(vec![stored_account(Some("p1p1p1p1"))]);
        let notifier = RecordingNotifier::new(false);
        let state = state_with(accounts.clone(), FakeAdmins::empty(), notifier.clone());

        let err = create_account(State(state), ValidatedJson(create_request()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "ACCOUNT_EXISTS");
        assert_eq!(accounts.stored(), 1);
        notifier.assert_triggered(0).await;
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_create() {
        let accounts = FakeAccounts::empty();
        let notifier = RecordingNotifier::new(true);
        let state = state_with(accounts.clone(), FakeAdmins::empty(), notifier.clone());

        let (status, _) = create_account(State(state), ValidatedJson(create_request()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(accounts.stored(), 1);
        notifier.assert_triggered(1).await;
    }

    #[tokio::test]
    async fn test_login_wrong_password_issues_no_token() {
        let accounts = FakeAccounts::with(vec![stored_account(Some("right-password"))]);
        let state = state_with(accounts, FakeAdmins::empty(), RecordingNotifier::new(false));

        let err = login(
            State(state),
            Json(LoginRequest::Phone {
                phone: "0700".to_string(),
                password: "wrong-password".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "WRONG_PASSWORD");
    }

    #[tokio::test]
    async fn test_login_correct_password_token_decodes_to_identity() {
        let accounts = FakeAccounts::with(vec![stored_account(Some("right-password"))]);
        let state = state_with(accounts, FakeAdmins::empty(), RecordingNotifier::new(false));
        let tokens = state.tokens.clone();

        let response = login(
            State(state),
            Json(LoginRequest::Phone {
                phone: "0700".to_string(),
                password: "right-password".to_string(),
            }),
        )
        .await
        .unwrap();

        let body = response.0.data.unwrap();
        assert_eq!(body.token_type, "Bearer");
        let claims = tokens.verify(&body.token).unwrap();
        let profile = claims.profile.unwrap();
        assert_eq!(profile.first_name, "A");
        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_login_blocked_account_rejected() {
        let mut account = stored_account(Some("right-password"));
        account.is_active = false;
        let state = state_with(
            FakeAccounts::with(vec![account]),
            FakeAdmins::empty(),
            RecordingNotifier::new(false),
        );

        let err = login(
            State(state),
            Json(LoginRequest::Phone {
                phone: "0700".to_string(),
                password: "right-password".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "ACCOUNT_BLOCKED");
    }

    #[tokio::test]
    async fn test_federated_login_skips_password_check() {
        let accounts = FakeAccounts::with(vec![stored_account(None)]);
        let state = state_with(accounts, FakeAdmins::empty(), RecordingNotifier::new(false));

        let response = login(
            State(state),
            Json(LoginRequest::Federated {
                provider: crate::api::dto::FederatedProvider::Google,
                email: Some("a@x.com".to_string()),
                phone: None,
            }),
        )
        .await
        .unwrap();
        assert!(response.0.success);
    }

    #[tokio::test]
    async fn test_get_blocked_account_yields_account_blocked() {
        let mut account = stored_account(None);
        account.is_active = false;
        let state = state_with(
            FakeAccounts::with(vec![account]),
            FakeAdmins::empty(),
            RecordingNotifier::new(false),
        );

        let err = get_account(
            State(state),
            Query(ContactQuery {
                email: Some("a@x.com".to_string()),
                phone: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "ACCOUNT_BLOCKED");
    }

    #[tokio::test]
    async fn test_authenticate_unknown_account_is_not_found() {
        let state = state_with(
            FakeAccounts::empty(),
            FakeAdmins::empty(),
            RecordingNotifier::new(false),
        );

        let err = authenticate_account(
            State(state),
            Json(ContactQuery {
                email: Some("ghost@x.com".to_string()),
                phone: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "ACCOUNT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_stream_yields_one_line_per_account() {
        let mut a = stored_account(None);
        let mut b = stored_account(None);
        a.id = "a".to_string();
        b.id = "b".to_string();
        b.email = Some("b@x.com".to_string());
        b.phone = Some("0701".to_string());
        let state = state_with(
            FakeAccounts::with(vec![a, b]),
            FakeAdmins::empty(),
            RecordingNotifier::new(false),
        );

        let response = list_accounts(State(state)).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["first_name"], "A");
        assert!(first.get("password_hash").is_none());
    }
}
