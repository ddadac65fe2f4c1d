//! Default-token probe handler

use axum::{extract::State, Json};

use crate::api::dto::{ApiResponse, TokenResponse};
use crate::api::router::ApiState;
use crate::domain::ServiceError;

/// Issue a throwaway token
///
/// Unauthenticated probe. The token carries no identity snapshot; it
/// only lets a fresh client pass the authentication interceptor for
/// bootstrap calls such as registration.
#[utoipa::path(
    get,
    path = "/api/v1/token",
    tag = "Tokens",
    responses(
        (status = 200, description = "Throwaway token issued", body = ApiResponse<TokenResponse>)
    )
)]
pub async fn default_token(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<TokenResponse>>, ServiceError> {
    state.guard.check("DefaultToken")?;

    let token = state.tokens.issue_throwaway()?;
    Ok(Json(ApiResponse::success(TokenResponse::bearer(
        token,
        state.tokens.expires_in_secs(),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::test_support::{state_with, FakeAccounts, FakeAdmins, RecordingNotifier};

    #[tokio::test]
    async fn test_throwaway_token_verifies_with_no_identity() {
        let state = state_with(
            FakeAccounts::empty(),
            FakeAdmins::empty(),
            RecordingNotifier::new(false),
        );
        let tokens = state.tokens.clone();

        let response = default_token(State(state)).await.unwrap();
        let claims = tokens.verify(&response.0.data.unwrap().token).unwrap();

        assert!(claims.profile.is_none());
        assert!(claims.admin.is_none());
        assert!(!claims.is_admin());
    }
}
