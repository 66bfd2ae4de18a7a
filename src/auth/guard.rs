//! Access guard
//!
//! Request-time gate over the session cookie. Verification is purely
//! cryptographic and temporal; the guard never touches the credential
//! store, so it keeps admitting or rejecting requests even when the
//! store is degraded.

use crate::api::server::AppState;
use crate::auth::models::Role;
use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a request was turned away at the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// No session cookie on the request
    MissingToken,
    /// Cookie present but the token failed verification
    NotAuthorized,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        let message = match self {
            GuardRejection::MissingToken => "Token not found",
            GuardRejection::NotAuthorized => "Not Authorized",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Session token pulled from the request's cookie header, if any
fn session_token(parts: &Parts, state: &AppState) -> Option<String> {
    parts
        .headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| state.sessions.cookies().token_from_header(header))
}

/// Identity resolved from a verified session token.
///
/// Handlers taking this extractor only run for requests carrying a valid,
/// unexpired token; everything else is rejected with a 401 before the
/// handler body is reached.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, state).ok_or(GuardRejection::MissingToken)?;
        let claims = state
            .sessions
            .codec()
            .verify(&token)
            .map_err(|_| GuardRejection::NotAuthorized)?;
        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Non-failing variant for endpoints that report rather than gate.
///
/// Absent and invalid tokens both resolve to `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = session_token(parts, state)
            .and_then(|token| state.sessions.codec().verify(&token).ok())
            .map(|claims| AuthUser {
                id: claims.sub,
                role: claims.role,
            });
        Ok(MaybeAuthUser(user))
    }
}
