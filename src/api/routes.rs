//! API route handlers

use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::server::AppState;
use crate::auth::guard::AuthUser;
use crate::auth::models::{LoginRequest, SignupRequest};
use crate::auth::{MaybeAuthUser, SessionStatus, SignupOutcome};
use crate::error::Error;
use crate::store::{CredentialStore, ProgressRecord};

// Health check

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

// Session flows

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    match state.sessions.login(&req.email, &req.password, req.role).await {
        Ok(session) => (
            StatusCode::OK,
            [(SET_COOKIE, state.sessions.cookies().session_cookie(&session.token))],
            Json(json!({
                "message": "Login Successful",
                "user": { "email": session.identity.email },
            })),
        )
            .into_response(),
        Err(Error::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Email or Password is incorrect" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    match state
        .sessions
        .sign_up(&req.first_name, &req.last_name, &req.email, &req.password, req.role)
        .await
    {
        Ok(outcome) => {
            let (message, session) = match &outcome {
                SignupOutcome::Created(session) => ("Signup Successful", session),
                SignupOutcome::LoggedIn(session) => ("Logging In", session),
            };
            (
                StatusCode::OK,
                [(SET_COOKIE, state.sessions.cookies().session_cookie(&session.token))],
                Json(json!({
                    "message": message,
                    "user": {
                        "email": session.identity.email,
                        "role": session.identity.role,
                    },
                })),
            )
                .into_response()
        }
        Err(Error::DuplicateAccount) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Email already exists" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Signup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, state.sessions.cookies().clearing_cookie())],
        Json(json!({ "message": "Logout Successful" })),
    )
}

pub async fn auth_check(MaybeAuthUser(user): MaybeAuthUser) -> impl IntoResponse {
    let status = match user {
        Some(user) => SessionStatus::logged_in(user.id, user.role),
        None => SessionStatus::anonymous(),
    };
    Json(status)
}

// Google OAuth flow

#[derive(Debug, Deserialize)]
pub struct GoogleAuthQuery {
    pub role: crate::auth::Role,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn google_auth(
    State(state): State<AppState>,
    Query(query): Query<GoogleAuthQuery>,
) -> impl IntoResponse {
    let failed = format!("{}/login?error=authentication_failed", state.frontend_url);

    let Some(google) = state.google.as_ref() else {
        tracing::warn!("Google sign-in requested but not configured");
        return Redirect::to(&failed).into_response();
    };

    let consent_url = state
        .sessions
        .codec()
        .sign_state(query.role)
        .and_then(|signed| google.authorize_url(&signed));
    match consent_url {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            tracing::error!("Failed to build consent redirect: {}", e);
            Redirect::to(&failed).into_response()
        }
    }
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> impl IntoResponse {
    let failed = format!("{}/login?error=authentication_failed", state.frontend_url);
    let no_token = format!("{}/login?error=no_token", state.frontend_url);

    if let Some(error) = query.error {
        tracing::warn!("Google consent denied: {}", error);
        return Redirect::to(&failed).into_response();
    }
    let (Some(google), Some(code), Some(signed_state)) =
        (state.google.as_ref(), query.code, query.state)
    else {
        return Redirect::to(&failed).into_response();
    };

    let Ok(role) = state.sessions.codec().verify_state(&signed_state) else {
        tracing::warn!("Rejected OAuth callback with bad state");
        return Redirect::to(&failed).into_response();
    };

    let profile = match google.fetch_profile(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Google profile exchange failed: {}", e);
            return Redirect::to(&failed).into_response();
        }
    };

    match state.sessions.google_login(&profile, role).await {
        Ok(session) => (
            [(SET_COOKIE, state.sessions.cookies().session_cookie(&session.token))],
            Redirect::to(&state.frontend_url),
        )
            .into_response(),
        Err(Error::TokenSigning(e)) => {
            tracing::error!("No session token produced: {}", e);
            Redirect::to(&no_token).into_response()
        }
        Err(e) => {
            tracing::error!("Google login failed: {}", e);
            Redirect::to(&failed).into_response()
        }
    }
}

// Lab progress (guarded)

/// Progress submission; lab_id and score arrive as numbers or numeric
/// strings depending on the frontend form
#[derive(Debug, Deserialize)]
pub struct ProgressSubmission {
    #[serde(deserialize_with = "lenient_i32")]
    pub lab_id: i32,
    #[serde(deserialize_with = "lenient_i32")]
    pub score: i32,
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => i32::try_from(n).map_err(serde::de::Error::custom),
        IntOrString::Str(s) => s.trim().parse::<i32>().map_err(serde::de::Error::custom),
    }
}

pub async fn save_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ProgressSubmission>,
) -> impl IntoResponse {
    let record = ProgressRecord {
        user_id: user.id,
        role: user.role,
        lab_id: req.lab_id,
        score: req.score,
    };

    match state.store.upsert_progress(record).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Progress saved successfully" })),
        ),
        Err(e) => {
            tracing::error!("Error saving progress: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error saving progress" })),
            )
        }
    }
}

pub async fn get_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(lab_id): Path<i32>,
) -> impl IntoResponse {
    match state.store.progress_for_lab(user.id, user.role, lab_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({
                "lab_id": lab_id,
                "score": record.map(|r| r.score),
            })),
        ),
        Err(e) => {
            tracing::error!("Error fetching progress: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Error fetching progress" })),
            )
        }
    }
}
