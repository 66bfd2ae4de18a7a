//! Google OAuth2 authorization-code flow
//!
//! The consent redirect carries a signed state payload with the role the
//! client asked to sign in as; the callback exchanges the code for an
//! access token and resolves the Google profile used to look up or
//! create the account.

use crate::config::GoogleConfig;
use crate::error::{Error, Result};
use reqwest::Url;
use serde::Deserialize;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// The profile fields consumed from Google's userinfo response
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub google_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: String,
    given_name: Option<String>,
    family_name: Option<String>,
}

/// Client for the Google consent and token endpoints
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig, backend_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: format!("{}/auth/google/callback", backend_url.trim_end_matches('/')),
        }
    }

    /// Consent page URL carrying the signed state
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            AUTH_ENDPOINT,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("prompt", "select_account"),
                ("state", state),
            ],
        )
        .map_err(|e| Error::OAuth(e.to_string()))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for the account's profile
    pub async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::OAuth(format!("code exchange failed: {}", e)))?
            .json()
            .await?;

        let info: UserInfo = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::OAuth(format!("userinfo fetch failed: {}", e)))?
            .json()
            .await?;

        Ok(GoogleProfile {
            google_id: info.sub,
            email: info.email,
            first_name: info.given_name.unwrap_or_else(|| "John".to_string()),
            last_name: info.family_name.unwrap_or_else(|| "Doe".to_string()),
        })
    }
}
