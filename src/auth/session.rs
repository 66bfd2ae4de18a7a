//! Session management
//!
//! The session flows are stateless: every outcome is carried in the
//! signed token itself, so no process-wide session table exists. The
//! client-supplied role only routes which credential table is consulted;
//! the role embedded in an issued token is always the role of the table
//! the record actually matched in.

use crate::auth::cookie::CookieOptions;
use crate::auth::models::{Identity, Role, SessionStatus};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::token::TokenCodec;
use crate::error::{Error, Result};
use crate::oauth::GoogleProfile;
use crate::store::{CredentialStore, NewUser, SharedStore};

/// A session established by one of the login flows
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub identity: Identity,
    pub token: String,
}

/// What a signup request resolved to
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// A new credential record was created
    Created(EstablishedSession),
    /// The email and password matched an existing record (implicit login)
    LoggedIn(EstablishedSession),
}

/// Orchestrates login, signup, OAuth login and status flows
#[derive(Clone)]
pub struct SessionService {
    store: SharedStore,
    codec: TokenCodec,
    cookies: CookieOptions,
}

impl SessionService {
    pub fn new(store: SharedStore, codec: TokenCodec, cookies: CookieOptions) -> Self {
        Self {
            store,
            codec,
            cookies,
        }
    }

    pub fn cookies(&self) -> &CookieOptions {
        &self.cookies
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn establish(&self, identity: Identity) -> Result<EstablishedSession> {
        let token = self.codec.issue(&identity)?;
        Ok(EstablishedSession { identity, token })
    }

    /// Password login.
    ///
    /// Unknown email, store failure, OAuth-only account and wrong password
    /// all collapse into `InvalidCredentials` so callers cannot enumerate
    /// which part was wrong.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<EstablishedSession> {
        let records = self
            .store
            .users_by_email(role, email)
            .await
            .map_err(|e| {
                tracing::warn!("Credential lookup failed during login: {}", e);
                Error::InvalidCredentials
            })?;
        let user = records.into_iter().next().ok_or(Error::InvalidCredentials)?;

        let hash = user.password_hash.ok_or(Error::InvalidCredentials)?;
        if !verify_password_blocking(password.to_string(), hash).await {
            return Err(Error::InvalidCredentials);
        }

        self.establish(Identity {
            id: user.id,
            email: user.email,
            role,
        })
    }

    /// Signup.
    ///
    /// If the email already exists in the role's table and the supplied
    /// password matches one of the records, the request is treated as an
    /// implicit login rather than a duplicate. Existing records with no
    /// matching password reject with `DuplicateAccount` and create nothing.
    pub async fn sign_up(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<SignupOutcome> {
        let existing = self.store.users_by_email(role, email).await?;

        if !existing.is_empty() {
            for record in existing {
                let Some(hash) = record.password_hash else {
                    continue;
                };
                if verify_password_blocking(password.to_string(), hash).await {
                    let session = self.establish(Identity {
                        id: record.id,
                        email: record.email,
                        role,
                    })?;
                    return Ok(SignupOutcome::LoggedIn(session));
                }
            }
            return Err(Error::DuplicateAccount);
        }

        let password_hash = hash_password_blocking(password.to_string()).await?;
        let user = self
            .store
            .insert_user(
                role,
                NewUser {
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    email: email.to_string(),
                    password_hash: Some(password_hash),
                    google_id: None,
                },
            )
            .await?;

        let session = self.establish(Identity {
            id: user.id,
            email: user.email,
            role,
        })?;
        Ok(SignupOutcome::Created(session))
    }

    /// Google sign-in, creating a password-less record on first contact
    pub async fn google_login(
        &self,
        profile: &GoogleProfile,
        role: Role,
    ) -> Result<EstablishedSession> {
        let user = match self.store.user_by_google_id(role, &profile.google_id).await? {
            Some(user) => user,
            None => {
                self.store
                    .insert_user(
                        role,
                        NewUser {
                            first_name: profile.first_name.clone(),
                            last_name: profile.last_name.clone(),
                            email: profile.email.clone(),
                            password_hash: None,
                            google_id: Some(profile.google_id.clone()),
                        },
                    )
                    .await?
            }
        };

        self.establish(Identity {
            id: user.id,
            email: user.email,
            role,
        })
    }

    /// Report the session state of a request's cookie.
    ///
    /// A query, never an error: absent and invalid tokens both read as
    /// not logged in.
    pub fn status(&self, token: Option<&str>) -> SessionStatus {
        match token.and_then(|t| self.codec.verify(t).ok()) {
            Some(claims) => SessionStatus::logged_in(claims.sub, claims.role),
            None => SessionStatus::anonymous(),
        }
    }
}
