//! Credential store
//!
//! The backing store is an external collaborator reached through this
//! query interface: per-role user tables keyed by email, plus a
//! lab_progress table keyed by (user_id, lab_id). Per-row upsert
//! atomicity is delegated to the store itself.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::auth::models::Role;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A user row from one of the per-role credential tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Role-specific id (student_id or instructor_id)
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Absent for accounts created through Google sign-in
    pub password_hash: Option<String>,
    /// Absent for password-only accounts
    pub google_id: Option<String>,
}

/// Fields for creating a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// A lab progress row, unique per (user_id, lab_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: i64,
    pub role: Role,
    pub lab_id: i32,
    pub score: i32,
}

/// Query interface over the external data store
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All user rows with this email in the role's table.
    ///
    /// Email is unique per role table, not globally, so the same address
    /// may exist as both a student and an instructor.
    async fn users_by_email(&self, role: Role, email: &str) -> Result<Vec<UserRecord>>;

    /// The user row tagged with this Google id in the role's table, if any
    async fn user_by_google_id(&self, role: Role, google_id: &str) -> Result<Option<UserRecord>>;

    /// Insert a user row into the role's table, returning it with its id
    async fn insert_user(&self, role: Role, user: NewUser) -> Result<UserRecord>;

    /// Insert-or-update a progress row, resolving conflicts on
    /// (user_id, lab_id) by replacing the score
    async fn upsert_progress(&self, record: ProgressRecord) -> Result<()>;

    /// The progress row for one user and lab, if any
    async fn progress_for_lab(
        &self,
        user_id: i64,
        role: Role,
        lab_id: i32,
    ) -> Result<Option<ProgressRecord>>;
}

/// Store handle shared across request handlers
pub type SharedStore = Arc<dyn CredentialStore>;
