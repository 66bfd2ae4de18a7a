//! In-memory credential store used by tests

use crate::auth::models::Role;
use crate::error::{Error, Result};
use crate::store::{CredentialStore, NewUser, ProgressRecord, UserRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<UserRecord>,
}

/// Credential store over in-process maps, one table per role
#[derive(Default)]
pub struct MemoryStore {
    students: RwLock<Table>,
    instructors: RwLock<Table>,
    progress: RwLock<HashMap<(i64, i32), ProgressRecord>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, for store-outage tests
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Other("store unavailable".to_string()));
        }
        Ok(())
    }

    fn table(&self, role: Role) -> &RwLock<Table> {
        match role {
            Role::Student => &self.students,
            Role::Instructor => &self.instructors,
        }
    }

    /// Seed a user row directly, returning its assigned id
    pub async fn seed_user(&self, role: Role, user: NewUser) -> i64 {
        let mut table = self.table(role).write().await;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(UserRecord {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            google_id: user.google_id,
        });
        id
    }

    /// Number of rows in a role's table
    pub async fn user_count(&self, role: Role) -> usize {
        self.table(role).read().await.rows.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn users_by_email(&self, role: Role, email: &str) -> Result<Vec<UserRecord>> {
        self.check_available()?;
        let table = self.table(role).read().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| row.email == email)
            .cloned()
            .collect())
    }

    async fn user_by_google_id(&self, role: Role, google_id: &str) -> Result<Option<UserRecord>> {
        self.check_available()?;
        let table = self.table(role).read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| row.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn insert_user(&self, role: Role, user: NewUser) -> Result<UserRecord> {
        self.check_available()?;
        let mut table = self.table(role).write().await;
        if let Some(row) = table.rows.iter_mut().find(|row| row.email == user.email) {
            row.first_name = user.first_name;
            row.last_name = user.last_name;
            if user.password_hash.is_some() {
                row.password_hash = user.password_hash;
            }
            if user.google_id.is_some() {
                row.google_id = user.google_id;
            }
            return Ok(row.clone());
        }
        table.next_id += 1;
        let record = UserRecord {
            id: table.next_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            google_id: user.google_id,
        };
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn upsert_progress(&self, record: ProgressRecord) -> Result<()> {
        self.check_available()?;
        self.progress
            .write()
            .await
            .insert((record.user_id, record.lab_id), record);
        Ok(())
    }

    async fn progress_for_lab(
        &self,
        user_id: i64,
        _role: Role,
        lab_id: i32,
    ) -> Result<Option<ProgressRecord>> {
        self.check_available()?;
        Ok(self.progress.read().await.get(&(user_id, lab_id)).cloned())
    }
}
