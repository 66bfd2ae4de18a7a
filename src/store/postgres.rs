//! PostgreSQL credential store

use crate::auth::models::Role;
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::store::{CredentialStore, NewUser, ProgressRecord, UserRecord};
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

/// Credential store backed by PostgreSQL
pub struct PgStore {
    client: Client,
}

impl PgStore {
    /// Connect to the configured database and spawn the connection driver
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let conn_string = format!(
            "host={} port={} user={} password={} dbname={}",
            config.host, config.port, config.user, config.password, config.dbname
        );

        let (client, connection) = tokio_postgres::connect(&conn_string, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Primary key column of a role's table
    fn id_column(role: Role) -> &'static str {
        match role {
            Role::Student => "student_id",
            Role::Instructor => "instructor_id",
        }
    }

    fn user_from_row(role: Role, row: &Row) -> UserRecord {
        UserRecord {
            id: row.get(Self::id_column(role)),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            google_id: row.get("google_id"),
        }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn users_by_email(&self, role: Role, email: &str) -> Result<Vec<UserRecord>> {
        // Table and id column come from the Role enum, never from input
        let query = format!(
            "SELECT {id}, first_name, last_name, email, password_hash, google_id \
             FROM {table} WHERE email = $1",
            id = Self::id_column(role),
            table = role.table()
        );
        let rows = self.client.query(&query, &[&email]).await?;
        Ok(rows
            .iter()
            .map(|row| Self::user_from_row(role, row))
            .collect())
    }

    async fn user_by_google_id(&self, role: Role, google_id: &str) -> Result<Option<UserRecord>> {
        let query = format!(
            "SELECT {id}, first_name, last_name, email, password_hash, google_id \
             FROM {table} WHERE google_id = $1",
            id = Self::id_column(role),
            table = role.table()
        );
        let row = self.client.query_opt(&query, &[&google_id]).await?;
        Ok(row.map(|row| Self::user_from_row(role, &row)))
    }

    async fn insert_user(&self, role: Role, user: NewUser) -> Result<UserRecord> {
        let query = format!(
            "INSERT INTO {table} (first_name, last_name, email, password_hash, google_id) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (email) DO UPDATE SET \
               first_name = EXCLUDED.first_name, \
               last_name = EXCLUDED.last_name, \
               password_hash = COALESCE(EXCLUDED.password_hash, {table}.password_hash), \
               google_id = COALESCE(EXCLUDED.google_id, {table}.google_id) \
             RETURNING {id}, first_name, last_name, email, password_hash, google_id",
            id = Self::id_column(role),
            table = role.table()
        );
        let row = self
            .client
            .query_one(
                &query,
                &[
                    &user.first_name,
                    &user.last_name,
                    &user.email,
                    &user.password_hash,
                    &user.google_id,
                ],
            )
            .await?;
        Ok(Self::user_from_row(role, &row))
    }

    async fn upsert_progress(&self, record: ProgressRecord) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO lab_progress (user_id, role, lab_id, score) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (user_id, lab_id) DO UPDATE SET \
                   role = EXCLUDED.role, score = EXCLUDED.score",
                &[
                    &record.user_id,
                    &record.role.table(),
                    &record.lab_id,
                    &record.score,
                ],
            )
            .await?;
        Ok(())
    }

    async fn progress_for_lab(
        &self,
        user_id: i64,
        role: Role,
        lab_id: i32,
    ) -> Result<Option<ProgressRecord>> {
        let row = self
            .client
            .query_opt(
                "SELECT score FROM lab_progress WHERE user_id = $1 AND lab_id = $2",
                &[&user_id, &lab_id],
            )
            .await?;
        Ok(row.map(|row| ProgressRecord {
            user_id,
            role,
            lab_id,
            score: row.get("score"),
        }))
    }
}
