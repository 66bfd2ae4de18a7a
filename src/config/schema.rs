//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub urls: UrlConfig,

    #[serde(default)]
    pub google: Option<GoogleConfig>,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Deployment environment; only affects the cookie Secure flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
        }
    }
}

/// Session signing and cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the session tokens are signed with
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_session_ttl_days() -> i64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            cookie_name: default_cookie_name(),
            session_ttl_days: default_session_ttl_days(),
        }
    }
}

/// Frontend and backend base URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    #[serde(default = "default_frontend_url")]
    pub frontend: String,

    #[serde(default = "default_backend_url")]
    pub backend: String,
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            frontend: default_frontend_url(),
            backend: default_backend_url(),
        }
    }
}

/// Google OAuth client credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub dbname: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "labgate".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            dbname: default_db_name(),
        }
    }
}
