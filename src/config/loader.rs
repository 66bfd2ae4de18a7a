//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "labgate.toml";

/// Load configuration from labgate.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# labgate configuration

[server]
host = "0.0.0.0"
port = 3000
environment = "${NODE_ENV:-development}"

[auth]
jwt_secret = "${JWT_SECRET_KEY}"
cookie_name = "token"
session_ttl_days = 30

[urls]
frontend = "${FRONTEND_URL:-http://localhost:5173}"
backend = "${BACKEND_URL:-http://localhost:3000}"

# Uncomment to enable Google sign-in
# [google]
# client_id = "${GOOGLE_CLIENT_ID}"
# client_secret = "${GOOGLE_CLIENT_SECRET}"

[database]
host = "${DB_HOST:-localhost}"
port = 5432
user = "${DB_USER:-postgres}"
password = "${DB_PASSWORD:-}"
dbname = "${DB_NAME:-labgate}"
"#
}

/// Write the default configuration to ./labgate.toml
pub fn save_default_config() -> Result<std::path::PathBuf> {
    let path = env::current_dir()
        .map_err(|e| Error::Config(e.to_string()))?
        .join(CONFIG_FILENAME);
    if path.exists() {
        return Err(Error::Config(format!(
            "{} already exists",
            path.display()
        )));
    }
    fs::write(&path, default_config_content())?;
    Ok(path)
}
