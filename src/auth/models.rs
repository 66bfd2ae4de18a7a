//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User roles, each backed by its own credential table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student - submits lab progress
    Student,
    /// Instructor - reviews lab progress
    Instructor,
}

impl Role {
    /// Name of the credential table backing this role
    pub fn table(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for Role {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            other => Err(crate::error::Error::Config(format!(
                "Unknown role: {}",
                other
            ))),
        }
    }
}

/// Resolved identity threaded from a verified session to handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Role-specific user id
    pub id: i64,
    /// Account email
    pub email: String,
    /// Role of the table the record matched in
    pub role: Role,
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Signup form
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Session status report for the frontend
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SessionStatus {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    pub role: Option<Role>,
    pub id: Option<i64>,
}

impl SessionStatus {
    /// Status for a request carrying no valid session
    pub fn anonymous() -> Self {
        Self {
            is_logged_in: false,
            role: None,
            id: None,
        }
    }

    /// Status for a verified identity
    pub fn logged_in(id: i64, role: Role) -> Self {
        Self {
            is_logged_in: true,
            role: Some(role),
            id: Some(id),
        }
    }
}
