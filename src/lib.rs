//! labgate - session authentication for the classroom lab platform
//!
//! This is the library interface for labgate, exposing the session
//! flows, token codec and store interface for programmatic use and
//! integration tests.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod oauth;
pub mod store;

pub use config::Config;
pub use error::Error;
