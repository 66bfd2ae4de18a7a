//! Third-party sign-in providers

pub mod google;

pub use google::{GoogleClient, GoogleProfile};
