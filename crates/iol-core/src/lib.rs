//! Core library for the InvertirOnline REST API client.
//!
//! Provides the `TokenManager`, which owns the OAuth2 session (password and
//! refresh-token grants), keeps the access token fresh, and issues
//! authenticated GET requests.

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;

pub use api::{ApiError, TokenManager};
pub use auth::{CredentialProvider, Credentials, Session, TokenSet, TokenStatus};
pub use clock::{Clock, SystemClock};
pub use config::Config;
