//! Authentication module for managing the OAuth2 session and credentials.
//!
//! This module provides:
//! - `Session`: the in-memory token pair with expiry tracking
//! - `CredentialProvider`: the source of username/password on demand
//! - `CredentialStore`: secure OS-level password storage via keyring
//!
//! Tokens live only for the lifetime of the process and are never persisted.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::{
    CredentialProvider, CredentialStore, Credentials, EnvCredentials, StaticCredentials,
};
pub use session::{Session, TokenSet, TokenStatus};
pub use token::parse_expiry;
