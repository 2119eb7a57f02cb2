use std::fmt;

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "iol-client";

/// Environment variable holding the username for non-interactive use
pub const USERNAME_ENV: &str = "IOL_USERNAME";

/// Environment variable holding the password for non-interactive use
pub const PASSWORD_ENV: &str = "IOL_PASSWORD";

/// Username and password for the password grant. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of credentials, asked each time a password grant is needed.
pub trait CredentialProvider: Send {
    fn credentials(&mut self) -> Result<Credentials>;
}

/// Always returns the same credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self(Credentials::new(username, password))
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&mut self) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

/// Reads credentials from `IOL_USERNAME` / `IOL_PASSWORD` on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Check if both environment variables are set
    pub fn is_configured() -> bool {
        std::env::var(USERNAME_ENV).is_ok() && std::env::var(PASSWORD_ENV).is_ok()
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&mut self) -> Result<Credentials> {
        let username = std::env::var(USERNAME_ENV)
            .with_context(|| format!("{} is not set", USERNAME_ENV))?;
        let password = std::env::var(PASSWORD_ENV)
            .with_context(|| format!("{} is not set", PASSWORD_ENV))?;
        Ok(Credentials::new(username, password))
    }
}

pub struct CredentialStore;

impl CredentialStore {
    /// Store the password for a username in the OS keychain
    pub fn store(username: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve password for a username from the OS keychain
    pub fn get_password(username: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Delete stored password for a username
    pub fn delete(username: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check if a password is stored for a username
    pub fn has_credentials(username: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, username) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("jdoe", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("jdoe"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_static_credentials() {
        let mut provider = StaticCredentials::new("jdoe", "hunter2");
        let creds = provider.credentials().unwrap();
        assert_eq!(creds, Credentials::new("jdoe", "hunter2"));
        // Same pair on every call
        assert_eq!(provider.credentials().unwrap(), creds);
    }
}
