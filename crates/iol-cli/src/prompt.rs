//! Interactive credential prompt.

use std::io::{self, Write};

use anyhow::{Context, Result};
use iol_core::auth::{CredentialProvider, CredentialStore, Credentials};

/// Prompts on the terminal for username and a masked password. Offers the
/// keychain password when one is stored for the entered username.
pub struct PromptCredentials {
    last_username: Option<String>,
}

impl PromptCredentials {
    pub fn new(last_username: Option<String>) -> Self {
        Self { last_username }
    }

    fn prompt_username(&self) -> Result<String> {
        match self.last_username {
            Some(ref last) => eprint!("Username [{}]: ", last),
            None => eprint!("Username: "),
        }
        io::stderr().flush()?;

        let input = read_line()?;
        choose_username(&input, self.last_username.as_deref())
            .ok_or_else(|| anyhow::anyhow!("Username required"))
    }

    fn prompt_password() -> Result<String> {
        rpassword::prompt_password("Password: ").context("Failed to read password")
    }
}

impl CredentialProvider for PromptCredentials {
    fn credentials(&mut self) -> Result<Credentials> {
        let username = self.prompt_username()?;

        let password = if CredentialStore::has_credentials(&username) {
            eprint!("Use stored password? [Y/n]: ");
            io::stderr().flush()?;

            if wants_stored_password(&read_line()?) {
                CredentialStore::get_password(&username)?
            } else {
                Self::prompt_password()?
            }
        } else {
            Self::prompt_password()?
        };

        self.last_username = Some(username.clone());
        Ok(Credentials::new(username, password))
    }
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    Ok(input)
}

/// Entered username, falling back to the last one on empty input
fn choose_username(input: &str, last: Option<&str>) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        last.map(str::to_string)
    } else {
        Some(input.to_string())
    }
}

fn wants_stored_password(answer: &str) -> bool {
    answer.trim().to_lowercase() != "n"
}
