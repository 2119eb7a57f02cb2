//! iol - command line client for the InvertirOnline REST API.
//!
//! Authenticates with the OAuth2 password grant and issues bearer-authenticated
//! GET requests, printing the raw response.

mod prompt;

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iol_core::auth::{CredentialProvider, CredentialStore, EnvCredentials};
use iol_core::{Clock, Config, SystemClock, TokenManager};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prompt::PromptCredentials;

#[derive(Parser)]
#[command(name = "iol", version, about = "InvertirOnline REST API client")]
struct Cli {
    /// OAuth2 token endpoint
    #[arg(long, env = "IOL_TOKEN_URL", global = true)]
    token_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and show token expiries
    Login {
        /// Store the password in the OS keychain after a successful login
        #[arg(long)]
        remember: bool,
    },
    /// Authenticate, then GET a URL with the bearer token
    Get {
        url: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short = 'q', long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,
    },
    /// Remove the stored keychain password for the last username
    Forget,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Environment credentials when both variables are set, the terminal prompt otherwise
fn credential_provider(config: &Config) -> Box<dyn CredentialProvider> {
    if EnvCredentials::is_configured() {
        Box::new(EnvCredentials)
    } else {
        Box::new(PromptCredentials::new(config.last_username.clone()))
    }
}

async fn login(config: &mut Config) -> Result<TokenManager> {
    let mut manager = TokenManager::new(config, credential_provider(config))?;
    manager.authenticate().await?;

    if let Some(credentials) = manager.credentials() {
        if config.last_username.as_deref() != Some(credentials.username.as_str()) {
            config.last_username = Some(credentials.username.clone());
            config.save().context("Failed to save config")?;
        }
    }
    Ok(manager)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(token_url) = cli.token_url {
        config.token_url = token_url;
    }
    info!(token_url = %config.token_url, "iol starting");

    match cli.command {
        Command::Login { remember } => {
            let manager = login(&mut config).await?;

            if let Some(tokens) = manager.session().tokens() {
                eprintln!(
                    "Access token expires:  {} (in {} minutes)",
                    tokens.access_expiry,
                    tokens.minutes_until_expiry(SystemClock.now())
                );
                eprintln!("Refresh token expires: {}", tokens.refresh_expiry);
            }
            if remember {
                if let Some(credentials) = manager.credentials() {
                    CredentialStore::store(&credentials.username, &credentials.password)?;
                    eprintln!("Password stored in keychain");
                }
            }
        }
        Command::Get { url, query } => {
            let mut manager = login(&mut config).await?;

            let params: Vec<(&str, &str)> = query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let response = manager.get(&url, &params).await?;

            eprintln!("{}", response.status());
            let body = response
                .text()
                .await
                .context("Failed to read response body")?;
            println!("{}", body);
        }
        Command::Forget => {
            let username = config
                .last_username
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("No username to forget"))?;
            CredentialStore::delete(username)?;
            eprintln!("Removed stored password for {}", username);
        }
    }

    Ok(())
}
