//! Token manager for the InvertirOnline REST API.
//!
//! `TokenManager` owns the OAuth2 session: it acquires tokens with the
//! password grant, renews them with the refresh-token grant, and checks the
//! stored expiries before every authenticated request.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::auth::token::TokenResponse;
use crate::auth::{CredentialProvider, Credentials, Session, TokenSet, TokenStatus};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;

use super::ApiError;

/// Owns the authentication session and exposes an authenticated GET.
/// Every operation takes `&mut self`; share it across tasks only behind a lock.
pub struct TokenManager {
    client: Client,
    token_url: String,
    session: Session,
    credentials: Option<Credentials>,
    provider: Box<dyn CredentialProvider>,
    clock: Box<dyn Clock>,
}

impl TokenManager {
    /// Create an unauthenticated manager for the configured token endpoint
    pub fn new(config: &Config, provider: Box<dyn CredentialProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token_url: config.token_url.clone(),
            session: Session::new(),
            credentials: None,
            provider,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the time source used for expiry checks
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Credentials used by the last password grant
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Ask the credential provider for a username and password, then obtain
    /// a fresh token pair with the password grant.
    pub async fn authenticate(&mut self) -> Result<()> {
        let credentials = self
            .provider
            .credentials()
            .context("Failed to obtain credentials")?;
        let credentials = self.credentials.insert(credentials);

        debug!(username = %credentials.username, "Requesting password grant");
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("grant_type", "password"),
        ];
        let tokens = Self::request_tokens(&self.client, &self.token_url, &form)
            .await
            .context("Authentication failed")?;

        info!(
            access_expiry = %tokens.access_expiry,
            refresh_expiry = %tokens.refresh_expiry,
            "Authenticated"
        );
        self.session.update(tokens);
        Ok(())
    }

    /// Obtain a new token pair using the stored refresh token
    pub async fn refresh(&mut self) -> Result<()> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(ApiError::NotAuthenticated)?;

        debug!("Requesting refresh token grant");
        let form = [
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let tokens = Self::request_tokens(&self.client, &self.token_url, &form)
            .await
            .context("Token refresh failed")?;

        info!(access_expiry = %tokens.access_expiry, "Access token refreshed");
        self.session.update(tokens);
        Ok(())
    }

    /// Make sure the access token is usable, refreshing it or
    /// re-authenticating as the stored expiries require.
    pub async fn check_token(&mut self) -> Result<()> {
        let now = self.clock.now();
        match self.session.status_at(now) {
            None => Err(ApiError::NotAuthenticated.into()),
            Some(TokenStatus::Valid) => Ok(()),
            Some(TokenStatus::AccessExpired) => {
                debug!("Access token expired");
                self.refresh().await
            }
            Some(TokenStatus::RefreshExpired) => {
                warn!("Refresh token expired, authenticating again");
                self.authenticate().await
            }
        }
    }

    /// GET `url` with the bearer token attached. The response is returned as
    /// received; callers handle status and body.
    pub async fn get(&mut self, url: &str, params: &[(&str, &str)]) -> Result<Response> {
        self.check_token().await?;

        let token = self
            .session
            .access_token()
            .ok_or(ApiError::NotAuthenticated)?;

        debug!(url = url, params = params.len(), "Sending GET request");
        self.client
            .get(url)
            .query(params)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))
    }

    /// POST a form-encoded grant to the token endpoint. Anything but 200 is
    /// a rejection carrying the status code.
    async fn request_tokens(
        client: &Client,
        token_url: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenSet> {
        let response = client
            .post(token_url)
            .form(form)
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send token request")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::TokenRejected { status }.into());
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(body.into_token_set()?)
    }
}
