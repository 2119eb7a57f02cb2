use chrono::{DateTime, Duration, Utc};

/// Outcome of comparing the current time against the stored expiries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Access token still usable
    Valid,
    /// Access token expired, refresh token still usable
    AccessExpired,
    /// Refresh token expired; a full password grant is required
    RefreshExpired,
}

/// Tokens and expiries taken from a single token response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expiry: DateTime<Utc>,
    pub refresh_expiry: DateTime<Utc>,
}

impl TokenSet {
    /// Classify the token pair at `now`. A token is expired only once `now`
    /// is strictly past its expiry. The refresh expiry is checked first.
    pub fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        if now > self.refresh_expiry {
            TokenStatus::RefreshExpired
        } else if now > self.access_expiry {
            TokenStatus::AccessExpired
        } else {
            TokenStatus::Valid
        }
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        self.access_expiry - now
    }

    /// Get minutes remaining until the access token expires (for display)
    pub fn minutes_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        self.time_until_expiry(now).num_minutes().max(0)
    }
}

/// In-memory OAuth2 session. Empty until the first successful authentication.
#[derive(Debug, Default)]
pub struct Session {
    tokens: Option<TokenSet>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the token pair with one from a fresh token response
    pub fn update(&mut self, tokens: TokenSet) {
        self.tokens = Some(tokens);
    }

    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// Get the bearer token if the session has been authenticated
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.refresh_token.as_str())
    }

    pub fn access_expiry(&self) -> Option<DateTime<Utc>> {
        self.tokens.as_ref().map(|t| t.access_expiry)
    }

    pub fn refresh_expiry(&self) -> Option<DateTime<Utc>> {
        self.tokens.as_ref().map(|t| t.refresh_expiry)
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Token status at `now`, or `None` before the first authentication
    pub fn status_at(&self, now: DateTime<Utc>) -> Option<TokenStatus> {
        self.tokens.as_ref().map(|t| t.status_at(now))
    }
}
