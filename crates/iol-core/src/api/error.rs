use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Token request rejected. Status code: {}", .status.as_u16())]
    TokenRejected { status: StatusCode },

    #[error("Invalid expiry date: {value:?}")]
    InvalidDate { value: String },

    #[error("Not authenticated - call authenticate first")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Status code carried by a rejected token request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::TokenRejected { status } => Some(*status),
            _ => None,
        }
    }
}
