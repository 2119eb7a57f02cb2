//! REST API client module for InvertirOnline services.
//!
//! This module provides the `TokenManager` for obtaining OAuth2 tokens from
//! the InvertirOnline token endpoint and issuing bearer-authenticated
//! requests against the API.

pub mod client;
pub mod error;

pub use client::TokenManager;
pub use error::ApiError;
