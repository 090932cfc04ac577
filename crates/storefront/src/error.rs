//! Errors raised while assembling a storefront client.
//!
//! Runtime call failures are [`ApiError`](crate::api::ApiError)s and are
//! handled by the managers; this type only covers setup.

use thiserror::Error;

use crate::config::ConfigError;

/// Storefront setup error.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
