//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `THREADLINE_API_BASE` - Base URL of the storefront API (default: `http://127.0.0.1:8080/api`)
//! - `THREADLINE_CHECKOUT_URL` - Where checkout hands off to (default: `/checkout.php`)
//! - `THREADLINE_NOTIFICATION_MS` - Lifetime of transient notifications (default: 3000)
//! - `THREADLINE_FEATURED_LIMIT` - Products in the featured listing (default: 8)
//! - `THREADLINE_NEW_ARRIVALS_LIMIT` - Products in the new arrivals strip (default: 6)
//! - `THREADLINE_PAGE_SIZE` - Page size for full catalog and search listings (default: 20)

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080/api";
const DEFAULT_CHECKOUT_URL: &str = "/checkout.php";
const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL every endpoint path is resolved against
    pub api_base: Url,
    /// External checkout page
    pub checkout_url: String,
    /// How long a transient notification stays visible
    pub notification_ttl: Duration,
    /// Listing sizes for catalog reads
    pub catalog: CatalogLimits,
}

/// Listing sizes for catalog reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    /// Products in the featured listing
    pub featured: u32,
    /// Products in the new arrivals strip
    pub new_arrivals: u32,
    /// Page size for full listings and search
    pub page_size: u32,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            featured: 8,
            new_arrivals: 6,
            page_size: 20,
        }
    }
}

impl StorefrontConfig {
    /// Configuration pointing at `api_base` with every other value defaulted.
    #[must_use]
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            catalog: CatalogLimits::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = parse_api_base(
            &lookup("THREADLINE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        )?;
        let checkout_url = lookup("THREADLINE_CHECKOUT_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHECKOUT_URL.to_string());
        let notification_ms =
            parse_or_default(&lookup, "THREADLINE_NOTIFICATION_MS", DEFAULT_NOTIFICATION_MS)?;

        let defaults = CatalogLimits::default();
        let catalog = CatalogLimits {
            featured: parse_or_default(&lookup, "THREADLINE_FEATURED_LIMIT", defaults.featured)?,
            new_arrivals: parse_or_default(
                &lookup,
                "THREADLINE_NEW_ARRIVALS_LIMIT",
                defaults.new_arrivals,
            )?,
            page_size: parse_or_default(&lookup, "THREADLINE_PAGE_SIZE", defaults.page_size)?,
        };

        Ok(Self {
            api_base,
            checkout_url,
            notification_ttl: Duration::from_millis(notification_ms),
            catalog,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and normalize the API base so relative joins land beneath it.
fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("THREADLINE_API_BASE".to_string(), reason);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
