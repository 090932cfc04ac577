//! Remote access layer for the storefront API.
//!
//! # Architecture
//!
//! - Every call goes through a [`Transport`], which always yields an
//!   [`Envelope`]: `{success, message?, ...payload}`
//! - Transport faults (DNS, connect, reset, unparseable body) are logged and
//!   collapsed into `{success: false, message: "Network error"}`
//! - The server is the source of truth; nothing here caches or retries
//! - No explicit timeout is applied beyond the HTTP client's defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use threadline_storefront::api::{ApiClient, HttpTransport};
//!
//! let api = ApiClient::new(HttpTransport::new(config.api_base.clone())?);
//! let cart = api.get_cart().await?;
//! ```

mod endpoint;
mod payloads;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

use threadline_core::{CartLineId, CartSnapshot, CategoryId, Product, ProductId};

use crate::cart::AddToCart;
use crate::session::{Credentials, Registration};

pub use endpoint::{ApiRequest, Endpoint};
pub use payloads::{CartCount, LoginReceipt, ProductDetail, ProductList, SessionCheck};
pub use transport::{HttpTransport, Transport};

/// Message carried by every transport-level failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Message used when the server declares failure without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Errors surfaced by the remote access layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a well-formed response.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Transport,

    /// The server answered with `success: false`.
    #[error("{0}")]
    Declared(String),
}

impl ApiError {
    /// Human-readable message suitable for a notification.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transport => NETWORK_ERROR_MESSAGE,
            Self::Declared(message) => message,
        }
    }

    /// Whether the failure happened below the API contract.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport)
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// Uniform response envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the server performed the request.
    #[serde(default)]
    pub success: bool,
    /// Human-readable outcome, mostly present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Remaining endpoint-specific fields.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(skip)]
    transport_failure: bool,
}

impl Envelope {
    /// The envelope produced for any transport-level fault.
    #[must_use]
    pub fn network_error() -> Self {
        Self {
            success: false,
            message: Some(NETWORK_ERROR_MESSAGE.to_string()),
            payload: Map::new(),
            transport_failure: true,
        }
    }

    /// A successful envelope carrying `payload`'s fields.
    ///
    /// Non-object payloads contribute no fields.
    #[must_use]
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            message: None,
            payload: match payload {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            transport_failure: false,
        }
    }

    /// Whether this envelope stands in for a transport fault.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        self.transport_failure
    }

    /// Decode the payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` for transport faults and for payloads
    /// that do not match `P`, and `ApiError::Declared` when the server reports
    /// failure.
    pub fn into_result<P: DeserializeOwned>(self) -> Result<P, ApiError> {
        if self.transport_failure {
            return Err(ApiError::Transport);
        }

        if !self.success {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            return Err(ApiError::Declared(message));
        }

        serde_json::from_value(Value::Object(self.payload)).map_err(|e| {
            tracing::error!(error = %e, "Unexpected payload shape in API response");
            ApiError::Transport
        })
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Typed access to every storefront endpoint.
///
/// Cheap to clone; clones share one transport.
pub struct ApiClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call an endpoint and decode its payload.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the transport fails or the server declares
    /// failure.
    pub async fn call<P: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<P, ApiError> {
        self.call_with_headers(endpoint, HeaderMap::new()).await
    }

    /// Call an endpoint with extra request headers.
    ///
    /// Caller headers are merged into the request; the JSON content type is
    /// always sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the transport fails or the server declares
    /// failure.
    #[instrument(skip_all, fields(script = endpoint.script(), action = endpoint.action()))]
    pub async fn call_with_headers<P: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        headers: HeaderMap,
    ) -> Result<P, ApiError> {
        let request = endpoint.into_request().with_headers(headers);
        let result = self.transport.send(request).await.into_result();

        if let Err(e) = &result {
            debug!(error = %e, transport = e.is_transport(), "API call failed");
        }

        result
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn login(&self, credentials: Credentials) -> Result<LoginReceipt, ApiError> {
        self.call(Endpoint::Login(credentials)).await
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn register(&self, registration: Registration) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Endpoint::Register(registration))
            .await
            .map(|_| ())
    }

    /// End the server session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Endpoint::Logout).await.map(|_| ())
    }

    /// Ask the server whether the ambient session is logged in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn check_session(&self) -> Result<SessionCheck, ApiError> {
        self.call(Endpoint::CheckSession).await
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// One page of the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn all_products(&self, limit: u32, offset: u32) -> Result<Vec<Product>, ApiError> {
        self.call::<ProductList>(Endpoint::AllProducts { limit, offset })
            .await
            .map(|list| list.products)
    }

    /// Featured products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn featured_products(&self, limit: u32) -> Result<Vec<Product>, ApiError> {
        self.call::<ProductList>(Endpoint::FeaturedProducts { limit })
            .await
            .map(|list| list.products)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.call::<ProductDetail>(Endpoint::Product { id })
            .await
            .map(|detail| detail.product)
    }

    /// Keyword search, optionally restricted to a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn search_products(
        &self,
        keyword: &str,
        category_id: Option<CategoryId>,
        limit: u32,
    ) -> Result<Vec<Product>, ApiError> {
        self.call::<ProductList>(Endpoint::SearchProducts {
            keyword: keyword.to_string(),
            category_id,
            limit,
        })
        .await
        .map(|list| list.products)
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn add_to_cart(&self, item: AddToCart) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Endpoint::AddToCart(item))
            .await
            .map(|_| ())
    }

    /// The current cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn get_cart(&self) -> Result<CartSnapshot, ApiError> {
        self.call(Endpoint::GetCart).await
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn update_cart_item(&self, cart_id: CartLineId, quantity: u32) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Endpoint::UpdateCartItem { cart_id, quantity })
            .await
            .map(|_| ())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn remove_from_cart(&self, cart_id: CartLineId) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Endpoint::RemoveFromCart { cart_id })
            .await
            .map(|_| ())
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Endpoint::ClearCart).await.map(|_| ())
    }

    /// Lightweight unit count.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or declared failure.
    pub async fn cart_count(&self) -> Result<u32, ApiError> {
        self.call::<CartCount>(Endpoint::CartCount)
            .await
            .map(|c| c.count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use super::testing::ScriptedTransport;

    #[test]
    fn test_api_error_messages() {
        assert_eq!(ApiError::Transport.to_string(), "Network error");
        assert_eq!(
            ApiError::Declared("Invalid credentials".to_string()).message(),
            "Invalid credentials"
        );
        assert!(ApiError::Transport.is_transport());
    }

    #[test]
    fn test_envelope_flattens_payload() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": true, "count": 3})).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.payload.get("count"), Some(&json!(3)));
        assert!(!envelope.is_transport_failure());
    }

    #[test]
    fn test_declared_failure_keeps_server_message() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": false, "message": "Out of stock"})).unwrap();
        assert_eq!(
            envelope.into_result::<IgnoredAny>().unwrap_err(),
            ApiError::Declared("Out of stock".to_string())
        );
    }

    #[test]
    fn test_declared_failure_without_message() {
        let envelope: Envelope = serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(
            envelope.into_result::<IgnoredAny>().unwrap_err().message(),
            DEFAULT_FAILURE_MESSAGE
        );

        // A missing success flag counts as a declared failure.
        let envelope: Envelope = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(!envelope.into_result::<IgnoredAny>().unwrap_err().is_transport());
    }

    #[test]
    fn test_network_error_envelope() {
        let envelope = Envelope::network_error();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some(NETWORK_ERROR_MESSAGE));
        assert_eq!(
            envelope.into_result::<IgnoredAny>().unwrap_err(),
            ApiError::Transport
        );
    }

    #[test]
    fn test_mismatched_payload_is_a_transport_failure() {
        let envelope = Envelope::ok(json!({"items": "not a list"}));
        assert_eq!(
            envelope.into_result::<CartSnapshot>().unwrap_err(),
            ApiError::Transport
        );
    }

    #[tokio::test]
    async fn test_client_sends_one_request_per_call() {
        let transport = ScriptedTransport::new();
        transport.reply("count", json!({"success": true, "count": "4"}));
        let api = ApiClient::new(transport);

        assert_eq!(api.cart_count().await.unwrap(), 4);
        // Unscripted replies behave like a dead network.
        assert_eq!(api.cart_count().await.unwrap_err(), ApiError::Transport);
        assert_eq!(api.transport().actions(), vec!["count", "count"]);
    }
}
