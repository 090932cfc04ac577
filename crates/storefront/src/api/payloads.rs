//! Endpoint-specific payloads carried alongside the envelope fields.

use serde::Deserialize;

use threadline_core::types::wire::number_or_string;
use threadline_core::{Identity, Product};

/// Payload of `auth.php?action=check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionCheck {
    /// Whether the ambient session is authenticated.
    #[serde(default)]
    pub logged_in: bool,
    /// The session's identity, when logged in.
    #[serde(default)]
    pub user: Option<Identity>,
}

impl SessionCheck {
    /// The identity, only when the server says the session is logged in.
    #[must_use]
    pub fn into_identity(self) -> Option<Identity> {
        if self.logged_in { self.user } else { None }
    }
}

/// Payload of `auth.php?action=login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginReceipt {
    /// The identity that was just authenticated.
    pub user: Identity,
}

/// Payload of the product listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Payload of `products.php?action=single`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
}

/// Payload of `cart.php?action=count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CartCount {
    #[serde(default, deserialize_with = "number_or_string")]
    pub count: u32,
}
