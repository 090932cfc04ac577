//! Endpoint catalogue and request construction.
//!
//! Every endpoint maps to a script under the API base, an `action` query
//! parameter, an HTTP method, and optionally a JSON body.

use std::fmt;

use reqwest::Method;
use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;
use serde_json::{Value, json};

use threadline_core::{CartLineId, CategoryId, ProductId};

use crate::cart::AddToCart;
use crate::session::{Credentials, Registration};

const AUTH_SCRIPT: &str = "auth.php";
const PRODUCTS_SCRIPT: &str = "products.php";
const CART_SCRIPT: &str = "cart.php";

/// A storefront API endpoint together with its arguments.
#[derive(Debug, Clone)]
pub enum Endpoint {
    Login(Credentials),
    Register(Registration),
    Logout,
    CheckSession,
    AllProducts {
        limit: u32,
        offset: u32,
    },
    FeaturedProducts {
        limit: u32,
    },
    Product {
        id: ProductId,
    },
    SearchProducts {
        keyword: String,
        category_id: Option<CategoryId>,
        limit: u32,
    },
    AddToCart(AddToCart),
    GetCart,
    UpdateCartItem {
        cart_id: CartLineId,
        quantity: u32,
    },
    RemoveFromCart {
        cart_id: CartLineId,
    },
    ClearCart,
    CartCount,
}

impl Endpoint {
    /// Script the endpoint lives under.
    #[must_use]
    pub const fn script(&self) -> &'static str {
        match self {
            Self::Login(_) | Self::Register(_) | Self::Logout | Self::CheckSession => AUTH_SCRIPT,
            Self::AllProducts { .. }
            | Self::FeaturedProducts { .. }
            | Self::Product { .. }
            | Self::SearchProducts { .. } => PRODUCTS_SCRIPT,
            Self::AddToCart(_)
            | Self::GetCart
            | Self::UpdateCartItem { .. }
            | Self::RemoveFromCart { .. }
            | Self::ClearCart
            | Self::CartCount => CART_SCRIPT,
        }
    }

    /// Value of the `action` query parameter.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::CheckSession => "check",
            Self::AllProducts { .. } => "all",
            Self::FeaturedProducts { .. } => "featured",
            Self::Product { .. } => "single",
            Self::SearchProducts { .. } => "search",
            Self::AddToCart(_) => "add",
            Self::GetCart => "get",
            Self::UpdateCartItem { .. } => "update",
            Self::RemoveFromCart { .. } => "remove",
            Self::ClearCart => "clear",
            Self::CartCount => "count",
        }
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Login(_) | Self::Register(_) | Self::AddToCart(_) => Method::POST,
            Self::UpdateCartItem { .. } => Method::PUT,
            Self::RemoveFromCart { .. } => Method::DELETE,
            _ => Method::GET,
        }
    }

    /// Query parameters after `action`.
    fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::AllProducts { limit, offset } => {
                vec![("limit", limit.to_string()), ("offset", offset.to_string())]
            }
            Self::FeaturedProducts { limit } => vec![("limit", limit.to_string())],
            Self::Product { id } => vec![("id", id.to_string())],
            Self::SearchProducts {
                keyword,
                category_id,
                limit,
            } => {
                let mut query = vec![("keyword", keyword.clone()), ("limit", limit.to_string())];
                if let Some(category_id) = category_id {
                    query.push(("category_id", category_id.to_string()));
                }
                query
            }
            Self::RemoveFromCart { cart_id } => vec![("cart_id", cart_id.to_string())],
            _ => Vec::new(),
        }
    }

    /// JSON body, for endpoints that send one.
    fn body(&self) -> Option<Value> {
        match self {
            Self::Login(credentials) => Some(json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
            })),
            Self::Register(registration) => Some(json!({
                "first_name": registration.first_name,
                "last_name": registration.last_name,
                "username": registration.username,
                "email": registration.email,
                "password": registration.password.expose_secret(),
                "phone": registration.phone,
            })),
            Self::AddToCart(item) => Some(json!({
                "product_id": item.product_id,
                "quantity": item.quantity,
                "size": item.size,
                "color": item.color,
            })),
            Self::UpdateCartItem { cart_id, quantity } => Some(json!({
                "cart_id": cart_id,
                "quantity": quantity,
            })),
            _ => None,
        }
    }

    /// Build the request for this endpoint.
    #[must_use]
    pub fn into_request(self) -> ApiRequest {
        ApiRequest {
            method: self.method(),
            script: self.script(),
            action: self.action(),
            query: self.query(),
            body: self.body(),
            headers: HeaderMap::new(),
        }
    }
}

/// A fully built request, ready for a [`Transport`](super::Transport).
///
/// `Debug` omits the body, which may carry a password.
#[derive(Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Script under the API base.
    pub script: &'static str,
    /// `action` query parameter.
    pub action: &'static str,
    /// Additional query parameters, in order.
    pub query: Vec<(&'static str, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Caller-supplied headers.
    pub headers: HeaderMap,
}

impl ApiRequest {
    /// Merge caller-supplied headers into the request.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Path relative to the API base, with URL-encoded query.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("action", self.action);
        for (key, value) in &self.query {
            query.append_pair(key, value);
        }
        format!("{}?{}", self.script, query.finish())
    }

    /// Value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path_and_query())
            .field("has_body", &self.body.is_some())
            .field("headers", &self.headers.len())
            .finish()
    }
}
