//! User interface events.
//!
//! Controls never call managers directly. They produce a [`UiEvent`], which
//! the [`Storefront`](crate::Storefront) dispatches.

use threadline_core::{CartLineId, CategoryId, Identity, Product};

use crate::api::ApiError;
use crate::cart::{AddToCart, CheckoutHandoff, CheckoutRefusal};
use crate::session::{Credentials, Registration};

/// Something the shopper did.
#[derive(Debug, Clone)]
pub enum UiEvent {
    AddToCart(AddToCart),
    Increment(CartLineId),
    Decrement(CartLineId),
    RemoveItem(CartLineId),
    ClearCart,
    Login(Credentials),
    Register(Registration),
    Logout,
    Checkout,
    Search {
        keyword: String,
        category_id: Option<CategoryId>,
    },
    /// Reload the cart and the home page listings.
    Refresh,
}

impl UiEvent {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "add_to_cart",
            Self::Increment(_) => "increment",
            Self::Decrement(_) => "decrement",
            Self::RemoveItem(_) => "remove_item",
            Self::ClearCart => "clear_cart",
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::Checkout => "checkout",
            Self::Search { .. } => "search",
            Self::Refresh => "refresh",
        }
    }
}

/// Result of dispatching a [`UiEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The action went through; state has been republished.
    Applied,
    /// A login succeeded.
    LoggedIn(Identity),
    /// Search results.
    Products(Vec<Product>),
    /// Checkout may proceed to the external page.
    CheckoutReady(CheckoutHandoff),
    /// Checkout was refused locally.
    CheckoutRefused(CheckoutRefusal),
    /// The call failed. Already surfaced as a notice where applicable.
    Failed(ApiError),
}

impl EventOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::CheckoutRefused(_) | Self::Failed(_))
    }
}

impl From<Result<(), ApiError>> for EventOutcome {
    fn from(result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => Self::Applied,
            Err(e) => Self::Failed(e),
        }
    }
}
