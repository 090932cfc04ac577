//! Cart state manager.
//!
//! The cart lives on the server. The manager holds the last snapshot the
//! server returned and replaces it wholesale after every successful mutation;
//! it never patches lines or recomputes totals locally.
//!
//! Concurrent mutations are not sequenced. Whichever reload resolves last
//! determines the snapshot.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use threadline_core::{CartLineId, CartSnapshot, Price, ProductId};

use crate::api::{ApiClient, ApiError, Transport};
use crate::notify::NotificationCenter;
use crate::session::SessionState;

pub const ITEM_ADDED: &str = "Item added to cart!";
pub const ITEM_REMOVED: &str = "Item removed from cart!";
pub const CART_CLEARED: &str = "Cart cleared!";
pub const ITEM_NOT_IN_CART: &str = "Item not found in cart";

/// Arguments for adding a product to the cart.
///
/// Defaults to one unit with no size or color selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: u32,
    pub size: String,
    pub color: String,
}

impl AddToCart {
    #[must_use]
    pub const fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: 1,
            size: String::new(),
            color: String::new(),
        }
    }

    #[must_use]
    pub const fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Why checkout was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutRefusal {
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("Please login to checkout!")]
    NotLoggedIn,
}

/// Permission to leave for the external checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutHandoff {
    pub url: String,
    pub count: u32,
    pub total: Price,
}

/// Owns the cart snapshot and every cart mutation.
pub struct CartManager<T> {
    api: ApiClient<T>,
    snapshot: watch::Sender<CartSnapshot>,
    notices: NotificationCenter,
    checkout_url: String,
}

impl<T: Transport> CartManager<T> {
    #[must_use]
    pub fn new(
        api: ApiClient<T>,
        notices: NotificationCenter,
        checkout_url: impl Into<String>,
    ) -> Self {
        let (snapshot, _) = watch::channel(CartSnapshot::default());
        Self {
            api,
            snapshot,
            notices,
            checkout_url: checkout_url.into(),
        }
    }

    /// The last snapshot received from the server.
    #[must_use]
    pub fn current(&self) -> CartSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Observe snapshot replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot.subscribe()
    }

    /// Fetch the cart and replace the local snapshot.
    ///
    /// A failed fetch keeps the previous snapshot and is only logged.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the fetch fails.
    #[instrument(skip(self))]
    pub async fn load_cart(&self) -> Result<CartSnapshot, ApiError> {
        match self.api.get_cart().await {
            Ok(snapshot) => {
                debug!(lines = snapshot.items.len(), count = snapshot.count, "Cart loaded");
                self.snapshot.send_replace(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cart");
                Err(e)
            }
        }
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the server refuses or the call fails.
    #[instrument(skip(self), fields(product_id = %item.product_id))]
    pub async fn add_to_cart(&self, item: AddToCart) -> Result<(), ApiError> {
        let result = self.api.add_to_cart(item).await;
        self.settle(result, Some(ITEM_ADDED)).await
    }

    /// Set a line's quantity. Zero is sent as is; the server decides what it
    /// means.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the server refuses or the call fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, cart_id: CartLineId, quantity: u32) -> Result<(), ApiError> {
        let result = self.api.update_cart_item(cart_id, quantity).await;
        self.settle(result, None).await
    }

    /// Raise a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the line is not in the snapshot or the update
    /// fails.
    pub async fn increment(&self, cart_id: CartLineId) -> Result<(), ApiError> {
        let quantity = self.displayed_quantity(cart_id)?;
        self.update_quantity(cart_id, quantity.saturating_add(1)).await
    }

    /// Lower a line's quantity by one. A single unit goes down to zero.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the line is not in the snapshot or the update
    /// fails.
    pub async fn decrement(&self, cart_id: CartLineId) -> Result<(), ApiError> {
        let quantity = self.displayed_quantity(cart_id)?;
        self.update_quantity(cart_id, quantity.saturating_sub(1)).await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the server refuses or the call fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, cart_id: CartLineId) -> Result<(), ApiError> {
        let result = self.api.remove_from_cart(cart_id).await;
        self.settle(result, Some(ITEM_REMOVED)).await
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the server refuses or the call fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        let result = self.api.clear_cart().await;
        self.settle(result, Some(CART_CLEARED)).await
    }

    /// Ask the server for the unit count without touching the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails.
    pub async fn cart_count(&self) -> Result<u32, ApiError> {
        self.api.cart_count().await.inspect_err(|e| {
            warn!(error = %e, "Failed to fetch cart count");
        })
    }

    /// Local checkout guard. Makes no request.
    ///
    /// An empty cart is refused before the session is looked at.
    ///
    /// # Errors
    ///
    /// Returns the refusal, after publishing it as an error notice.
    pub fn checkout(&self, session: &SessionState) -> Result<CheckoutHandoff, CheckoutRefusal> {
        let snapshot = self.snapshot.borrow();

        let refusal = if snapshot.is_empty() {
            Some(CheckoutRefusal::EmptyCart)
        } else if !session.is_authenticated() {
            Some(CheckoutRefusal::NotLoggedIn)
        } else {
            None
        };

        if let Some(refusal) = refusal {
            self.notices.error(refusal.to_string());
            return Err(refusal);
        }

        Ok(CheckoutHandoff {
            url: self.checkout_url.clone(),
            count: snapshot.count,
            total: Price::usd(snapshot.total),
        })
    }

    fn displayed_quantity(&self, cart_id: CartLineId) -> Result<u32, ApiError> {
        self.snapshot
            .borrow()
            .line(cart_id)
            .map(|line| line.quantity)
            .ok_or_else(|| {
                self.notices.error(ITEM_NOT_IN_CART);
                ApiError::Declared(ITEM_NOT_IN_CART.to_string())
            })
    }

    /// Reload after a successful mutation, or publish the failure.
    async fn settle(
        &self,
        result: Result<(), ApiError>,
        success: Option<&'static str>,
    ) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                // A failed reload is logged by `load_cart`; the mutation itself
                // went through.
                let _ = self.load_cart().await;
                if let Some(message) = success {
                    self.notices.success(message);
                }
                Ok(())
            }
            Err(e) => {
                self.notices.error(e.message());
                Err(e)
            }
        }
    }
}
