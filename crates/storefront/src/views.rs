//! Pure view models derived from state.
//!
//! Every view is rebuilt from scratch on each state change. Nothing here
//! holds on to state or talks to the network.

use std::fmt;

use threadline_core::{CartLine, CartLineId, CartSnapshot, Price, Product, ProductId, StarStrip};

use crate::events::UiEvent;
use crate::session::SessionState;

pub const EMPTY_CART: &str = "Your cart is empty";
pub const LOGIN_PROMPT: &str = "Login Now";

// =============================================================================
// Cart
// =============================================================================

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: CartLineId,
    pub name: String,
    pub image: Option<String>,
    pub variant: Option<String>,
    /// Per-unit price (sale price when present).
    pub price: Price,
    pub quantity: u32,
}

impl CartLineView {
    #[must_use]
    pub fn from_line(line: &CartLine) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            image: line.image.clone(),
            variant: line.variant_label(),
            price: line.display_price(),
            quantity: line.quantity,
        }
    }

    /// Events bound to this line's decrement, increment and remove controls.
    #[must_use]
    pub const fn controls(&self) -> [UiEvent; 3] {
        [
            UiEvent::Decrement(self.id),
            UiEvent::Increment(self.id),
            UiEvent::RemoveItem(self.id),
        ]
    }
}

impl fmt::Display for CartLineView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.name)?;
        if let Some(variant) = &self.variant {
            write!(f, " ({variant})")?;
        }
        write!(f, "  {} x{}", self.price, self.quantity)
    }
}

/// The cart listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Server-computed total.
    pub total: Price,
}

impl CartView {
    #[must_use]
    pub fn from_snapshot(snapshot: &CartSnapshot) -> Self {
        Self {
            lines: snapshot.items.iter().map(CartLineView::from_line).collect(),
            total: snapshot.total_price(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for CartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_CART);
        }
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "Total: {}", self.total)
    }
}

/// The cart icon badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartBadge {
    pub count: u32,
    pub visible: bool,
}

impl CartBadge {
    /// Badge for the server-reported unit count; hidden at zero.
    #[must_use]
    pub const fn from_snapshot(snapshot: &CartSnapshot) -> Self {
        Self {
            count: snapshot.count,
            visible: snapshot.count > 0,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Entries in the logged-in user menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Profile,
    Orders,
    Logout,
}

impl MenuItem {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "My Profile",
            Self::Orders => "My Orders",
            Self::Logout => "Logout",
        }
    }
}

/// The user box: a greeting with a menu, or the login prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    Greeting { heading: String, menu: Vec<MenuItem> },
    LoginPrompt { heading: &'static str },
}

impl SessionView {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        match state.identity() {
            Some(identity) => Self::Greeting {
                heading: format!("Welcome, {}!", identity.display_name()),
                menu: vec![MenuItem::Profile, MenuItem::Orders, MenuItem::Logout],
            },
            None => Self::LoginPrompt {
                heading: LOGIN_PROMPT,
            },
        }
    }

    #[must_use]
    pub fn heading(&self) -> &str {
        match self {
            Self::Greeting { heading, .. } => heading,
            Self::LoginPrompt { heading } => heading,
        }
    }
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())?;
        if let Self::Greeting { menu, .. } = self {
            let labels: Vec<&str> = menu.iter().map(|item| item.label()).collect();
            write!(f, "  [{}]", labels.join(" | "))?;
        }
        Ok(())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub price: Price,
    pub on_sale: bool,
    pub stars: StarStrip,
}

impl ProductCard {
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.display_price(),
            on_sale: product.on_sale(),
            stars: product.stars(),
        }
    }

    /// Link to the product detail page.
    #[must_use]
    pub fn detail_url(&self) -> String {
        format!("product-details.php?id={}", self.id)
    }
}

impl fmt::Display for ProductCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}  {}  {}", self.id, self.name, self.stars, self.price)?;
        if self.on_sale {
            f.write_str("  (sale)")?;
        }
        Ok(())
    }
}
