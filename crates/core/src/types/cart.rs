//! Cart records as reported by the storefront API.
//!
//! A [`CartSnapshot`] is always the server's view, stored verbatim. Nothing in
//! this module adds up quantities or prices; `count` and `total` come from the
//! server so that server-side discounts never drift from what is displayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartLineId, ProductId};
use super::price::Price;
use super::wire::{blank_as_none, number_or_string, optional_number};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier (the API's `cart_id`).
    pub id: CartLineId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at the time of the fetch.
    #[serde(default)]
    pub name: String,
    /// Product image URL.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    /// Units of the product; the server never reports zero.
    #[serde(deserialize_with = "number_or_string")]
    pub quantity: u32,
    /// List price per unit.
    pub price: Decimal,
    /// Sale price per unit, when the product is discounted.
    #[serde(default, deserialize_with = "optional_number")]
    pub sale_price: Option<Decimal>,
    /// Selected size variant.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<String>,
    /// Selected color variant.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub color: Option<String>,
}

impl CartLine {
    /// Per-unit price shown to the shopper (sale price wins when present).
    #[must_use]
    pub fn display_price(&self) -> Price {
        Price::effective(self.price, self.sale_price)
    }

    /// Variant attributes joined for display, e.g. `"M / Navy"`.
    #[must_use]
    pub fn variant_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.size.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" / "))
        }
    }
}

/// Authoritative copy of the server-held cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines in server order.
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Total units, as computed by the server.
    #[serde(default, deserialize_with = "number_or_string")]
    pub count: u32,
    /// Cart total, as computed by the server.
    #[serde(default)]
    pub total: Decimal,
}

impl CartSnapshot {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by its identifier.
    #[must_use]
    pub fn line(&self, id: CartLineId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Cart total formatted for display.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total)
    }
}
