//! Catalog records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;
use super::rating::StarStrip;
use super::wire::{blank_as_none, optional_number};

/// Rating shown for products that have no reviews yet.
pub const DEFAULT_RATING: f64 = 4.0;

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Primary image URL.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    /// List price.
    pub price: Decimal,
    /// Sale price, when discounted.
    #[serde(default, deserialize_with = "optional_number")]
    pub sale_price: Option<Decimal>,
    /// Average review rating (0-5).
    #[serde(default, deserialize_with = "optional_number")]
    pub avg_rating: Option<f64>,
    /// Plain text description.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    /// Category the product is listed under.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl Product {
    /// Per-unit price shown to the shopper.
    #[must_use]
    pub fn display_price(&self) -> Price {
        Price::effective(self.price, self.sale_price)
    }

    /// Whether a sale price overrides the list price.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.sale_price.is_some_and(|s| !s.is_zero())
    }

    /// Star strip for the product's rating, falling back to [`DEFAULT_RATING`].
    #[must_use]
    pub fn stars(&self) -> StarStrip {
        StarStrip::from_rating(self.avg_rating.unwrap_or(DEFAULT_RATING))
    }
}
