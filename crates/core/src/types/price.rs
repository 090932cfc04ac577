//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront API reports amounts as decimal strings or numbers in US
//! dollars. They are kept as [`Decimal`] end to end; the client never
//! recomputes server totals, it only formats them.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Symbol prefixed to every displayed amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// A price in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Amount in dollars, not cents.
    pub amount: Decimal,
}

impl Price {
    /// Create a price from a dollar amount.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self { amount }
    }

    /// The price a shopper actually pays for one unit.
    ///
    /// A present, non-zero sale price overrides the list price for that line
    /// only; there is no store-wide discount.
    #[must_use]
    pub fn effective(list: Decimal, sale: Option<Decimal>) -> Self {
        let amount = sale.filter(|s| !s.is_zero()).unwrap_or(list);
        Self::usd(amount)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{:.2}", self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::usd(Decimal::new(49, 0)).display(), "$49.00");
        assert_eq!(Price::usd(Decimal::new(1999, 2)).display(), "$19.99");
        assert_eq!(Price::usd(Decimal::new(5, 1)).to_string(), "$0.50");
    }

    #[test]
    fn test_effective_prefers_sale_price() {
        let list = Decimal::new(5900, 2);
        let sale = Decimal::new(4900, 2);
        assert_eq!(Price::effective(list, Some(sale)).amount, sale);
        assert_eq!(Price::effective(list, None).amount, list);
    }

    #[test]
    fn test_effective_ignores_zero_sale_price() {
        let list = Decimal::new(1500, 2);
        assert_eq!(Price::effective(list, Some(Decimal::ZERO)).amount, list);
    }
}
