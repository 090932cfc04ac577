//! Shared helpers for storefront integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::time::Duration;

use threadline_integration_tests::MockShop;
use threadline_storefront::Storefront;

pub const SHOPPER_EMAIL: &str = "ada@example.com";
pub const SHOPPER_PASSWORD: &str = "correct horse";

/// A storefront client talking to `shop`, with notices that outlive the test.
pub fn storefront(shop: &MockShop) -> Storefront {
    let mut config = shop.config();
    config.notification_ttl = Duration::from_secs(60);
    Storefront::connect(config).unwrap()
}

/// Messages of the currently visible notices, oldest first.
pub fn notice_messages(store: &Storefront) -> Vec<String> {
    store
        .notices()
        .active()
        .into_iter()
        .map(|n| n.message)
        .collect()
}
