//! Cart state manager against server-held carts.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use threadline_core::{CartLineId, CartSnapshot, ProductId};
use threadline_integration_tests::MockShop;
use threadline_storefront::cart::{ITEM_ADDED, ITEM_REMOVED};
use threadline_storefront::render::Render;
use threadline_storefront::views::{CartBadge, CartView, SessionView};
use threadline_storefront::{
    AddToCart, CheckoutRefusal, Credentials, EventOutcome, Storefront, UiEvent,
};

use common::{SHOPPER_EMAIL, SHOPPER_PASSWORD, notice_messages, storefront};

async fn server_snapshot(shop: &MockShop) -> CartSnapshot {
    serde_json::from_value(shop.current_cart().await).unwrap()
}

fn only_line(store: &Storefront) -> CartLineId {
    let cart = store.cart().current();
    assert_eq!(cart.items.len(), 1);
    cart.items.first().unwrap().id
}

#[tokio::test]
async fn test_mutations_mirror_server_cart() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    let cart = store.cart();

    cart.add_to_cart(AddToCart::new(ProductId::new(2)).quantity(2).size("M"))
        .await
        .unwrap();
    assert_eq!(cart.current(), server_snapshot(&shop).await);
    assert_eq!(cart.current().count, 2);
    assert_eq!(cart.current().total_price().display(), "$98.00");

    let line = only_line(&store);
    cart.update_quantity(line, 5).await.unwrap();
    assert_eq!(cart.current(), server_snapshot(&shop).await);
    assert_eq!(cart.current().count, 5);

    cart.remove_item(line).await.unwrap();
    assert!(cart.current().is_empty());
    assert_eq!(cart.current(), server_snapshot(&shop).await);

    assert_eq!(notice_messages(&store), vec![ITEM_ADDED, ITEM_REMOVED]);
}

#[tokio::test]
async fn test_increment_and_decrement_to_zero() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    let cart = store.cart();

    cart.add_to_cart(AddToCart::new(ProductId::new(1)))
        .await
        .unwrap();
    let line = only_line(&store);

    cart.increment(line).await.unwrap();
    assert_eq!(cart.current().line(line).unwrap().quantity, 2);

    cart.decrement(line).await.unwrap();
    cart.decrement(line).await.unwrap();

    // The last decrement sent quantity 0 and the server dropped the line.
    let last_update = shop
        .requests()
        .await
        .into_iter()
        .rev()
        .find(|r| r.action == "update")
        .unwrap();
    assert_eq!(last_update.body["quantity"], 0);
    assert!(cart.current().is_empty());
    assert_eq!(store.cart_view().to_string(), "Your cart is empty");
}

#[tokio::test]
async fn test_failures_leave_snapshot_untouched() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    let cart = store.cart();

    cart.add_to_cart(AddToCart::new(ProductId::new(3)))
        .await
        .unwrap();
    let before = cart.current();
    let notices_before = notice_messages(&store).len();

    cart.add_to_cart(AddToCart::new(ProductId::new(999)))
        .await
        .unwrap_err();
    assert_eq!(cart.current(), before);
    assert_eq!(notice_messages(&store).len(), notices_before + 1);
    assert_eq!(notice_messages(&store).last().unwrap(), "Product not found");

    cart.remove_item(CartLineId::new(12345)).await.unwrap_err();
    assert_eq!(cart.current(), before);
    assert_eq!(notice_messages(&store).last().unwrap(), "Cart item not found");

    shop.set_garbled(true).await;
    cart.clear_cart().await.unwrap_err();
    assert_eq!(cart.current(), before);
    assert_eq!(notice_messages(&store).last().unwrap(), "Network error");
    assert_eq!(notice_messages(&store).len(), notices_before + 3);
}

#[tokio::test]
async fn test_clear_and_count() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    let cart = store.cart();

    cart.add_to_cart(AddToCart::new(ProductId::new(1)).quantity(2))
        .await
        .unwrap();
    cart.add_to_cart(AddToCart::new(ProductId::new(3)))
        .await
        .unwrap();
    assert_eq!(cart.cart_count().await.unwrap(), 3);
    assert_eq!(store.cart_badge(), CartBadge { count: 3, visible: true });

    cart.clear_cart().await.unwrap();
    assert!(cart.current().is_empty());
    assert!(!store.cart_badge().visible);
}

#[tokio::test]
async fn test_checkout_guards() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);

    // Empty cart: refused locally, nothing sent.
    assert_eq!(
        store.dispatch(UiEvent::Checkout).await,
        EventOutcome::CheckoutRefused(CheckoutRefusal::EmptyCart)
    );
    assert!(shop.requests().await.is_empty());

    store
        .dispatch(UiEvent::AddToCart(AddToCart::new(ProductId::new(2))))
        .await;
    assert_eq!(
        store.dispatch(UiEvent::Checkout).await,
        EventOutcome::CheckoutRefused(CheckoutRefusal::NotLoggedIn)
    );

    store
        .dispatch(UiEvent::Login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD)))
        .await;
    let sent = shop.requests().await.len();
    match store.dispatch(UiEvent::Checkout).await {
        EventOutcome::CheckoutReady(handoff) => {
            assert_eq!(handoff.url, "/checkout.php");
            assert_eq!(handoff.count, 1);
            assert_eq!(handoff.total.display(), "$49.00");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(shop.requests().await.len(), sent);

    assert_eq!(
        notice_messages(&store),
        vec![
            "Your cart is empty!",
            ITEM_ADDED,
            "Please login to checkout!",
            "Login successful!",
        ]
    );
}

#[derive(Clone, Default)]
struct BadgeRecorder {
    counts: Arc<Mutex<Vec<u32>>>,
}

impl Render for BadgeRecorder {
    fn render_cart(&mut self, _cart: &CartView, badge: CartBadge) {
        self.counts.lock().unwrap().push(badge.count);
    }

    fn render_session(&mut self, _session: &SessionView) {}
}

#[tokio::test]
async fn test_renderer_follows_cart_changes() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    let recorder = BadgeRecorder::default();
    let handle = store.spawn_renderer(recorder.clone());

    store
        .dispatch(UiEvent::AddToCart(AddToCart::new(ProductId::new(1)).quantity(4)))
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let counts = recorder.counts.lock().unwrap().clone();
    assert_eq!(counts.first(), Some(&0));
    assert_eq!(counts.last(), Some(&4));
    handle.abort();
}
