//! `cart` and `checkout` subcommands.

#![allow(clippy::print_stdout)]

use threadline_core::{CartLineId, ProductId};
use threadline_storefront::{AddToCart, Storefront};

use super::{CliError, output};
use crate::CartAction;

pub async fn run(store: &Storefront, action: CartAction) -> Result<(), CliError> {
    let cart = store.cart();

    match action {
        CartAction::Show => {
            cart.load_cart().await?;
        }
        CartAction::Add {
            product_id,
            quantity,
            size,
            color,
        } => {
            let item = AddToCart::new(ProductId::new(product_id))
                .quantity(quantity)
                .size(size)
                .color(color);
            cart.add_to_cart(item).await?;
        }
        CartAction::Update { cart_id, quantity } => {
            cart.update_quantity(CartLineId::new(cart_id), quantity)
                .await?;
        }
        CartAction::Inc { cart_id } => {
            ensure_loaded(store).await;
            cart.increment(CartLineId::new(cart_id)).await?;
        }
        CartAction::Dec { cart_id } => {
            ensure_loaded(store).await;
            cart.decrement(CartLineId::new(cart_id)).await?;
        }
        CartAction::Remove { cart_id } => cart.remove_item(CartLineId::new(cart_id)).await?,
        CartAction::Clear => cart.clear_cart().await?,
        CartAction::Count => {
            println!("{}", cart.cart_count().await?);
            return Ok(());
        }
    }

    output::print_cart(&store.cart_view());
    Ok(())
}

/// Load the cart once so line quantities are known.
async fn ensure_loaded(store: &Storefront) {
    if store.cart().current().is_empty() {
        // A failed load leaves the snapshot empty and the line lookup fails.
        let _ = store.cart().load_cart().await;
    }
}

pub async fn checkout(store: &Storefront) -> Result<(), CliError> {
    store.session().bootstrap().await;
    ensure_loaded(store).await;

    let handoff = store.cart().checkout(&store.session().current())?;
    println!(
        "Ready to check out {} item(s), {} total",
        handoff.count, handoff.total
    );
    println!("Continue at: {}", handoff.url);
    Ok(())
}
