//! Terminal output.

#![allow(clippy::print_stdout)]

use std::collections::HashSet;

use uuid::Uuid;

use threadline_core::Product;
use threadline_storefront::Notice;
use threadline_storefront::render::Render;
use threadline_storefront::views::{CartBadge, CartView, ProductCard, SessionView};

pub fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for product in products {
        println!("{}", ProductCard::from_product(product));
    }
}

pub fn print_product_detail(product: &Product) {
    let card = ProductCard::from_product(product);
    println!("{card}");
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    if let Some(image) = &card.image {
        println!("Image: {image}");
    }
}

pub fn print_cart(cart: &CartView) {
    println!("{cart}");
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("{notice}");
    }
}

/// Prints state changes as they happen during a shell session.
///
/// Each notice is printed once, when it first appears.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    seen: HashSet<Uuid>,
    badge: Option<CartBadge>,
    heading: Option<String>,
}

impl Render for TerminalRenderer {
    fn render_cart(&mut self, _cart: &CartView, badge: CartBadge) {
        if self.badge.replace(badge).is_some_and(|old| old != badge) {
            if badge.visible {
                println!("cart: {} item(s)", badge.count);
            } else {
                println!("cart: empty");
            }
        }
    }

    fn render_session(&mut self, session: &SessionView) {
        let heading = session.heading().to_string();
        if self.heading.as_ref().is_some_and(|old| *old != heading) {
            println!("{session}");
        }
        self.heading = Some(heading);
    }

    fn render_notices(&mut self, notices: &[Notice]) {
        for notice in notices {
            if self.seen.insert(notice.id) {
                println!("{notice}");
            }
        }
        // Forget expired notices.
        self.seen.retain(|id| notices.iter().any(|n| n.id == *id));
    }
}
