//! Threadline storefront client.
//!
//! Keeps a local mirror of server-held state (the shopper's session and
//! cart) in step with the storefront API, and derives views from it.
//!
//! # Architecture
//!
//! - [`api`] - Remote access layer; every call yields an envelope, never a
//!   transport error
//! - [`session`] - Anonymous / authenticated state with login, register and
//!   logout
//! - [`cart`] - Server-authoritative cart snapshot and mutations
//! - [`catalog`] - Stateless product listings and search
//! - [`notify`] - Transient notices that expire on their own
//! - [`views`] and [`render`] - Pure view models and the observer loop that
//!   rebuilds them on every change
//! - [`Storefront`] - Composition root that owns all of the above and
//!   dispatches [`UiEvent`]s
//!
//! State is held in `tokio::sync::watch` channels and replaced wholesale; the
//! last write wins.
//!
//! # Example
//!
//! ```rust,no_run
//! use threadline_storefront::{Storefront, StorefrontConfig, UiEvent};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Storefront::connect(StorefrontConfig::from_env()?)?;
//! store.start().await;
//! println!("{}", store.cart_view());
//! store.dispatch(UiEvent::Checkout).await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod notify;
pub mod render;
pub mod session;
pub mod state;
pub mod views;

pub use cart::{AddToCart, CheckoutHandoff, CheckoutRefusal};
pub use config::{CatalogLimits, StorefrontConfig};
pub use error::StorefrontError;
pub use events::{EventOutcome, UiEvent};
pub use notify::{Notice, NoticeKind, NotificationCenter};
pub use render::Render;
pub use session::{Credentials, Registration, SessionState};
pub use state::Storefront;
