//! Core types for Threadline.
//!
//! Wire records (`CartSnapshot`, `Product`, `Identity`) deserialize directly
//! from the storefront API's JSON payloads.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;
pub mod user;
pub mod wire;

pub use cart::{CartLine, CartSnapshot};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price};
pub use product::{DEFAULT_RATING, Product};
pub use rating::{MAX_STARS, StarIcon, StarStrip};
pub use user::Identity;
