//! Integration test support for Threadline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a [`MockShop`]: an
//! in-process storefront API bound to an ephemeral port that keeps users,
//! sessions and carts in memory and records every request it receives.
//!
//! # Test Categories
//!
//! - `remote_access` - Envelope handling, headers and transport faults
//! - `session_flow` - Login, registration, logout and bootstrap
//! - `cart_sync` - Cart mutations against server-held state

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

mod mock_shop;

pub use mock_shop::{CapturedRequest, MockShop, SESSION_COOKIE};
