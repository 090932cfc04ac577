//! Threadline Core - Shared domain types.
//!
//! This crate provides the types shared by every Threadline component:
//! - `storefront` - Client library that mirrors server-held cart and session state
//! - `cli` - Command-line front end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Everything here describes data exactly as the remote
//! storefront API reports it.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, prices, cart and catalog records, star ratings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
