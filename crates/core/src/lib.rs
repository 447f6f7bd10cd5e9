//! Mobile Shop Core - Shared domain types.
//!
//! This crate provides the types used across all Mobile Shop components:
//! - `storefront` - Cart, catalog, rendering and checkout for the shop client
//! - `cli` - The `mshop` terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, cart lines, users and navigation targets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
