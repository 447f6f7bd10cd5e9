//! Mobile Shop storefront library.
//!
//! The client side of the shop: a persisted cart, the product catalog with
//! its offline fallback, askama rendering, order submission, and the
//! notification and session helpers around them. [`state::AppState`] wires
//! them together for one session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
mod filters;
pub mod notify;
pub mod render;
pub mod session;
pub mod state;
pub mod storage;
