//! Core types for Mobile Shop.
//!
//! This module provides type-safe wrappers for the shop's domain concepts.

pub mod id;
pub mod navigation;
pub mod price;
pub mod product;
pub mod user;

pub use id::*;
pub use navigation::Navigation;
pub use price::{Price, PriceError};
pub use product::{CartLine, Product};
pub use user::User;
