//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers and wire models for the
//! storefront domain.

pub mod cart;
pub mod id;
pub mod product;
pub mod query;
pub mod user;

pub use cart::{CartItem, CartSnapshot, MAX_ITEM_QUANTITY};
pub use id::*;
pub use product::{Product, ProductDetail, ProductPage};
pub use query::{ProductQuery, SortField, SortOrder};
pub use user::{AccessToken, User};
