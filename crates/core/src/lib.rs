//! Vitrine Core - Shared domain types.
//!
//! This crate provides the types shared by all Vitrine components:
//! - `client` - State managers and the remote gateway
//! - `cli` - Command-line storefront frontend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. Everything here mirrors the storefront API's wire
//! shapes, so the gateway can decode responses straight into these
//! structs and the state managers can persist them unchanged.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, catalog/cart/auth models, and query parameters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
