//! Vitrine Client - storefront gateway and client-side state.
//!
//! # Architecture
//!
//! The storefront server owns all durable state (catalog, carts,
//! accounts). This crate is the client half of the contract:
//!
//! - [`gateway`] - typed request functions for the products, cart, and
//!   auth endpoints; attaches the session identity and, when present,
//!   the bearer credential to every request. No business logic, no
//!   retries, no caching.
//! - [`store`] - the state managers. The cart store applies optimistic
//!   mutations immediately, then reconciles against the server's
//!   authoritative response or rolls back exactly the mutation it
//!   applied. The compare store is a bounded local set. The auth store
//!   owns the identity lifecycle.
//! - [`browse`] - catalog query state with a request-sequence guard so
//!   a stale response can never overwrite results for a newer query.
//! - [`persist`] - key-value persistence of state snapshots across
//!   restarts.
//!
//! # Concurrency
//!
//! Stores are plain `&mut self` containers meant to be driven from a
//! single task: every local mutation is synchronous and atomic, and the
//! only suspension points are gateway awaits. Request completion order
//! is not guaranteed to match issuance order; the cart resolves such
//! races by always trusting the most recent authoritative replacement.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_client::{config::ClientConfig, gateway::HttpGateway};
//! use vitrine_client::persist::StateStore;
//! use vitrine_client::store::CartStore;
//!
//! let config = ClientConfig::from_env()?;
//! let persist = StateStore::open(&config.state_dir)?;
//! let gateway = HttpGateway::new(&config, persist.clone());
//!
//! let mut cart = CartStore::load(persist);
//! cart.sync(&gateway).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browse;
pub mod config;
pub mod error;
pub mod gateway;
pub mod persist;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use error::GatewayError;
pub use gateway::{CatalogApi, HttpGateway};
pub use persist::StateStore;
