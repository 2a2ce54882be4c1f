//! Client-side state managers.
//!
//! Each store exclusively owns one slice of state, persists a snapshot
//! after every successful mutation, and reloads it eagerly at
//! construction. Views never mutate store state directly; they request
//! mutations through the operations defined here.

pub mod auth;
pub mod cart;
pub mod compare;

pub use auth::{AuthState, AuthStore};
pub use cart::CartStore;
pub use compare::{CompareStore, MAX_COMPARE_ITEMS, ToggleOutcome};
