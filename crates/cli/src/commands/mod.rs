//! Command implementations, one module per subcommand group.

pub mod auth;
pub mod cart;
pub mod compare;
pub mod products;

use rust_decimal::Decimal;

/// Render a price for display.
pub fn format_price(price: Decimal) -> String {
    format!("{price:.2}")
}
