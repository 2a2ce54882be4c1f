//! Cart commands.
//!
//! Mutations follow the store's optimistic protocol; this module only
//! decides what to print for each outcome. Mutations are gated on an
//! authenticated session.

use vitrine_client::gateway::CatalogApi;
use vitrine_core::{CartItemId, ProductId};

use crate::app::App;
use crate::commands::format_price;

const LOGIN_HINT: &str = "Log in first: vitrine auth login <email> --password <password>";

fn print_cart(app: &App) {
    if app.cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in app.cart.items() {
        println!(
            "[{}] {:<40} {} x {:>3} = {:>12}",
            item.id,
            item.product_name,
            format_price(item.product_price),
            item.quantity,
            format_price(item.subtotal)
        );
    }
    println!("{:>76}", format!("Total: {}", format_price(app.cart.total())));
}

/// Reconcile with the server, then render. A failed fetch falls back to
/// the persisted snapshot.
pub async fn show(app: &mut App) {
    app.cart.sync(&app.gateway).await;
    print_cart(app);
}

pub async fn add(app: &mut App, product_id: i64, quantity: u32) {
    if !app.require_login().await {
        println!("{LOGIN_HINT}");
        return;
    }

    // Snapshot the product first; the cart denormalizes it at add-time.
    let detail = match app.gateway.get_product(ProductId::new(product_id)).await {
        Ok(detail) => detail,
        Err(error) => {
            tracing::debug!(%error, product_id, "product fetch failed");
            println!("Product {product_id} is not available.");
            return;
        }
    };

    if app.cart.add(&app.gateway, &detail.product, quantity).await {
        println!("Added to cart: {} x {}", detail.product.name, quantity);
        println!("Cart total: {}", format_price(app.cart.total()));
    } else {
        println!("Could not add to cart; nothing was changed.");
    }
}

pub async fn set_quantity(app: &mut App, item_id: i64, quantity: u32) {
    if !app.require_login().await {
        println!("{LOGIN_HINT}");
        return;
    }

    let item_id = CartItemId::new(item_id);
    if app.cart.item(item_id).is_none() {
        println!("No cart line with id {item_id}.");
        return;
    }

    if app.cart.set_quantity(&app.gateway, item_id, quantity).await {
        println!("Quantity updated.");
        print_cart(app);
    } else {
        println!("Could not update quantity; the cart was restored.");
    }
}

pub async fn remove(app: &mut App, item_id: i64) {
    if !app.require_login().await {
        println!("{LOGIN_HINT}");
        return;
    }

    let item_id = CartItemId::new(item_id);
    if app.cart.item(item_id).is_none() {
        println!("No cart line with id {item_id}.");
        return;
    }

    if app.cart.remove(&app.gateway, item_id).await {
        println!("Removed from cart.");
        print_cart(app);
    } else {
        println!("Could not remove the line; the cart was restored.");
    }
}
