//! Comparison set commands.
//!
//! The compare store is purely local; only `show` and the product
//! lookups touch the network.

use vitrine_client::gateway::CatalogApi;
use vitrine_client::store::{MAX_COMPARE_ITEMS, ToggleOutcome};
use vitrine_core::{Product, ProductDetail, ProductId};

use crate::app::App;
use crate::commands::format_price;

/// Fetch the product snapshot the store keeps for a member.
async fn fetch_product(app: &App, product_id: i64) -> Option<Product> {
    match app.gateway.get_product(ProductId::new(product_id)).await {
        Ok(detail) => Some(detail.product),
        Err(error) => {
            tracing::debug!(%error, product_id, "product fetch failed");
            println!("Product {product_id} is not available.");
            None
        }
    }
}

pub async fn add(app: &mut App, product_id: i64) {
    let Some(product) = fetch_product(app, product_id).await else {
        return;
    };

    if app.compare.add(product.clone()) {
        println!(
            "Comparing {} ({} of {MAX_COMPARE_ITEMS}).",
            product.name,
            app.compare.len()
        );
    } else if app.compare.has(product.id) {
        println!("{} is already in the comparison.", product.name);
    } else {
        println!("The comparison already holds {MAX_COMPARE_ITEMS} products.");
    }
}

pub fn remove(app: &mut App, product_id: i64) {
    app.compare.remove(ProductId::new(product_id));
    println!("Comparison now holds {} product(s).", app.compare.len());
}

pub async fn toggle(app: &mut App, product_id: i64) {
    let Some(product) = fetch_product(app, product_id).await else {
        return;
    };

    match app.compare.toggle(&product) {
        ToggleOutcome::Added => println!(
            "Comparing {} ({} of {MAX_COMPARE_ITEMS}).",
            product.name,
            app.compare.len()
        ),
        ToggleOutcome::Removed => println!("Removed {} from the comparison.", product.name),
        ToggleOutcome::Full => {
            println!("The comparison already holds {MAX_COMPARE_ITEMS} products.");
        }
    }
}

pub fn clear(app: &mut App) {
    app.compare.clear();
    println!("Comparison cleared.");
}

/// Render the members side by side, with descriptions fetched fresh.
/// A failed fetch falls back to the snapshot the store already holds.
pub async fn show(app: &App) {
    if app.compare.is_empty() {
        println!("No products in the comparison yet.");
        println!("Add some with: vitrine compare add <product-id> (up to {MAX_COMPARE_ITEMS}).");
        return;
    }

    let mut details: Vec<ProductDetail> = Vec::with_capacity(app.compare.len());
    for product in app.compare.items() {
        match app.gateway.get_product(product.id).await {
            Ok(detail) => details.push(detail),
            Err(error) => {
                tracing::debug!(%error, product_id = %product.id, "detail fetch failed");
                details.push(ProductDetail::from(product.clone()));
            }
        }
    }

    for detail in &details {
        let product = &detail.product;
        println!("[{}] {}", product.id, product.name);
        println!("    Category: {}", product.category);
        println!("    Price:    {}", format_price(product.price));
        match &detail.description {
            Some(description) => println!("    {description}"),
            None => println!("    (no description)"),
        }
        println!();
    }
}
