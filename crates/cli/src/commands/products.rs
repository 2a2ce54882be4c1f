//! Catalog browsing commands.

use clap::ValueEnum;
use rust_decimal::Decimal;

use vitrine_client::browse::CatalogBrowser;
use vitrine_client::gateway::CatalogApi;
use vitrine_core::{ProductId, ProductQuery, SortField, SortOrder};

use crate::app::App;
use crate::commands::format_price;

/// CLI-facing mirror of [`SortField`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortByArg {
    Id,
    Name,
    Price,
}

/// CLI-facing mirror of [`SortOrder`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

// clap renders defaults through Display and parses them back, so these
// must match the value-enum names.
impl std::fmt::Display for SortByArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::Name => write!(f, "name"),
            Self::Price => write!(f, "price"),
        }
    }
}

impl std::fmt::Display for SortOrderArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl From<SortByArg> for SortField {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Id => Self::Id,
            SortByArg::Name => Self::Name,
            SortByArg::Price => Self::Price,
        }
    }
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => Self::Asc,
            SortOrderArg::Desc => Self::Desc,
        }
    }
}

#[allow(clippy::too_many_arguments)] // one flag per query field
pub async fn list(
    app: &App,
    category: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    search: Option<String>,
    sort_by: SortByArg,
    sort_order: SortOrderArg,
    limit: u32,
    offset: u64,
) {
    let query = ProductQuery {
        category,
        min_price,
        max_price,
        search,
        sort_by: sort_by.into(),
        sort_order: sort_order.into(),
        limit,
        offset,
    };
    let mut browser = CatalogBrowser::with_query(query);
    run_listing(app, &mut browser).await;
}

pub async fn search(app: &App, text: &str, limit: u32, offset: u64) {
    let mut query = ProductQuery::searching(text);
    query.limit = limit;
    query.offset = offset;

    let mut browser = CatalogBrowser::with_query(query);
    run_listing(app, &mut browser).await;
}

async fn run_listing(app: &App, browser: &mut CatalogBrowser) {
    let fresh = browser.refresh(&app.gateway).await;
    if !fresh {
        println!("Catalog unavailable right now, try again later.");
        return;
    }

    let Some(page) = browser.page() else {
        return;
    };

    if page.results.is_empty() {
        println!("No products found. Adjust filters or search.");
        return;
    }

    let offset = browser.query().offset;
    println!(
        "Products {}-{} of {}",
        offset + 1,
        offset + page.results.len() as u64,
        page.count
    );
    for product in &page.results {
        let marker = if app.compare.has(product.id) { "*" } else { " " };
        println!(
            "{marker} [{}] {:<40} {:>12}  {}",
            product.id,
            product.name,
            format_price(product.price),
            product.category
        );
    }
    if page.next.is_some() {
        println!(
            "More available: --offset {}",
            offset + u64::from(browser.query().limit)
        );
    }
}

pub async fn show(app: &App, id: i64) {
    match app.gateway.get_product(ProductId::new(id)).await {
        Ok(detail) => {
            let product = &detail.product;
            println!("[{}] {}", product.id, product.name);
            println!("Category: {}", product.category);
            println!("Price:    {}", format_price(product.price));
            if let Some(image) = &product.image {
                println!("Image:    {image}");
            }
            if let Some(description) = &detail.description {
                println!("\n{description}");
            }
        }
        Err(error) => {
            tracing::debug!(%error, product_id = id, "product fetch failed");
            println!("Product {id} is not available.");
        }
    }
}
