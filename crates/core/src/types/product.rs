//! Catalog product models.
//!
//! Products are server-owned and read-only on the client: fetched on
//! demand, never mutated locally, cached only transiently in view state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product as it appears in catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Optional image reference (URL or path).
    pub image: Option<String>,
    /// Category label.
    pub category: String,
}

/// A product with its long-form description, as returned by the
/// single-product endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Listing fields, flattened into the same JSON object on the wire.
    #[serde(flatten)]
    pub product: Product,
    /// Optional long-form description.
    pub description: Option<String>,
}

impl From<Product> for ProductDetail {
    /// A listing entry viewed as a detail without a description. Used when
    /// the detail fetch fails and the view falls back to the snapshot it
    /// already holds.
    fn from(product: Product) -> Self {
        Self {
            product,
            description: None,
        }
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Total number of products matching the query, across all pages.
    pub count: u64,
    /// Opaque link to the next page, if any.
    pub next: Option<String>,
    /// Opaque link to the previous page, if any.
    pub previous: Option<String>,
    /// Products on this page.
    pub results: Vec<Product>,
}

impl ProductPage {
    /// An empty result page, used as the fallback when a catalog fetch
    /// fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}
