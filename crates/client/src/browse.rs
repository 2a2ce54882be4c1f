//! Catalog browsing state with stale-response protection.
//!
//! Query parameters change faster than requests complete (typing into
//! search, flipping filters), so every fetch is stamped with a ticket
//! from a monotonically increasing sequence. A completion whose ticket
//! has been superseded is discarded rather than applied: stale results
//! must never overwrite state gathered for a newer query.

use vitrine_core::{Product, ProductPage, ProductQuery, SortField, SortOrder};

use crate::gateway::CatalogApi;

/// Stamp for one in-flight catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Catalog listing state: the current query and the latest page of
/// results that is still valid for it.
#[derive(Debug, Default)]
pub struct CatalogBrowser {
    query: ProductQuery,
    page: Option<ProductPage>,
    seq: u64,
}

impl CatalogBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit query (e.g. parsed from CLI flags).
    #[must_use]
    pub fn with_query(query: ProductQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// The query the next fetch will run.
    #[must_use]
    pub const fn query(&self) -> &ProductQuery {
        &self.query
    }

    /// The latest applied page, if any fetch has completed.
    #[must_use]
    pub const fn page(&self) -> Option<&ProductPage> {
        self.page.as_ref()
    }

    /// Products of the latest applied page.
    #[must_use]
    pub fn results(&self) -> &[Product] {
        self.page.as_ref().map_or(&[], |p| &p.results)
    }

    // Query mutators. Filter and search changes jump back to the first
    // page; only explicit paging keeps the offset.

    pub fn set_search(&mut self, search: Option<String>) {
        self.query.search = search.filter(|s| !s.is_empty());
        self.query.offset = 0;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.query.category = category.filter(|c| !c.is_empty());
        self.query.offset = 0;
    }

    pub fn set_price_bounds(
        &mut self,
        min_price: Option<rust_decimal::Decimal>,
        max_price: Option<rust_decimal::Decimal>,
    ) {
        self.query.min_price = min_price;
        self.query.max_price = max_price;
        self.query.offset = 0;
    }

    pub fn set_sort(&mut self, sort_by: SortField, sort_order: SortOrder) {
        self.query.sort_by = sort_by;
        self.query.sort_order = sort_order;
        self.query.offset = 0;
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.query.offset = offset;
    }

    /// Stamp a new request, superseding every ticket issued before.
    pub fn begin(&mut self) -> QueryTicket {
        self.seq += 1;
        QueryTicket(self.seq)
    }

    /// Whether `ticket` still belongs to the newest request.
    #[must_use]
    pub const fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.seq
    }

    /// Install a completed fetch. Returns `false` (discarding `page`)
    /// when the ticket was superseded by a newer request.
    pub fn apply(&mut self, ticket: QueryTicket, page: ProductPage) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                current = self.seq,
                "discarding stale catalog response"
            );
            return false;
        }
        self.page = Some(page);
        true
    }

    /// Run one fetch for the current query. On failure an empty page is
    /// installed (the view renders "no results", never an error state).
    /// Returns whether fresh server results were installed.
    pub async fn refresh<G: CatalogApi>(&mut self, gateway: &G) -> bool {
        let ticket = self.begin();
        let query = self.query.clone();

        match gateway.list_products(&query).await {
            Ok(page) => self.apply(ticket, page),
            Err(error) => {
                tracing::warn!(%error, "catalog fetch failed");
                self.apply(ticket, ProductPage::empty());
                false
            }
        }
    }
}
