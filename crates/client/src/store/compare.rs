//! Compare state manager: a bounded set of products for side-by-side
//! comparison.
//!
//! Purely local: no server round-trip, so no optimistic/confirmed
//! distinction and no rollback semantics. Insertion order is preserved
//! for display.

use vitrine_core::{Product, ProductId};

use crate::persist::{StateStore, keys};

/// Maximum number of products the comparison can hold.
pub const MAX_COMPARE_ITEMS: usize = 4;

/// What a [`CompareStore::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The product was absent and has been added.
    Added,
    /// The product was present and has been removed.
    Removed,
    /// The product was absent but the set is at capacity; unchanged.
    Full,
}

/// The products selected for comparison.
#[derive(Debug)]
pub struct CompareStore {
    items: Vec<Product>,
    persist: StateStore,
}

impl CompareStore {
    /// Construct the store, eagerly reloading the persisted set.
    #[must_use]
    pub fn load(persist: StateStore) -> Self {
        let items = persist.load(keys::COMPARE).unwrap_or_default();
        Self { items, persist }
    }

    /// Members in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the set is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_COMPARE_ITEMS
    }

    /// Membership predicate.
    #[must_use]
    pub fn has(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Append a product. Returns `false` (no state change) when the
    /// product is already present or the set is at capacity.
    pub fn add(&mut self, product: Product) -> bool {
        if self.has(product.id) || self.is_full() {
            return false;
        }
        self.items.push(product);
        self.save();
        true
    }

    /// Remove a product if present; no-op otherwise.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        if self.items.len() != before {
            self.save();
        }
    }

    /// Remove the product if present, otherwise attempt to add it.
    pub fn toggle(&mut self, product: &Product) -> ToggleOutcome {
        if self.has(product.id) {
            self.remove(product.id);
            ToggleOutcome::Removed
        } else if self.add(product.clone()) {
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Full
        }
    }

    /// Empty the set.
    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    fn save(&self) {
        self.persist.save(keys::COMPARE, &self.items);
    }
}
