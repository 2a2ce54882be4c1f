//! Cart state manager: optimistic mutations, rollbacks, reconciliation.
//!
//! Every user action follows the same three-phase protocol:
//!
//! 1. apply the matching optimistic mutation synchronously, so the view
//!    reflects the change with zero latency;
//! 2. issue the corresponding request through the gateway;
//! 3. on success, replace local state wholesale with the server's
//!    authoritative response (which also resolves placeholder ids); on
//!    failure, apply the matching rollback against the snapshot captured
//!    before step 1.
//!
//! Rollbacks restore exactly the pre-optimistic state for the one item
//! involved; they never touch unrelated concurrent mutations. Requests
//! are not guaranteed to complete in issuance order - a slow add
//! resolving after a later remove can re-introduce a line. Accepted
//! race: the most recent authoritative replacement always wins.
//!
//! Invariants held after every mutation:
//! - each line's `subtotal == product_price * quantity`;
//! - `total` equals the sum of line subtotals (or the server's total
//!   verbatim after an authoritative replacement);
//! - at most one line per product id.

use rust_decimal::Decimal;

use vitrine_core::{CartId, CartItem, CartItemId, CartSnapshot, Product, ProductId};

use crate::gateway::CatalogApi;
use crate::persist::{StateStore, keys};

/// The cart's items and total, exclusively owned by this manager.
#[derive(Debug)]
pub struct CartStore {
    /// Server-side cart id from the last authoritative snapshot.
    cart_id: Option<CartId>,
    items: Vec<CartItem>,
    total: Decimal,
    /// Whether the cart reflects a server response (or a best-effort
    /// local fallback after a failed fetch).
    synced: bool,
    persist: StateStore,
}

impl CartStore {
    /// Construct the store, eagerly reloading the persisted snapshot for
    /// optimistic continuity across restarts.
    #[must_use]
    pub fn load(persist: StateStore) -> Self {
        let snapshot: Option<CartSnapshot> = persist.load(keys::CART);
        let (cart_id, items, total) = snapshot
            .map_or((None, Vec::new(), Decimal::ZERO), |s| {
                (Some(s.id), s.items, s.total)
            });

        Self {
            cart_id,
            items,
            total,
            synced: false,
            persist,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lines in insertion/display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cart total.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Whether a reconciliation has completed since construction.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.synced
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line with the given id, if present.
    #[must_use]
    pub fn item(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// The line for the given product, if present.
    #[must_use]
    pub fn item_for_product(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    // =========================================================================
    // Local state transitions (synchronous, infallible)
    // =========================================================================

    /// Unconditional replacement with server-authoritative truth. The
    /// total is installed verbatim, not recomputed.
    pub fn set_cart(&mut self, items: Vec<CartItem>, total: Decimal) {
        self.items = items;
        self.total = total;
        self.synced = true;
        self.save();
    }

    /// [`Self::set_cart`] from a full server snapshot, also recording the
    /// server-side cart id.
    pub fn apply_snapshot(&mut self, snapshot: CartSnapshot) {
        self.cart_id = Some(snapshot.id);
        self.set_cart(snapshot.items, snapshot.total);
    }

    /// Optimistically add an item. Merges into an existing line for the
    /// same product (incrementing its quantity); otherwise appends the
    /// item under a placeholder id so it can be targeted for rollback
    /// before a real id is known.
    pub fn add_item_optimistic(&mut self, mut item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity += item.quantity;
                existing.subtotal = existing.expected_subtotal();
            }
            None => {
                if !item.id.is_confirmed() {
                    item.id = CartItemId::placeholder(self.items.len());
                }
                item.subtotal = item.expected_subtotal();
                self.items.push(item);
            }
        }
        self.recompute_total();
        self.save();
    }

    /// Optimistically rewrite a line's quantity (and subtotal). No-op if
    /// the line is not present.
    pub fn update_item_optimistic(&mut self, item_id: CartItemId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
            item.subtotal = item.expected_subtotal();
            self.recompute_total();
            self.save();
        }
    }

    /// Optimistically delete a line. No-op if not present.
    pub fn remove_item_optimistic(&mut self, item_id: CartItemId) {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        if self.items.len() != before {
            self.recompute_total();
            self.save();
        }
    }

    /// Roll back a failed add by removing the product's whole line.
    ///
    /// Deliberate simplification carried over from the original protocol:
    /// when the optimistic add merged into a pre-existing line, this
    /// drops the previously confirmed quantity too, not just the delta.
    /// The next reconciliation restores the server's view.
    pub fn rollback_add(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
        self.recompute_total();
        self.save();
    }

    /// Roll back a failed quantity update by restoring the previous
    /// quantity. No-op if the line is gone (e.g. concurrently removed).
    pub fn rollback_update(&mut self, item_id: CartItemId, prev_quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = prev_quantity;
            item.subtotal = item.expected_subtotal();
            self.recompute_total();
            self.save();
        }
    }

    /// Roll back a failed remove by re-inserting the captured snapshot,
    /// unless a line with that id is already present again (a later
    /// successful mutation may have restored it).
    pub fn rollback_remove(&mut self, item: CartItem) {
        if !self.items.iter().any(|i| i.id == item.id) {
            self.items.push(item);
        }
        self.recompute_total();
        self.save();
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(|i| i.subtotal).sum();
    }

    fn save(&self) {
        let snapshot = CartSnapshot {
            id: self.cart_id.unwrap_or(CartId::new(0)),
            items: self.items.clone(),
            total: self.total,
        };
        self.persist.save(keys::CART, &snapshot);
    }

    // =========================================================================
    // Optimistic protocol drivers
    // =========================================================================

    /// Add `quantity` units of `product`: optimistic apply, then request,
    /// then authoritative replace or rollback. Returns whether the server
    /// confirmed the mutation.
    pub async fn add<G: CatalogApi>(
        &mut self,
        gateway: &G,
        product: &Product,
        quantity: u32,
    ) -> bool {
        self.add_item_optimistic(CartItem::optimistic(product, quantity));

        match gateway.add_cart_item(product.id, quantity).await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            Err(error) => {
                tracing::warn!(%error, product_id = %product.id, "add to cart failed, rolling back");
                self.rollback_add(product.id);
                false
            }
        }
    }

    /// Change a line's quantity (caller constrains it to >= 1). Returns
    /// whether the server confirmed; returns `false` without any request
    /// when the line does not exist.
    pub async fn set_quantity<G: CatalogApi>(
        &mut self,
        gateway: &G,
        item_id: CartItemId,
        quantity: u32,
    ) -> bool {
        let Some(prev_quantity) = self.item(item_id).map(|i| i.quantity) else {
            return false;
        };
        self.update_item_optimistic(item_id, quantity);

        match gateway.update_cart_item(item_id, quantity).await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            Err(error) => {
                tracing::warn!(%error, item_id = %item_id, "quantity update failed, rolling back");
                self.rollback_update(item_id, prev_quantity);
                false
            }
        }
    }

    /// Remove a line. Returns whether the server confirmed; returns
    /// `false` without any request when the line does not exist.
    pub async fn remove<G: CatalogApi>(&mut self, gateway: &G, item_id: CartItemId) -> bool {
        let Some(snapshot_item) = self.item(item_id).cloned() else {
            return false;
        };
        self.remove_item_optimistic(item_id);

        match gateway.remove_cart_item(item_id).await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            Err(error) => {
                tracing::warn!(%error, item_id = %item_id, "remove failed, restoring line");
                self.rollback_remove(snapshot_item);
                false
            }
        }
    }

    /// Load-time reconciliation: fetch the authoritative cart and install
    /// it. On failure the cart is treated as synced with whatever local
    /// state exists - best effort, never blocks the view.
    pub async fn sync<G: CatalogApi>(&mut self, gateway: &G) {
        match gateway.get_cart().await {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(error) => {
                tracing::warn!(%error, "cart fetch failed, keeping local state");
                self.synced = true;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn store() -> (tempfile::TempDir, CartStore) {
        let tmp = tempfile::tempdir().unwrap();
        let persist = StateStore::open(tmp.path()).unwrap();
        (tmp, CartStore::load(persist))
    }

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Decimal::from(price),
            image: None,
            category: "test".to_string(),
        }
    }

    fn confirmed_item(id: i64, product_id: i64, price: i64, quantity: u32) -> CartItem {
        let mut item = CartItem::optimistic(&product(product_id, price), quantity);
        item.id = CartItemId::new(id);
        item
    }

    /// Every store invariant from the data model, checked after mutations.
    fn assert_consistent(store: &CartStore) {
        for item in store.items() {
            assert_eq!(
                item.subtotal,
                item.expected_subtotal(),
                "line subtotal out of sync for product {}",
                item.product_id
            );
            assert!(item.quantity >= 1);
        }
        let sum: Decimal = store.items().iter().map(|i| i.subtotal).sum();
        assert_eq!(store.total(), sum, "total out of sync with line subtotals");

        let mut product_ids: Vec<_> = store.items().iter().map(|i| i.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        assert_eq!(
            product_ids.len(),
            store.items().len(),
            "duplicate product line"
        );
    }

    // =========================================================================
    // Local mutation semantics
    // =========================================================================

    #[test]
    fn test_add_new_item_then_merge_same_product() {
        let (_tmp, mut store) = store();

        // Empty cart: one unit at 1000
        store.add_item_optimistic(CartItem::optimistic(&product(5, 1000), 1));
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.total(), Decimal::from(1000));
        assert_consistent(&store);

        // Same product again with quantity 2: single line, quantity 3
        store.add_item_optimistic(CartItem::optimistic(&product(5, 1000), 2));
        assert_eq!(store.items().len(), 1);
        let line = store.item_for_product(ProductId::new(5)).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.subtotal, Decimal::from(3000));
        assert_eq!(store.total(), Decimal::from(3000));
        assert_consistent(&store);
    }

    #[test]
    fn test_optimistic_items_get_placeholder_ids() {
        let (_tmp, mut store) = store();

        store.add_item_optimistic(CartItem::optimistic(&product(1, 100), 1));
        store.add_item_optimistic(CartItem::optimistic(&product(2, 200), 1));

        let ids: Vec<_> = store.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![CartItemId::new(0), CartItemId::new(-1)]);
        assert!(ids.iter().all(|id| !id.is_confirmed()));
    }

    #[test]
    fn test_confirmed_id_is_kept_on_append() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(9, 1, 100, 2));
        assert_eq!(store.items().first().unwrap().id, CartItemId::new(9));
    }

    #[test]
    fn test_update_and_remove() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(7, 5, 500, 2));
        assert_eq!(store.total(), Decimal::from(1000));

        store.update_item_optimistic(CartItemId::new(7), 5);
        assert_eq!(store.total(), Decimal::from(2500));
        assert_consistent(&store);

        // Unknown id: no-op
        store.update_item_optimistic(CartItemId::new(99), 1);
        assert_eq!(store.total(), Decimal::from(2500));

        store.remove_item_optimistic(CartItemId::new(7));
        assert!(store.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
        assert_consistent(&store);

        // Removing again: no-op
        store.remove_item_optimistic(CartItemId::new(7));
        assert!(store.is_empty());
    }

    #[test]
    fn test_totals_consistent_under_arbitrary_sequences() {
        let (_tmp, mut store) = store();

        store.add_item_optimistic(CartItem::optimistic(&product(1, 100), 1));
        assert_consistent(&store);
        store.add_item_optimistic(CartItem::optimistic(&product(2, 250), 4));
        assert_consistent(&store);
        store.add_item_optimistic(CartItem::optimistic(&product(1, 100), 2));
        assert_consistent(&store);

        let second_id = store.item_for_product(ProductId::new(2)).unwrap().id;
        store.update_item_optimistic(second_id, 1);
        assert_consistent(&store);
        store.remove_item_optimistic(second_id);
        assert_consistent(&store);
        store.add_item_optimistic(CartItem::optimistic(&product(3, 999), 3));
        assert_consistent(&store);
    }

    // =========================================================================
    // Rollbacks
    // =========================================================================

    #[test]
    fn test_rollback_add_restores_pre_add_state_for_new_item() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(1, 1, 100, 1));
        let items_before = store.items().to_vec();
        let total_before = store.total();

        store.add_item_optimistic(CartItem::optimistic(&product(2, 300), 2));
        store.rollback_add(ProductId::new(2));

        assert_eq!(store.items(), items_before.as_slice());
        assert_eq!(store.total(), total_before);
        assert_consistent(&store);
    }

    #[test]
    fn test_rollback_add_after_merge_drops_whole_line() {
        // Documented behavior: a failed add that merged into an existing
        // line removes the entire line, losing the confirmed quantity.
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(1, 5, 100, 2));

        store.add_item_optimistic(CartItem::optimistic(&product(5, 100), 1));
        store.rollback_add(ProductId::new(5));

        assert!(store.item_for_product(ProductId::new(5)).is_none());
        assert_eq!(store.total(), Decimal::ZERO);
        assert_consistent(&store);
    }

    #[test]
    fn test_rollback_update_restores_quantity() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(7, 5, 500, 2));

        store.update_item_optimistic(CartItemId::new(7), 5);
        assert_eq!(store.total(), Decimal::from(2500));

        store.rollback_update(CartItemId::new(7), 2);
        let line = store.item(CartItemId::new(7)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.subtotal, Decimal::from(1000));
        assert_eq!(store.total(), Decimal::from(1000));
        assert_consistent(&store);
    }

    #[test]
    fn test_rollback_update_noop_when_line_gone() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(7, 5, 500, 2));
        store.remove_item_optimistic(CartItemId::new(7));

        store.rollback_update(CartItemId::new(7), 2);
        assert!(store.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[test]
    fn test_rollback_remove_reinserts_once() {
        let (_tmp, mut store) = store();
        let item = confirmed_item(7, 5, 500, 2);
        store.add_item_optimistic(item.clone());
        store.remove_item_optimistic(CartItemId::new(7));

        store.rollback_remove(item.clone());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.total(), Decimal::from(1000));

        // A second rollback (or one racing a successful restore) must not
        // duplicate the line.
        store.rollback_remove(item);
        assert_eq!(store.items().len(), 1);
        assert_consistent(&store);
    }

    // =========================================================================
    // Authoritative replacement
    // =========================================================================

    #[test]
    fn test_set_cart_wins_over_optimistic_state() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(CartItem::optimistic(&product(1, 100), 1));
        store.add_item_optimistic(CartItem::optimistic(&product(2, 200), 2));

        let server_items = vec![confirmed_item(10, 1, 100, 1)];
        // Server total taken verbatim, even where it disagrees with the
        // local sum (e.g. server-side discounts).
        store.set_cart(server_items.clone(), Decimal::from(90));

        assert_eq!(store.items(), server_items.as_slice());
        assert_eq!(store.total(), Decimal::from(90));
        assert!(store.is_synced());
    }

    #[test]
    fn test_snapshot_persists_across_restarts() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let persist = StateStore::open(tmp.path()).unwrap();
            let mut store = CartStore::load(persist);
            store.add_item_optimistic(confirmed_item(7, 5, 500, 2));
        }

        let persist = StateStore::open(tmp.path()).unwrap();
        let store = CartStore::load(persist);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.total(), Decimal::from(1000));
        assert!(!store.is_synced());
    }

    // =========================================================================
    // Protocol drivers (against a scripted gateway)
    // =========================================================================

    fn server_cart(items: Vec<CartItem>) -> CartSnapshot {
        let total = items.iter().map(|i| i.subtotal).sum();
        CartSnapshot {
            id: CartId::new(12),
            items,
            total,
        }
    }

    #[tokio::test]
    async fn test_add_confirmed_resolves_placeholder_ids() {
        let (_tmp, mut store) = store();
        let api = FakeApi {
            cart: Some(server_cart(vec![confirmed_item(42, 5, 1000, 1)])),
            ..FakeApi::default()
        };

        assert!(store.add(&api, &product(5, 1000), 1).await);
        assert_eq!(store.items().len(), 1);
        assert!(store.items().first().unwrap().id.is_confirmed());
        assert!(store.is_synced());
        assert_consistent(&store);
    }

    #[tokio::test]
    async fn test_add_rejected_rolls_back() {
        let (_tmp, mut store) = store();
        let api = FakeApi::default(); // every request fails

        assert!(!store.add(&api, &product(5, 1000), 1).await);
        assert!(store.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
        assert_eq!(api.call_count("add_cart_item"), 1);
    }

    #[tokio::test]
    async fn test_update_rejected_restores_previous_quantity() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(7, 5, 500, 2));
        let api = FakeApi::default();

        assert!(!store.set_quantity(&api, CartItemId::new(7), 5).await);
        let line = store.item(CartItemId::new(7)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(store.total(), Decimal::from(1000));
        assert_consistent(&store);
    }

    #[tokio::test]
    async fn test_set_quantity_for_unknown_line_sends_nothing() {
        let (_tmp, mut store) = store();
        let api = FakeApi::default();

        assert!(!store.set_quantity(&api, CartItemId::new(9), 3).await);
        assert!(api.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_remove_rejected_restores_line() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(confirmed_item(7, 5, 500, 2));
        let api = FakeApi::default();

        assert!(!store.remove(&api, CartItemId::new(7)).await);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.total(), Decimal::from(1000));
        assert_consistent(&store);
    }

    #[tokio::test]
    async fn test_sync_installs_server_cart() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(CartItem::optimistic(&product(1, 100), 1));
        let api = FakeApi {
            cart: Some(server_cart(vec![confirmed_item(3, 2, 700, 1)])),
            ..FakeApi::default()
        };

        store.sync(&api).await;
        assert_eq!(store.items().len(), 1);
        assert_eq!(
            store.items().first().unwrap().product_id,
            ProductId::new(2)
        );
        assert!(store.is_synced());
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_local_state() {
        let (_tmp, mut store) = store();
        store.add_item_optimistic(CartItem::optimistic(&product(1, 100), 1));
        let api = FakeApi::default();

        store.sync(&api).await;
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.total(), Decimal::from(100));
        assert!(store.is_synced());
    }
}
