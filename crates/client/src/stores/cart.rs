//! Shopping cart state.
//!
//! Transient-but-persisted: the cart lives in memory and is written to
//! storage only when the caller asks (`persist`). Mutations never persist
//! automatically - a caller batching several mutations persists once at
//! the end.

use order_ease_core::Price;

use crate::models::CartItem;
use crate::storage::{Storage, keys};

/// Client-side shopping cart.
///
/// Lines keep insertion order. At most one line exists per `cart_item_id`;
/// adding an existing line combines quantities. Quantities are `u32`, so a
/// line can never hold a negative count, and zero removes the line.
pub struct CartStore {
    storage: Storage,
    items: Vec<CartItem>,
}

impl CartStore {
    /// Create an empty cart over the given storage handle.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            items: Vec::new(),
        }
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add a line. If a line with the same `cart_item_id` exists, the
    /// incoming count is added to it (price and options are assumed
    /// identical for identical IDs); otherwise the line is appended.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.cart_item_id == item.cart_item_id)
        {
            existing.count += item.count;
        } else {
            self.items.push(item);
        }
    }

    /// Set a line's quantity. Zero removes the line entirely - a count is
    /// never stored as zero.
    pub fn update_quantity(&mut self, cart_item_id: &str, new_count: u32) {
        if new_count == 0 {
            self.remove(cart_item_id);
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.cart_item_id == cart_item_id)
        {
            line.count = new_count;
        }
    }

    /// Remove a line unconditionally.
    pub fn remove(&mut self, cart_item_id: &str) {
        self.items.retain(|line| line.cart_item_id != cart_item_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total item count across all lines. Recomputed, never stored.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items.iter().map(|line| line.count).sum()
    }

    /// Total price across all lines. Recomputed, never stored.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Write the cart snapshot to storage under `cart_data`.
    pub fn persist(&self) {
        self.storage.set(keys::CART_DATA, &self.items);
    }

    /// Load the cart snapshot from storage, replacing the in-memory state.
    /// An absent or unreadable snapshot leaves the current state untouched.
    pub fn hydrate(&mut self) {
        if let Some(items) = self.storage.get::<Vec<CartItem>>(keys::CART_DATA) {
            self.items = items;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use order_ease_core::ProductId;

    use crate::storage::MemoryBackend;

    fn store() -> CartStore {
        CartStore::new(Storage::new(Arc::new(MemoryBackend::new())))
    }

    fn line(id: &str, count: u32, minor_units: i64) -> CartItem {
        CartItem {
            cart_item_id: id.to_string(),
            product_id: ProductId::new("p-1"),
            options: Vec::new(),
            count,
            final_price: Price::from_minor_units(minor_units),
        }
    }

    #[test]
    fn test_add_merges_on_same_id() {
        let mut cart = store();
        cart.add(line("X", 2, 1000));
        cart.add(line("X", 3, 1000));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].count, 5);
    }

    #[test]
    fn test_add_appends_distinct_ids_in_order() {
        let mut cart = store();
        cart.add(line("A", 1, 1000));
        cart.add(line("B", 1, 2000));
        cart.add(line("A", 1, 1000));

        let ids: Vec<_> = cart.items().iter().map(|l| l.cart_item_id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = store();
        cart.add(line("X", 2, 1000));
        cart.update_quantity("X", 0);

        assert!(cart.items().is_empty());
        assert!(!cart.items().iter().any(|l| l.cart_item_id == "X"));
    }

    #[test]
    fn test_update_quantity_sets_count() {
        let mut cart = store();
        cart.add(line("X", 2, 1000));
        cart.update_quantity("X", 7);
        assert_eq!(cart.items()[0].count, 7);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = store();
        cart.add(line("A", 1, 1000));
        cart.add(line("B", 1, 2000));

        cart.remove("A");
        assert_eq!(cart.items().len(), 1);

        cart.clear();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_totals_recomputed() {
        let mut cart = store();
        cart.add(line("A", 2, 1050)); // 2 x 10.50
        cart.add(line("B", 1, 800)); // 1 x 8.00

        assert_eq!(cart.total_count(), 3);
        assert_eq!(cart.total_price(), Price::from_minor_units(2900));

        cart.update_quantity("A", 1);
        assert_eq!(cart.total_count(), 2);
        assert_eq!(cart.total_price(), Price::from_minor_units(1850));
    }

    #[test]
    fn test_persist_and_hydrate_round_trip() {
        let storage = Storage::new(Arc::new(MemoryBackend::new()));

        let mut cart = CartStore::new(storage.clone());
        cart.add(line("A", 2, 1050));
        cart.persist();

        let mut restored = CartStore::new(storage);
        restored.hydrate();
        assert_eq!(restored.items(), cart.items());
    }

    #[test]
    fn test_mutation_does_not_persist_automatically() {
        let storage = Storage::new(Arc::new(MemoryBackend::new()));

        let mut cart = CartStore::new(storage.clone());
        cart.add(line("A", 1, 1000));

        // Nothing persisted yet
        let mut other = CartStore::new(storage);
        other.hydrate();
        assert!(other.items().is_empty());
    }

    #[test]
    fn test_hydrate_keeps_state_when_snapshot_absent() {
        let mut cart = store();
        cart.add(line("A", 1, 1000));
        cart.hydrate();
        assert_eq!(cart.items().len(), 1);
    }
}
