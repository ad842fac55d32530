//! The cart state container and its persistence port.
//!
//! The storefront's cart is client-local state: a single writer mutates it in
//! memory and every mutation synchronously writes the full serialized cart to
//! a durable slot under a fixed key, so it survives restarts. The slot is
//! shared without locking; concurrent writers are last-write-wins (single
//! human operator per profile assumed).
//!
//! No cart operation can fail from the caller's side: clamping absorbs all
//! out-of-range quantity inputs, and storage implementations own their error
//! handling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::product::Product;

/// Fixed namespace key for the persisted cart slot.
pub const CART_STORAGE_KEY: &str = "makeup-cart-storage";

/// Durable blob slot the cart persists into.
///
/// Implementations must treat `store` as best-effort and handle their own
/// failures; the cart never surfaces a persistence error through a mutation.
pub trait CartStorage {
    /// Read the blob under `key`, if one exists and is readable.
    fn load(&self, key: &str) -> Option<String>;

    /// Write the blob under `key`, replacing any previous value.
    fn store(&mut self, key: &str, blob: &str);
}

/// In-memory slot for tests and throwaway carts.
#[derive(Debug, Default, Clone)]
pub struct MemoryCartStorage {
    slots: std::collections::HashMap<String, String>,
}

impl CartStorage for MemoryCartStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn store(&mut self, key: &str, blob: &str) {
        self.slots.insert(key.to_string(), blob.to_string());
    }
}

/// One product's entry in the cart.
///
/// Carries its own quantity and a snapshot of the available stock captured
/// when the product was added; the snapshot only changes if the product is
/// re-added. Persisted with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Always within `[1, stock_quantity]`.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub slug: String,
    /// Available stock at add time; clamps local quantity edits.
    pub stock_quantity: u32,
}

impl CartLine {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The ordered line-item collection, keyed by unique product id.
///
/// This is the persisted shape; [`CartStore`] wraps it with mutation
/// operations and the storage slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl Cart {
    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.product_id == product_id)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of `price * quantity` over all lines; zero for the empty cart.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// A copy with the line invariants restored: zero-quantity lines dropped
    /// and duplicate product ids merged into the earliest line (quantities
    /// summed, the first line's price and snapshot kept).
    ///
    /// Carts mutated through [`CartStore`] already hold these invariants;
    /// this is for carts deserialized from an untrusted caller.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut items: Vec<CartLine> = Vec::with_capacity(self.items.len());
        for line in &self.items {
            if line.quantity == 0 {
                continue;
            }
            match items
                .iter_mut()
                .find(|kept| kept.product_id == line.product_id)
            {
                Some(kept) => kept.quantity = kept.quantity.saturating_add(line.quantity),
                None => items.push(line.clone()),
            }
        }
        Self { items }
    }
}

/// The cart state container.
///
/// Loads the persisted cart from its slot on construction (a missing or
/// unreadable blob initializes an empty cart) and writes the full state back
/// after every mutation.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart persisted in `storage`, starting empty if the slot is
    /// missing or unreadable.
    pub fn new(storage: S) -> Self {
        let cart = storage
            .load(CART_STORAGE_KEY)
            .and_then(|blob| serde_json::from_str(&blob).ok())
            .unwrap_or_default();
        Self { cart, storage }
    }

    /// The current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add `quantity` of a product to the cart.
    ///
    /// If a line for the product exists, its quantity increases by `quantity`
    /// and its stock snapshot refreshes from the product; the result is capped
    /// at the snapshot, silently. Otherwise a new line is inserted with the
    /// quantity clamped to `[1, stock]`. Adding an out-of-stock product is a
    /// no-op.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        let stock = product.stock_quantity;
        if stock == 0 {
            return;
        }

        if let Some(line) = self
            .cart
            .items
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.stock_quantity = stock;
            line.quantity = line.quantity.saturating_add(quantity).min(stock);
        } else {
            self.cart.items.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: quantity.clamp(1, stock),
                image: product.primary_image().map(String::from),
                slug: product.slug.clone(),
                stock_quantity: stock,
            });
        }

        self.persist();
    }

    /// Delete a product's line unconditionally; no-op when absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.cart.items.retain(|line| &line.product_id != product_id);
        self.persist();
    }

    /// Set a line's quantity, clamped to its stored stock snapshot.
    ///
    /// A quantity of zero or below removes the line instead of retaining a
    /// non-positive quantity.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self
            .cart
            .items
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            line.quantity = quantity.min(line.stock_quantity);
        }

        self.persist();
    }

    /// Empty the cart; called after successful checkout.
    pub fn clear(&mut self) {
        self.cart.items.clear();
        self.persist();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Write the full cart state to the slot. Synchronous, no debouncing;
    /// the slot holds whatever the last writer stored.
    fn persist(&mut self) {
        if let Ok(blob) = serde_json::to_string(&self.cart) {
            self.storage.store(CART_STORAGE_KEY, &blob);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::StockStatus;

    fn product(id: &str, price: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            description: None,
            short_description: None,
            category: vec![],
            price: Decimal::from(price),
            compare_at_price: None,
            sku: String::new(),
            images: vec![],
            stock_quantity: stock,
            low_stock_threshold: None,
            stock_status: Some(StockStatus::InStock),
            brand: None,
            shade: None,
            featured: false,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn store() -> CartStore<MemoryCartStorage> {
        CartStore::new(MemoryCartStorage::default())
    }

    #[test]
    fn test_add_caps_at_stock_quantity() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 12);

        let line = cart.cart().line(&ProductId::new("A")).expect("line");
        assert_eq!(line.quantity, 5);
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = store();
        let p = product("A", 10, 5);
        cart.add_item(&p, 2);
        cart.add_item(&p, 2);
        cart.add_item(&p, 2);

        assert_eq!(cart.cart().lines().len(), 1);
        // Running sum 6 clamps to the stock snapshot of 5.
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_readd_refreshes_stock_snapshot() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 5);
        cart.add_item(&product("A", 10, 8), 2);

        let line = cart.cart().line(&ProductId::new("A")).expect("line");
        assert_eq!(line.stock_quantity, 8);
        assert_eq!(line.quantity, 7);
    }

    #[test]
    fn test_add_out_of_stock_is_noop() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 0), 1);
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_add_zero_quantity_inserts_single_unit() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 0);

        let line = cart.cart().line(&ProductId::new("A")).expect("line");
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_update_to_zero_or_negative_removes_line() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 2);
        cart.update_quantity(&ProductId::new("A"), 0);
        assert!(cart.cart().is_empty());

        cart.add_item(&product("A", 10, 5), 2);
        cart.update_quantity(&ProductId::new("A"), -5);
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_update_clamps_to_snapshot() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 1);
        cart.update_quantity(&ProductId::new("A"), 40);

        let line = cart.cart().line(&ProductId::new("A")).expect("line");
        assert_eq!(line.quantity, 5);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 1);
        cart.remove_item(&ProductId::new("B"));
        assert_eq!(cart.cart().lines().len(), 1);
    }

    #[test]
    fn test_total_price_over_mutations() {
        let mut cart = store();
        assert_eq!(cart.total_price(), Decimal::ZERO);

        cart.add_item(&product("A", 10, 99), 2);
        cart.add_item(&product("B", 5, 99), 3);
        assert_eq!(cart.total_price(), Decimal::from(35));

        cart.update_quantity(&ProductId::new("B"), 1);
        assert_eq!(cart.total_price(), Decimal::from(25));

        cart.remove_item(&ProductId::new("A"));
        assert_eq!(cart.total_price(), Decimal::from(5));

        cart.clear();
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_persisted_cart_reloads_identically() {
        let mut storage = MemoryCartStorage::default();
        {
            let mut cart = CartStore::new(storage.clone());
            cart.add_item(&product("A", 10, 9), 2);
            cart.add_item(&product("B", 5, 9), 1);
            storage = cart.storage;
        }

        let reloaded = CartStore::new(storage);
        assert_eq!(reloaded.cart().lines().len(), 2);
        // Order-preserving for display.
        assert_eq!(reloaded.cart().lines()[0].product_id, ProductId::new("A"));
        assert_eq!(reloaded.cart().lines()[1].product_id, ProductId::new("B"));
        assert_eq!(reloaded.total_price(), Decimal::from(25));
    }

    #[test]
    fn test_missing_blob_initializes_empty() {
        let cart = CartStore::new(MemoryCartStorage::default());
        assert!(cart.cart().is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_corrupt_blob_initializes_empty() {
        let mut storage = MemoryCartStorage::default();
        storage.store(CART_STORAGE_KEY, "{not json");
        let cart = CartStore::new(storage);
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_normalized_drops_zero_lines_and_merges_duplicates() {
        // Hand-built blob, the shape an external caller could post.
        let cart: Cart = serde_json::from_str(
            r#"{"items": [
                {"productId": "A", "name": "A", "price": 10.0, "quantity": 2,
                 "slug": "a", "stockQuantity": 9},
                {"productId": "B", "name": "B", "price": 5.0, "quantity": 0,
                 "slug": "b", "stockQuantity": 9},
                {"productId": "A", "name": "A", "price": 10.0, "quantity": 3,
                 "slug": "a", "stockQuantity": 9}
            ]}"#,
        )
        .expect("parse");

        let normalized = cart.normalized();
        assert_eq!(normalized.lines().len(), 1);
        let line = normalized.line(&ProductId::new("A")).expect("line");
        assert_eq!(line.quantity, 5);
        assert_eq!(normalized.total_price(), Decimal::from(50));
    }

    #[test]
    fn test_normalized_all_zero_lines_is_empty() {
        let cart: Cart = serde_json::from_str(
            r#"{"items": [
                {"productId": "A", "name": "A", "price": 10.0, "quantity": 0,
                 "slug": "a", "stockQuantity": 9}
            ]}"#,
        )
        .expect("parse");

        assert!(cart.normalized().is_empty());
    }

    #[test]
    fn test_normalized_preserves_valid_cart() {
        let mut store = store();
        store.add_item(&product("A", 10, 9), 2);
        store.add_item(&product("B", 5, 9), 1);

        assert_eq!(store.cart().normalized(), *store.cart());
    }

    #[test]
    fn test_clear_persists_empty_state() {
        let mut cart = store();
        cart.add_item(&product("A", 10, 5), 2);
        cart.clear();

        let blob = cart.storage.load(CART_STORAGE_KEY).expect("blob");
        let persisted: Cart = serde_json::from_str(&blob).expect("parse");
        assert!(persisted.is_empty());
    }
}
