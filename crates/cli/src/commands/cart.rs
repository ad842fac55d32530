//! Manage a file-backed cart against the live catalog.
//!
//! A throwaway tool for exercising cart semantics from a shell: `add` pulls
//! the product from the base so the stock snapshot is real, the rest mutate
//! the local file only.

use tracing::{info, warn};

use velora_core::{CartStorage, CartStore, ProductId};
use velora_storefront::airtable::AirtableClient;
use velora_storefront::config::AirtableConfig;
use velora_storefront::services::catalog;

/// Default cart file, named after the storage key the storefront uses.
pub const DEFAULT_CART_FILE: &str = "makeup-cart-storage.json";

/// Cart slot backed by a single JSON file.
///
/// Load and store are best-effort like every [`CartStorage`]: an unreadable
/// file starts an empty cart and a failed write is logged, not raised.
struct FileCartStorage {
    path: std::path::PathBuf,
}

impl FileCartStorage {
    fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self, _key: &str) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn store(&mut self, _key: &str, blob: &str) {
        if let Err(e) = std::fs::write(&self.path, blob) {
            warn!(path = %self.path.display(), error = %e, "Could not write cart file");
        }
    }
}

// The file holds exactly one slot, so the key is implicit in the path.
fn open(file: &str) -> CartStore<FileCartStorage> {
    CartStore::new(FileCartStorage::new(file))
}

/// Add a product to the cart by slug, fetching it for a fresh stock snapshot.
///
/// # Errors
///
/// Returns an error if configuration is missing, the catalog read fails, or
/// no active product has the slug.
pub async fn add(file: &str, slug: &str, quantity: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = AirtableConfig::from_env()?;
    let client = AirtableClient::new(&config);

    let product = catalog::get_product_by_slug(&client, slug)
        .await?
        .ok_or_else(|| format!("no active product with slug '{slug}'"))?;

    let mut store = open(file);
    store.add_item(&product, quantity);

    match store.cart().line(&product.id) {
        Some(line) => info!(
            product = %line.name,
            quantity = line.quantity,
            stock = line.stock_quantity,
            "Cart updated"
        ),
        None => info!(product = %product.name, "Product is out of stock; cart unchanged"),
    }
    Ok(())
}

/// Remove a product's line from the cart.
///
/// # Errors
///
/// Infallible today; the signature matches the other subcommands.
pub fn remove(file: &str, product_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(file);
    store.remove_item(&ProductId::new(product_id));
    info!(product_id, "Line removed");
    Ok(())
}

/// Set a line's quantity; zero or below removes the line.
///
/// # Errors
///
/// Infallible today; the signature matches the other subcommands.
pub fn set(file: &str, product_id: &str, quantity: i64) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(file);
    let id = ProductId::new(product_id);
    store.update_quantity(&id, quantity);

    match store.cart().line(&id) {
        Some(line) => info!(product_id, quantity = line.quantity, "Quantity set"),
        None => info!(product_id, "Line removed"),
    }
    Ok(())
}

/// Print the cart contents and totals.
///
/// # Errors
///
/// Infallible today; the signature matches the other subcommands.
pub fn show(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open(file);
    let cart = store.cart();

    if cart.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    for line in cart.lines() {
        info!(
            product = %line.name,
            product_id = %line.product_id,
            quantity = line.quantity,
            price = %line.price,
            line_total = %line.line_total(),
        );
    }
    info!(
        total_items = cart.total_items(),
        total_price = %cart.total_price(),
        "Cart totals"
    );
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Infallible today; the signature matches the other subcommands.
pub fn clear(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(file);
    store.clear();
    info!("Cart cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use velora_core::CART_STORAGE_KEY;

    #[test]
    fn test_file_storage_round_trip() {
        // Pid alone can collide across quick successive runs; add a clock tick.
        let tick = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        let dir = std::env::temp_dir().join(format!(
            "velora-cart-test-{}-{tick}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("cart.json");

        let mut storage = FileCartStorage::new(&path);
        assert!(storage.load(CART_STORAGE_KEY).is_none());

        storage.store(CART_STORAGE_KEY, "{\"items\":[]}");
        assert_eq!(
            storage.load(CART_STORAGE_KEY).as_deref(),
            Some("{\"items\":[]}")
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
