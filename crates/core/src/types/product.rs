//! Product catalog types.
//!
//! Products are read-only to this system: the record service is the source of
//! truth and the admin edits a narrow set of fields through a typed patch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// Default low-stock threshold when the record does not carry one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Stock availability buckets shown on product cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Derive the status from a stock quantity and an optional low-stock
    /// threshold.
    ///
    /// Pure fallback used when the record's own status field is absent or
    /// unrecognized: quantity 0 is out-of-stock, quantity at or below the
    /// threshold is low-stock, anything else is in-stock.
    #[must_use]
    pub const fn derive(stock_quantity: u32, low_stock_threshold: Option<u32>) -> Self {
        let threshold = match low_stock_threshold {
            Some(t) => t,
            None => DEFAULT_LOW_STOCK_THRESHOLD,
        };

        if stock_quantity == 0 {
            Self::OutOfStock
        } else if stock_quantity <= threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

/// An uploaded file reference (product or category image).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Hosted file URL.
    pub url: String,
    /// Original file name.
    #[serde(default)]
    pub filename: Option<String>,
}

/// A catalog product as stored in the `Products` table.
///
/// Serde renames map each field to the base's human-readable column name, so
/// this struct deserializes straight from a record's `fields` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Record id, injected alongside the fields by the client.
    pub id: ProductId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Slug")]
    pub slug: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "Short Description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,
    /// Linked `Categories` record ids.
    #[serde(rename = "Category", default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CategoryId>,
    #[serde(rename = "Price", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        rename = "Compare At Price",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Decimal>,
    #[serde(rename = "SKU", default)]
    pub sku: String,
    #[serde(rename = "Images", default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
    #[serde(rename = "Stock Quantity", default)]
    pub stock_quantity: u32,
    #[serde(
        rename = "Low Stock Threshold",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub low_stock_threshold: Option<u32>,
    /// Status as stored upstream; missing or unrecognized values read as
    /// `None`, see [`Product::stock_status`].
    #[serde(
        rename = "Stock Status",
        default,
        deserialize_with = "stock_status_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_status: Option<StockStatus>,
    #[serde(rename = "Brand", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "Shade/Color", default, skip_serializing_if = "Option::is_none")]
    pub shade: Option<String>,
    #[serde(rename = "Featured", default)]
    pub featured: bool,
    #[serde(rename = "Active", default)]
    pub active: bool,
    #[serde(rename = "Created At", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "Updated At", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Deserialize a stock status, treating unrecognized strings as absent so the
/// derivation fallback applies instead of rejecting the whole record.
fn stock_status_lenient<'de, D>(deserializer: D) -> Result<Option<StockStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.as_str() {
        "in-stock" => Some(StockStatus::InStock),
        "low-stock" => Some(StockStatus::LowStock),
        "out-of-stock" => Some(StockStatus::OutOfStock),
        _ => None,
    }))
}

impl Product {
    /// The effective stock status: the upstream value when present, otherwise
    /// derived from quantity and threshold.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        match self.stock_status {
            Some(status) => status,
            None => StockStatus::derive(self.stock_quantity, self.low_stock_threshold),
        }
    }

    /// First image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_out_of_stock_at_zero() {
        assert_eq!(StockStatus::derive(0, None), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(0, Some(3)), StockStatus::OutOfStock);
    }

    #[test]
    fn test_derive_low_stock_at_or_below_threshold() {
        assert_eq!(StockStatus::derive(3, Some(5)), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(5, Some(5)), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(6, Some(5)), StockStatus::InStock);
    }

    #[test]
    fn test_derive_uses_default_threshold() {
        assert_eq!(StockStatus::derive(10, None), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(11, None), StockStatus::InStock);
    }

    #[test]
    fn test_explicit_status_wins_over_derivation() {
        let fields = serde_json::json!({
            "id": "recProd1",
            "Name": "Velvet Matte Lipstick",
            "Slug": "velvet-matte-lipstick",
            "Price": 18.5,
            "Stock Quantity": 0,
            "Stock Status": "in-stock",
        });
        let product: Product = serde_json::from_value(fields).expect("deserialize");
        assert_eq!(product.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn test_missing_status_falls_back_to_derivation() {
        let fields = serde_json::json!({
            "id": "recProd1",
            "Name": "Velvet Matte Lipstick",
            "Slug": "velvet-matte-lipstick",
            "Price": 18.5,
            "Stock Quantity": 0,
        });
        let product: Product = serde_json::from_value(fields).expect("deserialize");
        assert_eq!(product.stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_unrecognized_status_falls_back_to_derivation() {
        let fields = serde_json::json!({
            "id": "recProd1",
            "Name": "Velvet Matte Lipstick",
            "Slug": "velvet-matte-lipstick",
            "Price": 18.5,
            "Stock Quantity": 50,
            "Stock Status": "backordered",
        });
        let product: Product = serde_json::from_value(fields).expect("deserialize");
        assert_eq!(product.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&StockStatus::LowStock).expect("serialize"),
            "\"low-stock\""
        );
    }
}
