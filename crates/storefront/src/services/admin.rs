//! Admin mutations: the narrow post-creation write surface.
//!
//! The record service would happily patch any field; these typed patches
//! restrict writes to the fields the back-office is allowed to touch, so the
//! mutable surface cannot silently widen. Every patch is an unconditional
//! overwrite - two admins racing on the same order are last-write-wins.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};
use velora_core::{Order, OrderStatus, PaymentStatus, Product};

use crate::airtable::{AirtableClient, AirtableError, ListQuery, SortDirection, Table};

use super::typed_records;

/// Admin-editable order fields. Everything else is immutable post-creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderPatch {
    pub order_status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

impl OrderPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order_status.is_none() && self.payment_status.is_none() && self.notes.is_none()
    }

    fn into_fields(self) -> Value {
        let mut fields = Map::new();
        if let Some(status) = self.order_status {
            fields.insert("Order Status".to_string(), Value::String(status.to_string()));
        }
        if let Some(status) = self.payment_status {
            fields.insert(
                "Payment Status".to_string(),
                Value::String(status.to_string()),
            );
        }
        if let Some(notes) = self.notes {
            fields.insert("Notes".to_string(), Value::String(notes));
        }
        Value::Object(fields)
    }
}

/// Admin-editable product fields (the back-office product table's inline
/// edits).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<rust_decimal::Decimal>,
    pub stock_quantity: Option<u32>,
    pub active: Option<bool>,
}

impl ProductPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none() && self.stock_quantity.is_none() && self.active.is_none()
    }

    fn into_fields(self) -> Value {
        let mut fields = Map::new();
        if let Some(price) = self.price {
            if let Some(number) = serde_json::Number::from_f64(
                rust_decimal::prelude::ToPrimitive::to_f64(&price).unwrap_or(0.0),
            ) {
                fields.insert("Price".to_string(), Value::Number(number));
            }
        }
        if let Some(stock) = self.stock_quantity {
            fields.insert("Stock Quantity".to_string(), Value::from(stock));
        }
        if let Some(active) = self.active {
            fields.insert("Active".to_string(), Value::Bool(active));
        }
        Value::Object(fields)
    }
}

/// List every order for the back-office, newest first.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn list_orders(client: &AirtableClient) -> Result<Vec<Order>, AirtableError> {
    // Order numbers are monotonic, so this is creation order reversed.
    let query = ListQuery::new().sort("Order Number", SortDirection::Desc);
    let records = client.list(Table::Orders, &query).await?;
    Ok(typed_records(records, "order"))
}

/// Apply an [`OrderPatch`] and return the patched order.
///
/// # Errors
///
/// Returns [`AirtableError::NotFound`] for unknown ids, or another
/// [`AirtableError`] when the write fails.
#[instrument(skip(client, patch))]
pub async fn update_order(
    client: &AirtableClient,
    id: &str,
    patch: OrderPatch,
) -> Result<Order, AirtableError> {
    let record = client.update(Table::Orders, id, patch.into_fields()).await?;
    info!(order_id = %record.id, "order patched");
    record.into_typed().map_err(AirtableError::Parse)
}

/// Apply a [`ProductPatch`] and return the patched product.
///
/// # Errors
///
/// Returns [`AirtableError::NotFound`] for unknown ids, or another
/// [`AirtableError`] when the write fails.
#[instrument(skip(client, patch))]
pub async fn update_product(
    client: &AirtableClient,
    id: &str,
    patch: ProductPatch,
) -> Result<Product, AirtableError> {
    let record = client
        .update(Table::Products, id, patch.into_fields())
        .await?;
    info!(product_id = %record.id, "product patched");
    record.into_typed().map_err(AirtableError::Parse)
}
