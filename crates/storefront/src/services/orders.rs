//! Checkout submission and customer order tracking.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};
use velora_core::{Cart, Order, OrderDraft, OrderForm, OrderId, ValidationErrors};

use crate::airtable::{AirtableClient, AirtableError, ListQuery, Table, formula};

use super::catalog::get_shipping_methods;
use super::typed_records;

/// What the customer gets back after a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub id: OrderId,
    pub order_number: i64,
}

/// Checkout submission failures.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// One or more form fields failed validation; never reaches the network.
    #[error("invalid checkout form: {0}")]
    Validation(ValidationErrors),

    /// Submitting an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The selected shipping method is not an active method.
    #[error("unknown shipping method: {0}")]
    UnknownShippingMethod(String),

    /// The record service rejected a call.
    #[error(transparent)]
    Airtable(#[from] AirtableError),
}

/// Submit a checkout: validate, price, and create the order record.
///
/// The submitted cart is normalized first ([`Cart::normalized`]), so
/// zero-quantity or duplicate lines from a hand-rolled client cannot reach
/// the order snapshot.
///
/// The shipping cost comes from [`velora_core::ShippingMethod::effective_cost`]
/// against the cart subtotal - the same computation the order summary shows,
/// so preview and submitted total cannot diverge. Stock snapshots in the cart
/// are NOT re-checked against current catalog stock here; the base accepts
/// the order as submitted.
///
/// # Errors
///
/// Returns a [`CheckoutError`] for invalid forms, an empty cart, an unknown
/// shipping method, or a rejected record write.
#[instrument(skip_all, fields(items = cart.lines().len()))]
pub async fn submit_order(
    client: &AirtableClient,
    cart: &Cart,
    form: &OrderForm,
) -> Result<OrderReceipt, CheckoutError> {
    form.validate().map_err(CheckoutError::Validation)?;

    // Wire carts arrive unchecked: drop zero-quantity lines and merge
    // duplicate products before pricing anything.
    let cart = cart.normalized();
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let shipping = get_shipping_methods(client)
        .await?
        .into_iter()
        .find(|method| method.name == form.shipping_method)
        .ok_or_else(|| CheckoutError::UnknownShippingMethod(form.shipping_method.clone()))?;

    // Tax is not charged today; the field stays explicit so the
    // total = subtotal + tax + shipping invariant is visible end to end.
    let draft = OrderDraft::from_cart(&cart, form, &shipping, Decimal::ZERO);
    let fields = serde_json::to_value(&draft).map_err(AirtableError::Parse)?;

    let record = client.create(Table::Orders, fields).await?;

    // The auto-number is assigned at creation and only readable from the
    // response.
    let order_number = record
        .fields
        .get("Order Number")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or_default();

    info!(order_id = %record.id, order_number, "order created");

    Ok(OrderReceipt {
        id: OrderId::new(record.id),
        order_number,
    })
}

/// Look up an order by number and email.
///
/// Requires both facts to match one record: exact order number, email
/// compared case-insensitively. Zero matches is `Ok(None)` - a miss, not an
/// error.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
#[instrument(skip(client, email))]
pub async fn track_order(
    client: &AirtableClient,
    order_number: &str,
    email: &str,
) -> Result<Option<Order>, AirtableError> {
    let query = ListQuery::new()
        .filter(formula::and(&[
            formula::eq("Order Number", order_number),
            formula::eq_ci("Customer Email", email),
        ]))
        .max_records(1);

    let records = client.list(Table::Orders, &query).await?;
    Ok(typed_records(records, "order").into_iter().next())
}
