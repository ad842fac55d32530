//! Order types: the checkout form, the immutable creation draft, and the
//! stored order record.
//!
//! An order is created exactly once from a cart snapshot plus the customer's
//! shipping, contact, and method selections. After creation only the two
//! status fields and the free-form notes are mutable; the item snapshot and
//! the monetary totals are never recomputed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{OrderId, ProductId};
use super::method::ShippingMethod;
use super::status::{OrderStatus, PaymentStatus};
use crate::cart::Cart;

/// One product's entry in an order's immutable item snapshot.
///
/// Stored serialized as a JSON array string in the record's `Order Items`
/// field, camelCase keys matching what the storefront always wrote there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    /// `price * quantity`, captured at creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// Per-field validation failures, keyed by the form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Whether any field failed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, msg) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

/// Checkout form data as submitted by the customer.
///
/// Validation failures are collected per field and never reach the network;
/// the messages match what the storefront form displays inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_postal_code: String,
    pub payment_method: String,
    pub shipping_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderForm {
    /// Validate all fields, collecting every failure.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is missing or malformed.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.customer_name.trim().len() < 2 {
            errors.push("customerName", "Name must be at least 2 characters");
        }
        if Email::parse(&self.customer_email).is_err() {
            errors.push("customerEmail", "Invalid email address");
        }
        if self.shipping_address.trim().len() < 5 {
            errors.push("shippingAddress", "Address is required");
        }
        if self.shipping_city.trim().len() < 2 {
            errors.push("shippingCity", "City is required");
        }
        if self.shipping_state.trim().len() < 2 {
            errors.push("shippingState", "State is required");
        }
        if self.shipping_postal_code.trim().len() < 3 {
            errors.push("shippingPostalCode", "Postal code is required");
        }
        if self.payment_method.is_empty() {
            errors.push("paymentMethod", "Please select a payment method");
        }
        if self.shipping_method.is_empty() {
            errors.push("shippingMethod", "Please select a shipping method");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// The order-creation payload, assembled once at submission time.
///
/// Serializes directly to the `Orders` table's `fields` object. Totals obey
/// `total_amount == subtotal + tax + shipping_cost` and
/// `total_items == sum(item.quantity)` by construction.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Customer Email")]
    pub customer_email: String,
    #[serde(rename = "Customer Phone")]
    pub customer_phone: String,
    #[serde(rename = "Shipping Address")]
    pub shipping_address: String,
    #[serde(rename = "Shipping City")]
    pub shipping_city: String,
    #[serde(rename = "Shipping State")]
    pub shipping_state: String,
    #[serde(rename = "Shipping Postal Code")]
    pub shipping_postal_code: String,
    #[serde(rename = "Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Shipping Method")]
    pub shipping_method: String,
    /// JSON array of [`OrderItem`]s, serialized once and never rewritten.
    #[serde(rename = "Order Items")]
    pub order_items: String,
    #[serde(rename = "Total Items")]
    pub total_items: u32,
    #[serde(rename = "Subtotal", with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(rename = "Tax", with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(rename = "Shipping Cost", with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(rename = "Total Amount", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(rename = "Order Status")]
    pub order_status: OrderStatus,
    #[serde(rename = "Payment Status")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl OrderDraft {
    /// Build the creation payload from a cart snapshot, a validated form, and
    /// the selected shipping method.
    ///
    /// The shipping cost is computed here through
    /// [`ShippingMethod::effective_cost`], the same function the summary
    /// preview uses. Tax is carried explicitly (currently always zero at the
    /// call site) so the total invariant stays visible.
    #[must_use]
    pub fn from_cart(cart: &Cart, form: &OrderForm, shipping: &ShippingMethod, tax: Decimal) -> Self {
        let items: Vec<OrderItem> = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
                subtotal: line.line_total(),
            })
            .collect();

        let subtotal = cart.total_price();
        let shipping_cost = shipping.effective_cost(subtotal);
        let order_items =
            serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string());

        Self {
            customer_name: form.customer_name.trim().to_string(),
            customer_email: form.customer_email.trim().to_string(),
            customer_phone: form.customer_phone.clone().unwrap_or_default(),
            shipping_address: form.shipping_address.trim().to_string(),
            shipping_city: form.shipping_city.trim().to_string(),
            shipping_state: form.shipping_state.trim().to_string(),
            shipping_postal_code: form.shipping_postal_code.trim().to_string(),
            payment_method: form.payment_method.clone(),
            shipping_method: form.shipping_method.clone(),
            order_items,
            total_items: cart.total_items(),
            subtotal,
            tax,
            shipping_cost,
            total_amount: subtotal + tax + shipping_cost,
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::PendingReview,
            notes: form.notes.clone().unwrap_or_default(),
        }
    }
}

/// A stored order record, as read back from the `Orders` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Record id, injected alongside the fields by the client.
    pub id: OrderId,
    /// Auto-number assigned by the record service at creation.
    #[serde(rename = "Order Number")]
    pub order_number: i64,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Customer Email")]
    pub customer_email: String,
    #[serde(rename = "Customer Phone", default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(rename = "Shipping Address")]
    pub shipping_address: String,
    #[serde(rename = "Shipping City")]
    pub shipping_city: String,
    #[serde(rename = "Shipping State")]
    pub shipping_state: String,
    #[serde(rename = "Shipping Postal Code")]
    pub shipping_postal_code: String,
    #[serde(rename = "Payment Method", default)]
    pub payment_method: String,
    #[serde(rename = "Shipping Method", default)]
    pub shipping_method: String,
    /// Raw item snapshot; parse with [`Order::items`].
    #[serde(rename = "Order Items")]
    pub order_items: String,
    #[serde(rename = "Total Items", default)]
    pub total_items: u32,
    #[serde(rename = "Subtotal", with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(
        rename = "Tax",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax: Option<Decimal>,
    #[serde(
        rename = "Shipping Cost",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping_cost: Option<Decimal>,
    #[serde(rename = "Total Amount", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(rename = "Order Status")]
    pub order_status: OrderStatus,
    #[serde(rename = "Payment Status")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "Notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// Parse the immutable item snapshot.
    ///
    /// An unreadable snapshot yields an empty list rather than an error; the
    /// field is display-only after creation.
    #[must_use]
    pub fn items(&self) -> Vec<OrderItem> {
        serde_json::from_str(&self.order_items).unwrap_or_default()
    }
}
