//! Payment and shipping method types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{PaymentMethodId, ShippingMethodId};

/// A manual payment option (bank transfer, cash on delivery, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Record id, injected alongside the fields by the client.
    pub id: PaymentMethodId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Icon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Display Order", default)]
    pub display_order: i64,
    #[serde(rename = "Active", default)]
    pub active: bool,
}

/// A shipping option with a flat cost and an optional free-shipping threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingMethod {
    /// Record id, injected alongside the fields by the client.
    pub id: ShippingMethodId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Icon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Cost", default, with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(
        rename = "Free Shipping Threshold",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub free_shipping_threshold: Option<Decimal>,
    #[serde(
        rename = "Estimated Days",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_days: Option<String>,
    #[serde(rename = "Display Order", default)]
    pub display_order: i64,
    #[serde(rename = "Active", default)]
    pub active: bool,
}

impl ShippingMethod {
    /// The shipping cost effective for a given cart subtotal.
    ///
    /// Zero when a free-shipping threshold is set and the subtotal reaches it,
    /// otherwise the flat cost. Both the order-summary preview and the
    /// submission payload call this - they must never disagree.
    #[must_use]
    pub fn effective_cost(&self, subtotal: Decimal) -> Decimal {
        match self.free_shipping_threshold {
            Some(threshold) if subtotal >= threshold => Decimal::ZERO,
            _ => self.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(cost: i64, threshold: Option<i64>) -> ShippingMethod {
        ShippingMethod {
            id: ShippingMethodId::new("recShip1"),
            name: "Standard".to_string(),
            icon: None,
            description: None,
            cost: Decimal::from(cost),
            free_shipping_threshold: threshold.map(Decimal::from),
            estimated_days: None,
            display_order: 1,
            active: true,
        }
    }

    #[test]
    fn test_below_threshold_charges_flat_cost() {
        let m = method(5, Some(50));
        assert_eq!(m.effective_cost(Decimal::from(40)), Decimal::from(5));
    }

    #[test]
    fn test_at_or_above_threshold_is_free() {
        let m = method(5, Some(50));
        assert_eq!(m.effective_cost(Decimal::from(50)), Decimal::ZERO);
        assert_eq!(m.effective_cost(Decimal::from(60)), Decimal::ZERO);
    }

    #[test]
    fn test_no_threshold_always_charges() {
        let m = method(5, None);
        assert_eq!(m.effective_cost(Decimal::from(1_000)), Decimal::from(5));
    }
}
