//! Status enums for orders.
//!
//! Two independent axes track an order after creation: fulfillment progress
//! and manual payment verification. The admin moves both through unrestricted
//! single-field overwrites; terminal states are terminal by convention, not
//! enforcement.

use serde::{Deserialize, Serialize};

/// Error parsing a status label.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {axis} status: {value}")]
pub struct StatusParseError {
    /// Which status axis was being parsed.
    pub axis: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Order fulfillment status.
///
/// Serialized with the human-readable labels the record service stores.
/// Intended progression is `Pending` → `Confirmed` → `Processing` → `Shipped`
/// → `Delivered`, with `Cancelled` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status is terminal in intent (no further progression
    /// expected, though overwrites remain possible).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError {
                axis: "order",
                value: s.to_string(),
            }),
        }
    }
}

/// Manual payment verification status.
///
/// Payments are verified by hand (bank transfer receipts and the like), so
/// this axis moves independently of [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Pending Review")]
    PendingReview,
    Verified,
    Rejected,
}

impl PaymentStatus {
    /// Whether this status is terminal in intent.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::PendingReview => "Pending Review",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending Review" => Ok(Self::PendingReview),
            "Verified" => Ok(Self::Verified),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(StatusParseError {
                axis: "payment",
                value: s.to_string(),
            }),
        }
    }
}
