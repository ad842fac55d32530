//! Core types for Velora Beauty.
//!
//! Field names serialize to the record service's human-readable column names
//! (`"Stock Quantity"`, `"Order Number"`, ...) so these structs double as the
//! wire shape for record `fields` objects.

pub mod category;
pub mod email;
pub mod id;
pub mod method;
pub mod order;
pub mod product;
pub mod status;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use method::{PaymentMethod, ShippingMethod};
pub use order::{Order, OrderDraft, OrderForm, OrderItem, ValidationErrors};
pub use product::{Attachment, Product, StockStatus};
pub use status::{OrderStatus, PaymentStatus, StatusParseError};
