//! HTTP route handlers for the storefront and admin JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                      - Liveness check
//! GET   /health/ready                - Readiness check (pings the base)
//!
//! # Catalog
//! GET   /api/products                - Product listing (?category, ?q, ?featured)
//! GET   /api/products/{slug}         - Product detail
//! GET   /api/categories              - Category listing
//!
//! # Checkout
//! GET   /api/payment-methods         - Active payment methods
//! GET   /api/shipping-methods        - Active shipping methods
//! POST  /api/orders                  - Submit an order (form + cart snapshot)
//! POST  /api/orders/track            - Track an order (number + email)
//!
//! # Admin
//! GET   /api/admin/orders            - Full order listing
//! PATCH /api/admin/orders/{id}       - Patch status fields / notes
//! PATCH /api/admin/products/{id}     - Patch price / stock / active
//! ```

pub mod admin;
pub mod catalog;
pub mod orders;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Assemble all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{slug}", get(catalog::product_by_slug))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/payment-methods", get(catalog::list_payment_methods))
        .route("/api/shipping-methods", get(catalog::list_shipping_methods))
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/track", post(orders::track_order))
        .route("/api/admin/orders", get(admin::list_orders))
        .route("/api/admin/orders/{id}", patch(admin::update_order))
        .route("/api/admin/products/{id}", patch(admin::update_product))
}
