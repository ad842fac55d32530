//! Catalog route handlers: products, categories, and checkout methods.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;
use velora_core::{Category, PaymentMethod, Product, ShippingMethod};

use crate::error::{AppError, Result};
use crate::services::catalog::{self, ProductFilter};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize, Default)]
pub struct ProductListParams {
    /// Category slug filter.
    pub category: Option<String>,
    /// Free-text search query.
    pub q: Option<String>,
    /// Only featured products.
    #[serde(default)]
    pub featured: bool,
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        category_slug: params.category,
        search: params.q,
        featured: params.featured,
    };
    let products = catalog::get_products(state.airtable(), &filter).await?;
    Ok(Json(products))
}

/// `GET /api/products/{slug}`
#[instrument(skip(state))]
pub async fn product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    catalog::get_product_by_slug(state.airtable(), &slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))
}

/// `GET /api/categories`
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = catalog::get_categories(state.airtable()).await?;
    Ok(Json(categories))
}

/// `GET /api/payment-methods`
#[instrument(skip(state))]
pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentMethod>>> {
    let methods = catalog::get_payment_methods(state.airtable()).await?;
    Ok(Json(methods))
}

/// `GET /api/shipping-methods`
#[instrument(skip(state))]
pub async fn list_shipping_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShippingMethod>>> {
    let methods = catalog::get_shipping_methods(state.airtable()).await?;
    Ok(Json(methods))
}
