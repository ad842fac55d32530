//! Back-office handlers.
//!
//! These are the only write paths after order creation, and they accept only
//! the typed patch shapes - a request naming any other field is rejected at
//! deserialization.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use velora_core::{Order, Product};

use crate::error::{AppError, Result};
use crate::services::admin::{self, OrderPatch, ProductPatch};
use crate::state::AppState;

/// `GET /api/admin/orders`
#[instrument(skip(state))]
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = admin::list_orders(state.airtable()).await?;
    Ok(Json(orders))
}

/// `PATCH /api/admin/orders/{id}`
#[instrument(skip(state, patch))]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("Empty patch".to_string()));
    }
    let order = admin::update_order(state.airtable(), &id, patch).await?;
    Ok(Json(order))
}

/// `PATCH /api/admin/products/{id}`
#[instrument(skip(state, patch))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("Empty patch".to_string()));
    }
    let product = admin::update_product(state.airtable(), &id, patch).await?;
    Ok(Json(product))
}
