//! Checkout submission and order tracking handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use velora_core::{Cart, Order, OrderForm};

use crate::error::{AppError, Result};
use crate::services::orders::{self, OrderReceipt};
use crate::state::AppState;

/// Checkout submission body: the assembled form plus the cart snapshot.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub form: OrderForm,
    pub cart: Cart,
}

/// `POST /api/orders`
///
/// Creates the order record and returns its id and assigned order number.
/// Validation failures come back as 422 with per-field messages; the client
/// clears its cart only on success.
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderReceipt>)> {
    let receipt = orders::submit_order(state.airtable(), &request.cart, &request.form).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Order tracking request: both facts are required so order numbers alone
/// cannot be enumerated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOrderRequest {
    pub order_number: String,
    pub email: String,
}

/// Order tracking response wrapper.
#[derive(Debug, Serialize)]
pub struct TrackOrderResponse {
    pub order: Order,
}

/// `POST /api/orders/track`
#[instrument(skip_all)]
pub async fn track_order(
    State(state): State<AppState>,
    Json(request): Json<TrackOrderRequest>,
) -> Result<Json<TrackOrderResponse>> {
    if request.order_number.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Order number and email are required".to_string(),
        ));
    }

    orders::track_order(state.airtable(), request.order_number.trim(), &request.email)
        .await?
        .map(|order| Json(TrackOrderResponse { order }))
        .ok_or_else(|| {
            AppError::NotFound(
                "Order not found. Please check your order number and email.".to_string(),
            )
        })
}
