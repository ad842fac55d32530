//! Order management commands.

use tracing::info;

use velora_storefront::airtable::AirtableClient;
use velora_storefront::config::AirtableConfig;
use velora_storefront::services::admin;

/// List all orders with their statuses and totals.
///
/// # Errors
///
/// Returns an error if configuration is missing or the listing fails.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = AirtableConfig::from_env()?;
    let client = AirtableClient::new(&config);

    let orders = admin::list_orders(&client).await?;

    if orders.is_empty() {
        info!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        info!(
            order_number = order.order_number,
            customer = %order.customer_name,
            order_status = %order.order_status,
            payment_status = %order.payment_status,
            total = %order.total_amount,
            items = order.total_items,
            id = %order.id,
        );
    }
    info!(count = orders.len(), "Orders listed");

    Ok(())
}
