//! Integration tests for checkout submission and order tracking.
//!
//! Run with: cargo test -p velora-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};

use velora_integration_tests::TestContext;

fn seed_methods(ctx: &TestContext) {
    ctx.mock.insert(
        "Payment Methods",
        json!({"Name": "Bank Transfer", "Display Order": 1, "Active": true}),
    );
    ctx.mock.insert(
        "Shipping Methods",
        json!({
            "Name": "Standard",
            "Cost": 5.0,
            "Free Shipping Threshold": 50.0,
            "Display Order": 1,
            "Active": true,
        }),
    );
}

/// A valid submission with `quantity` units of a 24.99 product in the cart.
fn order_body(quantity: u32) -> Value {
    json!({
        "customerName": "Jane Doe",
        "customerEmail": "Jane@Example.com",
        "shippingAddress": "12 Rose Street",
        "shippingCity": "Springfield",
        "shippingState": "IL",
        "shippingPostalCode": "62701",
        "paymentMethod": "Bank Transfer",
        "shippingMethod": "Standard",
        "cart": {
            "items": [{
                "productId": "recProd00000001",
                "name": "Velvet Matte Lipstick",
                "price": 24.99,
                "quantity": quantity,
                "slug": "velvet-matte-lipstick",
                "stockQuantity": 45,
            }],
        },
    })
}

async fn post_json(ctx: &TestContext, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = ctx
        .http
        .post(ctx.url(path))
        .json(body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    let body = resp.json().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn test_checkout_creates_order_with_totals() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let (status, receipt) = post_json(&ctx, "/api/orders", &order_body(2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["orderNumber"], 1);

    let id = receipt["id"].as_str().expect("order id");
    let fields = ctx.mock.fields("Orders", id).expect("stored order");

    // 2 x 24.99 is below the 50.0 threshold, so shipping is charged
    assert_eq!(fields["Subtotal"], json!(49.98));
    assert_eq!(fields["Shipping Cost"], json!(5.0));
    assert_eq!(fields["Tax"], json!(0.0));
    assert_eq!(fields["Total Amount"], json!(54.98));
    assert_eq!(fields["Total Items"], json!(2));
    assert_eq!(fields["Order Status"], "Pending");
    assert_eq!(fields["Payment Status"], "Pending Review");

    // The item snapshot is a JSON array string
    let items: Value =
        serde_json::from_str(fields["Order Items"].as_str().expect("items string"))
            .expect("items parse");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["subtotal"], json!(49.98));
}

#[tokio::test]
async fn test_checkout_free_shipping_at_threshold() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    // 3 x 24.99 = 74.97, over the 50.0 threshold
    let (status, receipt) = post_json(&ctx, "/api/orders", &order_body(3)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = receipt["id"].as_str().expect("order id");
    let fields = ctx.mock.fields("Orders", id).expect("stored order");
    assert_eq!(fields["Shipping Cost"], json!(0.0));
    assert_eq!(fields["Total Amount"], json!(74.97));
}

#[tokio::test]
async fn test_order_numbers_increment() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let (_, first) = post_json(&ctx, "/api/orders", &order_body(1)).await;
    let (_, second) = post_json(&ctx, "/api/orders", &order_body(1)).await;
    assert_eq!(first["orderNumber"], 1);
    assert_eq!(second["orderNumber"], 2);
}

#[tokio::test]
async fn test_checkout_validation_failures_are_collected() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let mut body = order_body(1);
    body["customerName"] = json!("J");
    body["customerEmail"] = json!("not-an-email");
    body["shippingCity"] = json!("");

    let (status, error) = post_json(&ctx, "/api/orders", &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "Missing or invalid fields");
    assert_eq!(
        error["fields"]["customerName"],
        "Name must be at least 2 characters"
    );
    assert_eq!(error["fields"]["customerEmail"], "Invalid email address");
    assert_eq!(error["fields"]["shippingCity"], "City is required");
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let mut body = order_body(1);
    body["cart"] = json!({"items": []});

    let (status, error) = post_json(&ctx, "/api/orders", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Cart is empty");
}

#[tokio::test]
async fn test_checkout_normalizes_hand_rolled_cart_lines() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    // Zero-quantity and duplicate lines a real cart store would never emit
    let mut body = order_body(1);
    body["cart"] = json!({
        "items": [
            {"productId": "recProd00000001", "name": "Velvet Matte Lipstick",
             "price": 24.99, "quantity": 1, "slug": "velvet-matte-lipstick",
             "stockQuantity": 45},
            {"productId": "recProd00000002", "name": "Silk Primer",
             "price": 19.99, "quantity": 0, "slug": "silk-primer",
             "stockQuantity": 10},
            {"productId": "recProd00000001", "name": "Velvet Matte Lipstick",
             "price": 24.99, "quantity": 1, "slug": "velvet-matte-lipstick",
             "stockQuantity": 45},
        ],
    });

    let (status, receipt) = post_json(&ctx, "/api/orders", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = receipt["id"].as_str().expect("order id");
    let fields = ctx.mock.fields("Orders", id).expect("stored order");
    assert_eq!(fields["Total Items"], json!(2));
    assert_eq!(fields["Subtotal"], json!(49.98));

    // One merged line in the snapshot, the zero-quantity line gone
    let items: Value =
        serde_json::from_str(fields["Order Items"].as_str().expect("items string"))
            .expect("items parse");
    let items = items.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
}

#[tokio::test]
async fn test_checkout_rejects_cart_of_only_zero_quantity_lines() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let body = order_body(0);

    let (status, error) = post_json(&ctx, "/api/orders", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Cart is empty");
}

#[tokio::test]
async fn test_checkout_rejects_unknown_shipping_method() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let mut body = order_body(1);
    body["shippingMethod"] = json!("Drone Express");

    let (status, error) = post_json(&ctx, "/api/orders", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Unknown shipping method: Drone Express");
}

#[tokio::test]
async fn test_track_order_requires_both_facts_matching() {
    let ctx = TestContext::new().await;
    seed_methods(&ctx);

    let (_, receipt) = post_json(&ctx, "/api/orders", &order_body(2)).await;
    let number = receipt["orderNumber"].to_string();

    // Email comparison is case-insensitive
    let (status, found) = post_json(
        &ctx,
        "/api/orders/track",
        &json!({"orderNumber": number, "email": "jane@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["order"]["Customer Name"], "Jane Doe");
    assert_eq!(found["order"]["Order Number"], 1);

    // Right number, wrong email
    let (status, miss) = post_json(
        &ctx,
        "/api/orders/track",
        &json!({"orderNumber": number, "email": "mallory@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        miss["error"],
        "Order not found. Please check your order number and email."
    );

    // Right email, wrong number
    let (status, _) = post_json(
        &ctx,
        "/api/orders/track",
        &json!({"orderNumber": "999", "email": "jane@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_track_order_rejects_blank_input() {
    let ctx = TestContext::new().await;

    let (status, _) = post_json(
        &ctx,
        "/api/orders/track",
        &json!({"orderNumber": "  ", "email": "jane@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
