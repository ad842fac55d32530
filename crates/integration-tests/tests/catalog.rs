//! Integration tests for the catalog endpoints.
//!
//! Run with: cargo test -p velora-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};

use velora_integration_tests::TestContext;

/// Seed a small catalog: three products (one inactive), two categories, and
/// one method of each kind.
fn seed_catalog(ctx: &TestContext) {
    ctx.mock.insert(
        "Categories",
        json!({"Name": "Lipsticks", "Slug": "lipsticks", "Display Order": 2, "Active": true}),
    );
    ctx.mock.insert(
        "Categories",
        json!({"Name": "Blush", "Slug": "blush", "Display Order": 1, "Active": true}),
    );

    ctx.mock.insert(
        "Products",
        json!({
            "Name": "Velvet Matte Lipstick",
            "Slug": "velvet-matte-lipstick",
            "Price": 24.99,
            "Stock Quantity": 45,
            "Category": ["Lipsticks"],
            "Brand": "GlamPro",
            "Featured": true,
            "Active": true,
        }),
    );
    ctx.mock.insert(
        "Products",
        json!({
            "Name": "Cream Blush",
            "Slug": "cream-blush",
            "Price": 21.99,
            "Stock Quantity": 30,
            "Category": ["Blush"],
            "Brand": "ColorBloom",
            "Active": true,
        }),
    );
    ctx.mock.insert(
        "Products",
        json!({
            "Name": "Discontinued Gloss",
            "Slug": "discontinued-gloss",
            "Price": 12.99,
            "Stock Quantity": 0,
            "Active": false,
        }),
    );

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

async fn get_json(ctx: &TestContext, path: &str) -> (StatusCode, Value) {
    let resp = ctx
        .http
        .get(ctx.url(path))
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    let body = resp.json().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn test_product_listing_is_active_only_and_name_sorted() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/products").await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().expect("array");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["Name"], "Cream Blush");
    assert_eq!(products[1]["Name"], "Velvet Matte Lipstick");
}

#[tokio::test]
async fn test_featured_filter() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/products?featured=true").await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().expect("array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["Slug"], "velvet-matte-lipstick");
}

#[tokio::test]
async fn test_category_filter_resolves_slug() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/products?category=blush").await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().expect("array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["Name"], "Cream Blush");

    // Unknown category slug is an empty listing, not an error
    let (status, body) = get_json(&ctx, "/api/products?category=nail-polish").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_search_matches_brand_case_insensitively() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/products?q=colorbloom").await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().expect("array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["Slug"], "cream-blush");
}

#[tokio::test]
async fn test_product_by_slug() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/products/velvet-matte-lipstick").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Name"], "Velvet Matte Lipstick");
    assert!(body["id"].as_str().expect("id").starts_with("rec"));

    // Inactive products are invisible by slug
    let (status, _) = get_json(&ctx, "/api/products/discontinued-gloss").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_sorted_by_display_order() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);

    let categories = body.as_array().expect("array");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["Name"], "Blush");
    assert_eq!(categories[1]["Name"], "Lipsticks");
}

#[tokio::test]
async fn test_method_listings() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let (status, body) = get_json(&ctx, "/api/payment-methods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
    assert_eq!(body[0]["Name"], "Bank Transfer");

    let (status, body) = get_json(&ctx, "/api/shipping-methods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Name"], "Standard");
    assert_eq!(body[0]["Cost"], json!(5.0));
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .http
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Not ready while the base has no Products table
    let resp = ctx
        .http
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    seed_catalog(&ctx);
    let resp = ctx
        .http
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let ctx = TestContext::new().await;
    seed_catalog(&ctx);

    let resp = ctx
        .http
        .get(ctx.url("/api/categories"))
        .send()
        .await
        .expect("request failed");
    assert!(resp.headers().contains_key("x-request-id"));
}
