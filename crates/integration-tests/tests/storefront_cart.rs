//! Integration tests for the cart, header badge and wishlist.

use luxemarket_integration_tests::TestContext;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn money(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("valid decimal")
}

async fn add_to_cart(ctx: &TestContext, product_id: &str, quantity: i64) -> Value {
    let resp = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("HX-Trigger").and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
    resp.json().await.expect("cart json")
}

async fn badge(ctx: &TestContext) -> String {
    ctx.client
        .get(ctx.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_adding_same_product_merges_lines() {
    let ctx = TestContext::new().await;

    add_to_cart(&ctx, "7", 1).await;
    let cart = add_to_cart(&ctx, "7", 2).await;

    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);

    // 3 x 89.99 ships free and carries 7% tax
    let summary = &cart["summary"];
    assert_eq!(money(&summary["subtotal"]), Decimal::new(26_997, 2));
    assert_eq!(money(&summary["shipping"]), Decimal::ZERO);
    assert_eq!(money(&summary["tax"]), Decimal::new(1890, 2));
    assert_eq!(money(&summary["total"]), Decimal::new(28_887, 2));
    assert_eq!(summary["itemCount"], 3);

    assert!(badge(&ctx).await.contains(">3</span>"));
}

#[tokio::test]
async fn test_small_cart_pays_shipping() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "productId": "7" }))
        .send()
        .await
        .unwrap();
    let cart: Value = resp.json().await.unwrap();

    assert_eq!(cart["items"][0]["quantity"], 1);
    assert_eq!(money(&cart["summary"]["shipping"]), Decimal::TEN);
}

#[tokio::test]
async fn test_add_clamps_to_stock_and_rejects_unknown_products() {
    let ctx = TestContext::new().await;

    // The sofa has 5 in stock
    let cart = add_to_cart(&ctx, "4", 50).await;
    assert_eq!(cart["items"][0]["quantity"], 5);

    let resp = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "productId": "404" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_remove_and_clear() {
    let ctx = TestContext::new().await;
    add_to_cart(&ctx, "1", 2).await;
    add_to_cart(&ctx, "6", 1).await;

    // Zero is raised to one
    let cart: Value = ctx
        .client
        .patch(ctx.url("/api/cart/items/1"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"][0]["quantity"], 1);

    let resp = ctx
        .client
        .patch(ctx.url("/api/cart/items/missing"))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let cart: Value = ctx
        .client
        .delete(ctx.url("/api/cart/items/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["id"], "6");

    let cart: Value = ctx
        .client
        .delete(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert!(badge(&ctx).await.contains(">0</span>"));
}

#[tokio::test]
async fn test_huge_quantity_keeps_cart_readable() {
    let ctx = TestContext::new().await;
    add_to_cart(&ctx, "6", 1).await;
    add_to_cart(&ctx, "3", 1).await;

    let resp = ctx
        .client
        .patch(ctx.url("/api/cart/items/6"))
        .json(&json!({ "quantity": 99_999_999_999_i64 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.unwrap();
    // Headphones stock is 18
    assert_eq!(cart["items"][0]["quantity"], 18);

    let cart = add_to_cart(&ctx, "6", 1).await;
    assert_eq!(cart["summary"]["itemCount"], 20);
    assert!(badge(&ctx).await.contains(">20</span>"));

    let resp = ctx.client.get(ctx.url("/api/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new().await;
    add_to_cart(&ctx, "2", 1).await;
    add_to_cart(&ctx, "8", 2).await;
    let dir = ctx.shutdown().await.expect("context owns its data dir");

    let ctx = TestContext::with_data_dir(dir.path()).await;
    let cart: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["summary"]["itemCount"], 3);
}

#[tokio::test]
async fn test_wishlist_is_idempotent() {
    let ctx = TestContext::new().await;

    let add = || {
        ctx.client
            .post(ctx.url("/api/wishlist"))
            .json(&json!({ "productId": "2" }))
            .send()
    };

    let resp = add().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = add().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let wishlist: Value = resp.json().await.unwrap();
    assert_eq!(wishlist["count"], 1);

    let membership: Value = ctx
        .client
        .get(ctx.url("/api/wishlist/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(membership["inWishlist"], true);

    ctx.client
        .delete(ctx.url("/api/wishlist/2"))
        .send()
        .await
        .unwrap();
    let membership: Value = ctx
        .client
        .get(ctx.url("/api/wishlist/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(membership["inWishlist"], false);
}

#[tokio::test]
async fn test_wishlist_and_cart_are_independent() {
    let ctx = TestContext::new().await;
    add_to_cart(&ctx, "3", 1).await;
    ctx.client
        .post(ctx.url("/api/wishlist"))
        .json(&json!({ "productId": "5" }))
        .send()
        .await
        .unwrap();

    let wishlist: Value = ctx
        .client
        .delete(ctx.url("/api/wishlist"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(wishlist["count"], 0);

    let cart: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}
