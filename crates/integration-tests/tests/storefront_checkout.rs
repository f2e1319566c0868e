//! Integration tests for the checkout flow.

use luxemarket_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

fn address() -> Value {
    json!({
        "fullName": "Ada Lovelace",
        "addressLine1": "12 St James's Square",
        "city": "London",
        "state": "LDN",
        "postalCode": "SW1Y 4JH",
        "country": "GB",
        "phone": "+44 20 7946 0000"
    })
}

async fn fill_cart(ctx: &TestContext) {
    let resp = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "productId": "6", "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn cart_len(ctx: &TestContext) -> usize {
    let cart: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    cart["items"].as_array().map_or(0, Vec::len)
}

#[tokio::test]
async fn test_shipping_requires_items() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout/shipping"))
        .json(&address())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "cart is empty");
}

#[tokio::test]
async fn test_shipping_reports_blank_fields() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    let mut form = address();
    form["city"] = json!("");
    form["phone"] = json!("   ");

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout/shipping"))
        .json(&form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.text().await.unwrap(),
        "missing required fields: city, phone"
    );
}

#[tokio::test]
async fn test_shipping_advances_to_payment() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout/shipping"))
        .json(&address())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["step"], "payment");
    assert_eq!(body["summary"]["itemCount"], 2);
}

#[tokio::test]
async fn test_place_order_with_card_empties_cart() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({
            "address": address(),
            "paymentMethod": "credit_card",
            "cardNumber": "4242 4242 4242 4242",
            "cardExpiry": "12/29",
            "cardCvc": "123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["step"], "confirmation");
    let number = body["order"]["number"].as_str().unwrap();
    assert!(number.starts_with("ORD-"), "unexpected order number {number}");
    assert_eq!(body["order"]["paymentMethod"], "credit_card");
    assert_eq!(body["order"]["items"][0]["id"], "6");
    assert_eq!(body["order"]["shippingAddress"]["city"], "London");

    assert_eq!(cart_len(&ctx).await, 0);
}

#[tokio::test]
async fn test_place_order_with_paypal() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({ "address": address(), "paymentMethod": "paypal" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"]["paymentMethod"], "paypal");
}

#[tokio::test]
async fn test_invalid_card_keeps_cart() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({
            "address": address(),
            "paymentMethod": "credit_card",
            "cardNumber": "1234",
            "cardExpiry": "12/29",
            "cardCvc": "123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.text().await.unwrap(),
        "invalid payment details: card number"
    );
    assert_eq!(cart_len(&ctx).await, 1);
}
