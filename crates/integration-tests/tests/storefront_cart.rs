//! Cart and checkout against a running storefront.
//!
//! Requires the storefront to be running. Run with:
//! `cargo test -p corner-shop-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use corner_shop_integration_tests::{session_client, storefront_base_url};

async fn post_json(client: &Client, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}{path}", storefront_base_url()))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn cart_data(client: &Client) -> Vec<Value> {
    client
        .get(format!("{}/cart_data", storefront_base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

/// A product id no other test run will use.
fn unique_id() -> String {
    format!("it-{}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires running storefront"]
async fn test_health() {
    let client = session_client().unwrap();
    let resp = client
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "requires running storefront"]
async fn test_add_merge_update_remove() {
    let client = session_client().unwrap();
    let id = unique_id();

    let (status, body) = post_json(
        &client,
        "/add_to_cart",
        &json!({"id": id, "name": "Widget", "price": 9.99, "qty": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Widget added to cart!");

    let (_, body) = post_json(&client, "/add_to_cart", &json!({"id": id, "qty": 3})).await;
    assert_eq!(body["message"], "Widget quantity updated in cart!");
    assert_eq!(cart_data(&client).await[0]["qty"], 5);

    let (_, body) = post_json(&client, "/update_cart", &json!({"id": id, "qty": 0})).await;
    assert_eq!(body["message"], "Cart updated successfully!");
    assert_eq!(cart_data(&client).await[0]["qty"], 1);

    let (_, body) = post_json(&client, "/remove_from_cart", &json!({"id": id})).await;
    assert_eq!(body["message"], "Item removed from cart!");
    assert!(cart_data(&client).await.is_empty());
}

#[tokio::test]
#[ignore = "requires running storefront"]
async fn test_checkout_clears_cart() {
    let client = session_client().unwrap();

    let resp = client
        .post(format!("{}/place_order", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart is empty!");

    post_json(
        &client,
        "/add_to_cart",
        &json!({"id": unique_id(), "name": "Widget", "price": "9.99", "qty": 1}),
    )
    .await;

    let resp = client
        .post(format!("{}/place_order", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Order #"));
    assert!(message.ends_with(" placed successfully!"));

    assert!(cart_data(&client).await.is_empty());
}

#[tokio::test]
#[ignore = "requires running storefront"]
async fn test_sessions_do_not_share_carts() {
    let alice = session_client().unwrap();
    let bob = session_client().unwrap();

    post_json(
        &alice,
        "/add_to_cart",
        &json!({"id": unique_id(), "name": "Widget", "price": 1, "qty": 1}),
    )
    .await;

    assert_eq!(cart_data(&alice).await.len(), 1);
    assert!(cart_data(&bob).await.is_empty());
}

#[tokio::test]
#[ignore = "requires running storefront"]
async fn test_register_then_login() {
    let client = session_client().unwrap();
    let base = storefront_base_url();
    let email = format!("{}@example.com", unique_id());

    let resp = client
        .post(format!("{base}/register"))
        .form(&[
            ("name", "Integration"),
            ("email", email.as_str()),
            ("password", "correct-horse"),
            ("confirm_password", "correct-horse"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .post(format!("{base}/login"))
        .form(&[("email", email.as_str()), ("password", "correct-horse")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/?success=login");
}
