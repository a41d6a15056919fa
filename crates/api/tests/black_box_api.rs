use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use freshcart_api::app::{build_router, services::AppServices};
use freshcart_auth::SessionClaims;
use freshcart_core::{Money, ProductId, UserId};
use freshcart_infra::{
    ledger::{InMemoryInventoryLedger, ProductCatalog},
    orders::InMemoryOrderRepository,
};
use freshcart_inventory::{InventoryLedger, NewProduct, Product};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    ledger: Arc<InMemoryInventoryLedger>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over in-memory stores the test can inspect.
        let ledger = Arc::new(InMemoryInventoryLedger::new());
        let orders = Arc::new(InMemoryOrderRepository::new());
        let services = Arc::new(AppServices::with_in_memory_stores(ledger.clone(), orders));
        let app = build_router(services, JWT_SECRET);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            ledger,
            handle,
        }
    }

    async fn stock(&self, name: &str, price_cents: u64, stock: u32) -> ProductId {
        let product = Product::create(
            ProductId::new(),
            NewProduct {
                name: name.to_string(),
                description: String::new(),
                category: "Fruits".to_string(),
                unit: "per lb".to_string(),
                image: None,
                price: Money::from_cents(price_cents),
                stock,
                featured: false,
            },
            Utc::now(),
        )
        .unwrap();
        self.ledger.insert_product(&product).await.unwrap();
        product.id
    }

    async fn stock_of(&self, id: ProductId) -> u32 {
        self.ledger.get_product(id).await.unwrap().unwrap().stock
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, user_id: UserId) -> String {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id,
        email: Some("ann@example.com".to_string()),
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn checkout(items: Value) -> Value {
    json!({
        "customer_name": "Ann Shopper",
        "customer_email": "ann@example.com",
        "customer_phone": "555-0100",
        "delivery_address": "1 Main St, Springfield",
        "items": items,
    })
}

async fn error_body(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn guest_checkout_prices_the_cart_and_decrements_stock() {
    let srv = TestServer::spawn().await;
    let apples = srv.stock("Fresh Apples", 499, 10).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/orders"))
        .json(&checkout(json!([{ "product_id": apples.to_string(), "quantity": 2 }])))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["order"]["total"], 1597);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(srv.stock_of(apples).await, 8);

    let id = body["order"]["id"].as_str().unwrap();
    let res = client.get(srv.url(&format!("/orders/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["user_id"], Value::Null);
    assert_eq!(order["subtotal"], 998);
    assert_eq!(order["delivery_fee"], 599);
    assert_eq!(order["items"][0]["product_name"], "Fresh Apples");
    assert_eq!(order["items"][0]["price"], 499);
    assert_eq!(order["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn short_stock_is_reported_and_nothing_is_taken() {
    let srv = TestServer::spawn().await;
    let bananas = srv.stock("Organic Bananas", 299, 3).await;
    let milk = srv.stock("Whole Milk", 499, 10).await;

    let res = reqwest::Client::new()
        .post(srv.url("/orders"))
        .json(&checkout(json!([
            { "product_id": milk.to_string(), "quantity": 1 },
            { "product_id": bananas.to_string(), "quantity": 5 },
        ])))
        .send()
        .await
        .unwrap();

    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["product_name"], "Organic Bananas");
    assert_eq!(body["product_id"], bananas.to_string());
    assert_eq!(srv.stock_of(bananas).await, 3);
    assert_eq!(srv.stock_of(milk).await, 10);
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let srv = TestServer::spawn().await;
    let ghost = ProductId::new().to_string();

    let res = reqwest::Client::new()
        .post(srv.url("/orders"))
        .json(&checkout(json!([{ "product_id": ghost, "quantity": 1 }])))
        .send()
        .await
        .unwrap();

    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "product_not_found");
    assert_eq!(body["product_id"], ghost);
}

#[tokio::test]
async fn bad_requests_are_validation_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let empty_cart = client
        .post(srv.url("/orders"))
        .json(&checkout(json!([])))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(empty_cart).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let missing_name = client
        .post(srv.url("/orders"))
        .json(&json!({ "items": [{ "product_id": "x", "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(missing_name).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "customer_name is required");

    let malformed = client
        .post(srv.url("/orders"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn order_history_requires_a_session() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/orders")).await.unwrap();

    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not_authenticated");
}

#[tokio::test]
async fn signed_in_orders_are_owned_and_listed() {
    let srv = TestServer::spawn().await;
    let carrots = srv.stock("Carrots", 299, 10).await;
    let user_id = UserId::new();
    let token = mint_jwt(JWT_SECRET, user_id);
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let res = client
            .post(srv.url("/orders"))
            .bearer_auth(&token)
            .json(&checkout(json!([{ "product_id": carrots.to_string(), "quantity": 1 }])))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mine: Value = client
        .get(srv.url("/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|o| o["user_id"] == user_id.to_string()));

    let someone_else = mint_jwt(JWT_SECRET, UserId::new());
    let theirs: Value = client
        .get(srv.url("/orders"))
        .bearer_auth(someone_else)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(theirs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn session_cookie_identifies_the_shopper() {
    let srv = TestServer::spawn().await;
    let user_id = UserId::new();
    let token = mint_jwt(JWT_SECRET, user_id);

    let res = reqwest::Client::new()
        .get(srv.url("/whoami"))
        .header("cookie", format!("theme=dark; auth_token={token}"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["email"], "ann@example.com");
}

#[tokio::test]
async fn forged_token_falls_back_to_guest_checkout() {
    let srv = TestServer::spawn().await;
    let apples = srv.stock("Fresh Apples", 499, 10).await;
    let forged = mint_jwt("wrong-secret", UserId::new());
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/orders"))
        .bearer_auth(&forged)
        .json(&checkout(json!([{ "product_id": apples.to_string(), "quantity": 1 }])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let id = body["order"]["id"].as_str().unwrap();

    let order: Value = client
        .get(srv.url(&format!("/orders/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order["user_id"], Value::Null);

    let whoami: Value = client
        .get(srv.url("/whoami"))
        .bearer_auth(&forged)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(whoami["authenticated"], false);
}

#[tokio::test]
async fn unknown_or_malformed_order_ids_are_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for id in [freshcart_core::OrderId::new().to_string(), "not-a-uuid".to_string()] {
        let res = client.get(srv.url(&format!("/orders/{id}"))).send().await.unwrap();
        let (status, body) = error_body(res).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }
}
