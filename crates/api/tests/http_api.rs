use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use webstore_auth::{GoogleTokenVerifier, Role, SessionClaims, VerifiedIdentity, VerifyError};
use webstore_core::SellerId;
use webstore_infra::Stores;

/// Stands in for the Google tokeninfo call: every token verifies as the
/// configured identity, or fails when none is configured.
struct StubVerifier {
    identity: Option<VerifiedIdentity>,
}

impl StubVerifier {
    fn verifying(email: &str, name: &str) -> Self {
        Self {
            identity: Some(VerifiedIdentity {
                email: email.to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn rejecting() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl GoogleTokenVerifier for StubVerifier {
    async fn verify(&self, _id_token: &str) -> Result<VerifiedIdentity, VerifyError> {
        self.identity.clone().ok_or(VerifyError::Rejected)
    }
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str, verifier: StubVerifier) -> Self {
        // Same router as prod over in-memory stores, bound to an ephemeral port.
        let app = webstore_api::app::build_app_with(
            Stores::in_memory(),
            Arc::new(verifier),
            jwt_secret.to_string(),
        )
        .await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_token(jwt_secret: &str, role: Role, seller_id: Option<SellerId>) -> String {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: "test@example.com".to_string(),
        role,
        seller_id,
        user_id: None,
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode session token")
}

async fn create(
    client: &reqwest::Client,
    url: String,
    body: serde_json::Value,
) -> serde_json::Value {
    let res = client.post(url).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

/// Category + catalogue + their association; returns (catalogue id, category id).
async fn seed_placement(client: &reqwest::Client, base: &str) -> (String, String) {
    let category = create(
        client,
        format!("{base}/api/categories"),
        json!({ "name": "Electronics", "description": "Gadgets" }),
    )
    .await;
    let catalogue = create(
        client,
        format!("{base}/api/catalogues"),
        json!({ "name": "Summer", "description": "Warm season picks" }),
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();
    let catalogue_id = catalogue["id"].as_str().unwrap().to_string();
    create(
        client,
        format!("{base}/api/catalogue-categories"),
        json!({ "catalogueId": catalogue_id, "categoryId": category_id }),
    )
    .await;
    (catalogue_id, category_id)
}

async fn seed_seller(client: &reqwest::Client, base: &str, name: &str, email: &str) -> String {
    let seller = create(
        client,
        format!("{base}/api/sellers"),
        json!({ "name": name, "email": email, "joiningDate": "2024-01-15" }),
    )
    .await;
    seller["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_bearer_tokens_are_rejected() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/categories", srv.base_url))
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn empty_collections_answer_no_content() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;

    let client = reqwest::Client::new();
    for path in ["/api/products", "/api/sellers", "/api/catalogues"] {
        let res = client
            .get(format!("{}{path}", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT, "{path}");
    }
}

#[tokio::test]
async fn anonymous_visitors_can_browse_the_catalog() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let category = create(
        &client,
        format!("{}/api/categories", srv.base_url),
        json!({ "name": "Books", "description": "Paper things" }),
    )
    .await;
    let id = category["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/api/categories/{id}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let view: serde_json::Value = res.json().await.unwrap();
    assert_eq!(view["name"], "Books");
    assert_eq!(view["productCount"], 0);
    assert_eq!(view["catalogues"], json!([]));
}

#[tokio::test]
async fn google_login_returns_a_usable_session_token() {
    let srv = TestServer::spawn("test-secret", StubVerifier::verifying("jo@shop.test", "Jo")).await;
    let client = reqwest::Client::new();

    let seller_id = seed_seller(&client, &srv.base_url, "Jo's Shop", "jo@shop.test").await;

    let res = client
        .post(format!("{}/api/auth/google", srv.base_url))
        .json(&json!({ "googleToken": "stub", "userType": "seller" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let outcome: serde_json::Value = res.json().await.unwrap();
    assert_eq!(outcome["role"], "SELLER");
    assert_eq!(outcome["email"], "jo@shop.test");
    assert_eq!(outcome["sellerId"].as_str().unwrap(), seller_id);
    let token = outcome["jwtToken"].as_str().unwrap();
    assert!(!token.is_empty());

    // The issued token must be accepted by the middleware.
    let res = client
        .get(format!("{}/api/products", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn login_fails_for_unverified_google_tokens() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/google", srv.base_url))
        .json(&json!({ "googleToken": "bogus" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Authentication failed: Invalid Google token");
}

#[tokio::test]
async fn login_fails_for_inactive_sellers() {
    let srv =
        TestServer::spawn("test-secret", StubVerifier::verifying("mo@shop.test", "Mo")).await;
    let client = reqwest::Client::new();

    create(
        &client,
        format!("{}/api/sellers", srv.base_url),
        json!({
            "name": "Mo's Shop",
            "email": "mo@shop.test",
            "status": "INACTIVE",
            "joiningDate": "2024-01-15"
        }),
    )
    .await;

    let res = client
        .post(format!("{}/api/auth/google", srv.base_url))
        .json(&json!({ "googleToken": "stub" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Seller account is not active");
}

#[tokio::test]
async fn product_search_returns_enriched_views() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let (catalogue_id, category_id) = seed_placement(&client, &srv.base_url).await;
    let seller_id = seed_seller(&client, &srv.base_url, "Ada's Shop", "ada@shop.test").await;

    create(
        &client,
        format!("{}/api/products", srv.base_url),
        json!({
            "name": "Phone",
            "description": "A phone",
            "stock": 10,
            "catalogueId": catalogue_id,
            "categoryId": category_id,
            "sellerId": seller_id
        }),
    )
    .await;

    let res = client
        .get(format!(
            "{}/api/products/search?searchTerm=Phone",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(hits.len(), 1);
    let view = &hits[0];
    assert_eq!(view["name"], "Phone");
    assert_eq!(view["stock"], 10);
    assert_eq!(view["sellerId"].as_str().unwrap(), seller_id);
    assert_eq!(view["catalogueCategory"]["catalogueName"], "Summer");
    assert_eq!(view["catalogueCategory"]["categoryName"], "Electronics");
    assert_eq!(view["prices"], json!([]));
}

#[tokio::test]
async fn sellers_only_see_their_own_products() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let (catalogue_id, category_id) = seed_placement(&client, &srv.base_url).await;
    let seller_id = seed_seller(&client, &srv.base_url, "Ada's Shop", "ada@shop.test").await;
    let product = create(
        &client,
        format!("{}/api/products", srv.base_url),
        json!({
            "name": "Phone",
            "catalogueId": catalogue_id,
            "categoryId": category_id,
            "sellerId": seller_id
        }),
    )
    .await;
    let product_id = product["id"].as_str().unwrap();

    let stranger = mint_token(jwt_secret, Role::Seller, Some(SellerId::new()));
    let res = client
        .get(format!("{}/api/products/{product_id}", srv.base_url))
        .bearer_auth(stranger)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Access denied: Product does not belong to your seller account"
    );

    let owner = mint_token(
        jwt_secret,
        Role::Seller,
        Some(seller_id.parse().unwrap()),
    );
    let res = client
        .get(format!("{}/api/products/{product_id}", srv.base_url))
        .bearer_auth(owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn seller_tokens_cannot_manage_categories() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret, StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let token = mint_token(jwt_secret, Role::Seller, Some(SellerId::new()));
    let res = client
        .post(format!("{}/api/categories", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Sneaky" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Sellers cannot create categories");

    // Admin tokens pass the same guard.
    let admin = mint_token(jwt_secret, Role::Admin, None);
    let res = client
        .post(format!("{}/api/categories", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Allowed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn seller_status_count_is_a_bare_number() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    seed_seller(&client, &srv.base_url, "One", "one@shop.test").await;
    seed_seller(&client, &srv.base_url, "Two", "two@shop.test").await;
    create(
        &client,
        format!("{}/api/sellers", srv.base_url),
        json!({
            "name": "Resting",
            "email": "rest@shop.test",
            "status": "INACTIVE",
            "joiningDate": "2024-01-15"
        }),
    )
    .await;

    let res = client
        .get(format!("{}/api/sellers/count/ACTIVE", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let count: serde_json::Value = res.json().await.unwrap();
    assert_eq!(count.as_u64(), Some(2));
}

#[tokio::test]
async fn malformed_ids_answer_bad_request() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/sellers/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn currencies_are_seeded_on_startup() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/currencies", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let currencies: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(currencies.len(), 4);
    assert!(currencies.iter().any(|c| c["code"] == "USD"));
}

#[tokio::test]
async fn price_lines_reject_duplicate_currency() {
    let srv = TestServer::spawn("test-secret", StubVerifier::rejecting()).await;
    let client = reqwest::Client::new();

    let (catalogue_id, category_id) = seed_placement(&client, &srv.base_url).await;
    let seller_id = seed_seller(&client, &srv.base_url, "Ada's Shop", "ada@shop.test").await;
    let product = create(
        &client,
        format!("{}/api/products", srv.base_url),
        json!({
            "name": "Phone",
            "catalogueId": catalogue_id,
            "categoryId": category_id,
            "sellerId": seller_id
        }),
    )
    .await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/api/currencies", srv.base_url))
        .send()
        .await
        .unwrap();
    let currencies: Vec<serde_json::Value> = res.json().await.unwrap();
    let currency_id = currencies[0]["id"].as_str().unwrap().to_string();

    let detail = create(
        &client,
        format!("{}/api/product-prices", srv.base_url),
        json!({ "productId": product_id, "currencyId": currency_id, "amount": 49900 }),
    )
    .await;
    assert_eq!(detail["amount"], 49900);
    assert_eq!(detail["productName"], "Phone");

    let res = client
        .post(format!("{}/api/product-prices", srv.base_url))
        .json(&json!({ "productId": product_id, "currencyId": currency_id, "amount": 59900 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");

    let res = client
        .get(format!(
            "{}/api/product-prices/product/{product_id}",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let lines: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(lines.len(), 1);
}
