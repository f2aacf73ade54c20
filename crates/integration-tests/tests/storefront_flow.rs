//! Integration tests for the storefront customer journey.
//!
//! These tests require:
//! - A running `PostgreSQL` database with the schema and catalog (`hbr-cli db init`)
//! - The storefront running (cargo run -p hbr-pharmacy-storefront)
//!
//! Run with: cargo test -p hbr-pharmacy-integration-tests -- --ignored

use hbr_pharmacy_integration_tests::{TestCustomer, client, url};
use reqwest::{Client, Response, StatusCode, header::LOCATION};

fn location(resp: &Response) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn get(client: &Client, path: &str) -> Response {
    client
        .get(url(path))
        .send()
        .await
        .unwrap_or_else(|e| panic!("GET {path} failed: {e}"))
}

async fn get_text(client: &Client, path: &str) -> String {
    get(client, path)
        .await
        .text()
        .await
        .expect("Failed to read response body")
}

async fn register_and_login(client: &Client) -> TestCustomer {
    let customer = TestCustomer::unique();

    let resp = client
        .post(url("/register"))
        .form(&customer.registration_form())
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(location(&resp), "/login");

    let resp = client
        .post(url("/login"))
        .form(&customer.login_form())
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(location(&resp), "/");

    customer
}

// ============================================================================
// Health & Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_health_endpoints() {
    let client = client().expect("Failed to create HTTP client");

    let resp = get(&client, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = get(&client, "/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_catalog_lists_seeded_products() {
    let client = client().expect("Failed to create HTTP client");

    let body = get_text(&client, "/").await;
    assert!(body.contains("/add_to_cart/1"));
    assert!(body.contains("R$"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_cart_add_update_delete() {
    let client = client().expect("Failed to create HTTP client");

    let resp = get(&client, "/add_to_cart/1").await;
    assert_eq!(location(&resp), "/");
    let body = get_text(&client, "/").await;
    assert!(body.contains("Produto adicionado ao carrinho com sucesso!"));

    get(&client, "/add_to_cart/1").await;
    let body = get_text(&client, "/cart").await;
    assert!(body.contains("/update_cart/1/remove"));

    let resp = get(&client, "/update_cart/1/delete").await;
    assert_eq!(location(&resp), "/cart");
    let body = get_text(&client, "/cart").await;
    assert!(body.contains("Seu carrinho está vazio."));
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_checkout_requires_login() {
    let client = client().expect("Failed to create HTTP client");

    let resp = get(&client, "/checkout").await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login?next=%2Fcheckout");
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_duplicate_registration_is_rejected() {
    let client = client().expect("Failed to create HTTP client");
    let customer = register_and_login(&client).await;

    let other = hbr_pharmacy_integration_tests::client().expect("Failed to create HTTP client");
    let resp = other
        .post(url("/register"))
        .form(&customer.registration_form())
        .send()
        .await
        .expect("Failed to submit duplicate registration");
    assert_eq!(location(&resp), "/register");

    let body = get_text(&other, "/register").await;
    assert!(body.contains("Usuário, CPF ou Email já cadastrados."));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_wrong_password_is_rejected() {
    let client = client().expect("Failed to create HTTP client");
    let customer = register_and_login(&client).await;

    let other = hbr_pharmacy_integration_tests::client().expect("Failed to create HTTP client");
    let resp = other
        .post(url("/login"))
        .form(&[("username", customer.username.as_str()), ("password", "errada")])
        .send()
        .await
        .expect("Failed to submit login");
    assert!(location(&resp).starts_with("/login"));

    let body = get_text(&other, "/login").await;
    assert!(body.contains("Login inválido."));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_full_purchase_flow() {
    let client = client().expect("Failed to create HTTP client");
    let customer = register_and_login(&client).await;

    get(&client, "/add_to_cart/1").await;
    get(&client, "/add_to_cart/2").await;

    let body = get_text(&client, "/checkout").await;
    assert!(body.contains("card_number"));

    let resp = client
        .post(url("/checkout"))
        .form(&[
            ("card_name", "CLIENTE TESTE"),
            ("card_number", "4111 1111 1111 1111"),
            ("expiration", "12/30"),
            ("cvv", "123"),
        ])
        .send()
        .await
        .expect("Failed to submit payment");
    assert_eq!(location(&resp), "/success");

    let body = get_text(&client, "/success").await;
    assert!(body.contains("Pedido confirmado!"));
    assert!(body.contains(&customer.address));
    assert!(body.contains("final 1111"));

    let body = get_text(&client, "/cart").await;
    assert!(body.contains("Seu carrinho está vazio."));

    let resp = get(&client, "/logout").await;
    assert_eq!(location(&resp), "/login");
    let resp = get(&client, "/checkout").await;
    assert!(location(&resp).starts_with("/login"));
}
