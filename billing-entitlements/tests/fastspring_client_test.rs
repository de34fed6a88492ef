// tests/fastspring_client_test.rs

use billing_entitlements::error::AppError;
use billing_entitlements::infrastructure::fastspring::{
    AccountContact, AccountOptions, FastspringClient, HttpFastspringClient,
};
use httpmock::prelude::*;
use serde_json::json;

// "user:pass"
const BASIC_AUTH: &str = "Basic dXNlcjpwYXNz";

fn client(server: &MockServer) -> HttpFastspringClient {
    HttpFastspringClient::new(server.base_url(), "user", "pass").unwrap()
}

fn options() -> AccountOptions {
    AccountOptions {
        contact: AccountContact {
            first: "Ada".to_string(),
            last: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            phone: None,
        },
        language: None,
        country: Some("GB".to_string()),
    }
}

#[tokio::test]
async fn create_account_posts_options_with_basic_auth() {
    let server = MockServer::start_async().await;

    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/accounts")
                .header("authorization", BASIC_AUTH)
                .json_body(json!({
                    "contact": {
                        "first": "Ada",
                        "last": "Lovelace",
                        "email": "ada@example.com"
                    },
                    "country": "GB"
                }));
            then.status(200).json_body(json!({
                "account": "fs-abc",
                "action": "account.create",
                "result": "success"
            }));
        })
        .await;

    let response = client(&server).create_account(&options()).await.unwrap();

    assert_eq!(response.account, "fs-abc");
    assert_eq!(response.action, "account.create");
    assert_eq!(response.result, "success");
    create_mock.assert_async().await;
}

#[tokio::test]
async fn update_and_get_account_use_account_paths() {
    let server = MockServer::start_async().await;

    let update_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/accounts/fs-abc")
                .header("authorization", BASIC_AUTH);
            then.status(200).json_body(json!({
                "account": "fs-abc",
                "action": "account.update",
                "result": "success"
            }));
        })
        .await;

    let get_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/accounts/fs-abc");
            then.status(200).json_body(json!({
                "id": "fs-abc",
                "account": "fs-abc",
                "contact": {
                    "first": "Ada",
                    "last": "Lovelace",
                    "email": "ada@example.com"
                },
                "language": "en",
                "country": "GB",
                "subscriptions": ["sub-1"],
                "orders": [],
                "result": "success"
            }));
        })
        .await;

    let client = client(&server);

    let updated = client.update_account("fs-abc", &options()).await.unwrap();
    assert_eq!(updated.action, "account.update");

    let account = client.get_account("fs-abc").await.unwrap();
    assert_eq!(account.id, "fs-abc");
    assert_eq!(account.contact.email, "ada@example.com");
    assert_eq!(account.subscriptions, vec!["sub-1".to_string()]);

    update_mock.assert_async().await;
    get_mock.assert_async().await;
}

#[tokio::test]
async fn account_management_uri_reads_authenticate_endpoint() {
    let server = MockServer::start_async().await;

    let auth_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/accounts/fs-abc/authenticate");
            then.status(200).json_body(json!({
                "accounts": [
                    { "account": "fs-abc", "url": "https://store.example.com/account/xyz" }
                ]
            }));
        })
        .await;

    let response = client(&server)
        .get_account_management_uri("fs-abc")
        .await
        .unwrap();

    assert_eq!(response.accounts.len(), 1);
    assert_eq!(
        response.accounts[0].url,
        "https://store.example.com/account/xyz"
    );
    auth_mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_maps_to_external_service_error() {
    let server = MockServer::start_async().await;

    let failing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/accounts/missing");
            then.status(404).json_body(json!({ "result": "error" }));
        })
        .await;

    let result = client(&server).get_account("missing").await;

    assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    failing_mock.assert_async().await;
}

#[tokio::test]
async fn malformed_body_maps_to_external_service_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/accounts");
            then.status(200).body("not json");
        })
        .await;

    let result = client(&server).create_account(&options()).await;
    assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
}
