//! Integration tests for the HTTP token gateway

use serde_json::json;
use std::time::Duration;
use vending_tokens::{
    AppId, CreateTokenParams, GatewayConfig, GatewayError, HttpTokenGateway, TokenGateway,
    TokenId, TokenState,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> HttpTokenGateway {
    let config = GatewayConfig::new(&server.uri()).unwrap();
    HttpTokenGateway::new(&config).unwrap()
}

fn token_json(id: &str, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("name-{}", id),
        "state": state,
        "created": "2024-03-01T12:00:00Z",
        "changed": "2024-03-02T12:00:00Z"
    })
}

#[tokio::test]
async fn test_list_parses_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vending/app/org.example.App/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "tokens": [token_json("t1", "unredeemed"), token_json("t2", "cancelled")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = gateway_for(&server)
        .list(&AppId::from("org.example.App"))
        .await
        .unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens.tokens[0].id, TokenId::from("t1"));
    assert_eq!(tokens.tokens[1].state, TokenState::Cancelled);
    assert!(tokens.tokens[0].changed.is_some());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vending/app/app1/tokens"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tokens": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = GatewayConfig::new(&server.uri()).unwrap();
    config.api_token = Some("secret".to_string());
    let gateway = HttpTokenGateway::new(&config).unwrap();

    let tokens = gateway.list(&AppId::from("app1")).await.unwrap();
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn test_list_rejection_uses_backend_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vending/app/app1/tokens"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "not-app-developer"})),
        )
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .list(&AppId::from("app1"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Rejected {
            status: 403,
            key: "not-app-developer".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_list_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vending/app/app1/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"tokens\": [42]}"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .list(&AppId::from("app1"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidResponse(_)));
    assert_eq!(err.message_key(), "invalid-response");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vending/app/app1/tokens"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tokens": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = GatewayConfig::new(&server.uri()).unwrap();
    config.timeout = Duration::from_millis(50);
    let gateway = HttpTokenGateway::new(&config).unwrap();

    let err = gateway.list(&AppId::from("app1")).await.unwrap_err();
    assert_eq!(err, GatewayError::Timeout);
    assert_eq!(err.message_key(), "network-timeout");
}

#[tokio::test]
async fn test_create_posts_name_and_returns_first_token() {
    let server = MockServer::start().await;
    let mut created = token_json("t9", "unredeemed");
    created["token"] = json!("s3cr3t");

    Mock::given(method("POST"))
        .and(path("/vending/app/app1/tokens"))
        .and(body_json(json!(["ci"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([created])))
        .expect(1)
        .mount(&server)
        .await;

    let token = gateway_for(&server)
        .create(&AppId::from("app1"), &CreateTokenParams::new("ci"))
        .await
        .unwrap();

    assert_eq!(token.id, TokenId::from("t9"));
    assert_eq!(token.token.as_deref(), Some("s3cr3t"));
}

#[tokio::test]
async fn test_create_with_empty_response_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vending/app/app1/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .create(&AppId::from("app1"), &CreateTokenParams::new("ci"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_revoke_posts_to_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vending/app/app1/tokens/cancel"))
        .and(body_json(json!(["t1"])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"token": "t1", "status": "cancelled"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server)
        .revoke(&AppId::from("app1"), &TokenId::from("t1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on the tcpmux port locally
    let config = GatewayConfig::new("http://127.0.0.1:1").unwrap();
    let gateway = HttpTokenGateway::new(&config).unwrap();

    let err = gateway.list(&AppId::from("app1")).await.unwrap_err();
    assert!(err.is_network_error());
}
