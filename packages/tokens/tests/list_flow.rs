//! End-to-end list behaviour: controller + view model over the HTTP gateway

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use vending_tokens::{
    AppId, CreateTokenParams, EnglishCatalog, GatewayConfig, HttpTokenGateway, ListContainer,
    ListController, ListView, MessageCatalog, TokenId,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKENS_PATH: &str = "/vending/app/app1/tokens";

fn token(id: &str) -> serde_json::Value {
    json!({"id": id, "name": id, "state": "unredeemed", "created": "2024-01-01T00:00:00Z"})
}

fn tokens(ids: &[&str]) -> ResponseTemplate {
    let list: Vec<_> = ids.iter().map(|id| token(id)).collect();
    ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "tokens": list}))
}

fn container_for(server: &MockServer) -> ListContainer {
    let config = GatewayConfig::new(&server.uri()).unwrap();
    let gateway = HttpTokenGateway::new(&config).unwrap();
    ListContainer::new(ListController::new(Arc::new(gateway)))
}

fn keys(view: &ListView<'_>) -> Vec<String> {
    view.items().iter().map(|i| i.key().to_string()).collect()
}

#[tokio::test]
async fn test_two_tokens_then_create_control() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t1", "t2"]))
        .expect(1)
        .mount(&server)
        .await;

    let mut container = container_for(&server);
    container.mount(AppId::from("app1")).await;

    let view = container.view();
    assert_eq!(keys(&view), vec!["t1", "t2"]);
    assert!(view.create().is_some());
}

#[tokio::test]
async fn test_timeout_key_is_translated_without_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(
            ResponseTemplate::new(504).set_body_json(json!({"detail": "network-timeout"})),
        )
        .mount(&server)
        .await;

    let mut container = container_for(&server);
    container.mount(AppId::from("app1")).await;

    let view = container.view();
    let ListView::Failed(error) = &view else {
        panic!("expected error view, got {:?}", view);
    };
    assert_eq!(
        EnglishCatalog.translate(error.message_key()),
        "The server took too long to respond"
    );
    assert!(view.items().is_empty());
    assert!(view.create().is_none());
}

#[tokio::test]
async fn test_refresh_twice_is_stable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t1", "t2"]))
        .expect(3)
        .mount(&server)
        .await;

    let mut container = container_for(&server);
    container.mount(AppId::from("app1")).await;
    let first = keys(&container.view());

    container.refresh().await;
    container.refresh().await;

    assert_eq!(keys(&container.view()), first);
}

#[tokio::test]
async fn test_create_then_list_shows_three() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t1", "t2"]))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKENS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([token("t3")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t1", "t2", "t3"]))
        .mount(&server)
        .await;

    let mut container = container_for(&server);
    container.mount(AppId::from("app1")).await;
    assert_eq!(container.view().items().len(), 2);

    let created = container.create(&CreateTokenParams::new("t3")).await;

    assert_eq!(created.map(|t| t.id), Some(TokenId::from("t3")));
    assert_eq!(keys(&container.view()), vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn test_revoke_then_list_drops_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t1", "t2"]))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vending/app/app1/tokens/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t2"]))
        .mount(&server)
        .await;

    let mut container = container_for(&server);
    container.mount(AppId::from("app1")).await;
    container.disclosure_mut().toggle(&TokenId::from("t1"));

    container.revoke(&TokenId::from("t1")).await;

    assert_eq!(keys(&container.view()), vec!["t2"]);
    assert!(!container.disclosure().is_open(&TokenId::from("t1")));
}

#[tokio::test]
async fn test_failed_revoke_still_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKENS_PATH))
        .respond_with(tokens(&["t1"]))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vending/app/app1/tokens/cancel"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut container = container_for(&server);
    container.mount(AppId::from("app1")).await;
    container.revoke(&TokenId::from("t1")).await;

    assert_eq!(keys(&container.view()), vec!["t1"]);
}
