use serde_json::{json, Map, Value};
use switchboard::Credential;
use v0_mcp::platform::Operation;
use v0_mcp::{HttpPlatform, Platform, PlatformCall, UpstreamError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn key() -> Credential {
    Credential::new("key123").unwrap()
}

async fn platform(server: &MockServer) -> HttpPlatform {
    HttpPlatform::new(&format!("{}/v1", server.uri()), None).unwrap()
}

#[tokio::test]
async fn test_get_fills_path_and_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chats/c1"))
        .and(header("authorization", "Bearer key123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c1" })))
        .expect(1)
        .mount(&server)
        .await;

    let response = platform(&server)
        .await
        .perform(
            PlatformCall::new(Operation::ChatsGetById, params(json!({ "chatId": "c1" }))),
            &key(),
        )
        .await
        .unwrap();

    assert_eq!(response, json!({ "id": "c1" }));
}

#[tokio::test]
async fn test_get_sends_rest_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chats"))
        .and(query_param("limit", "5"))
        .and(query_param("isFavorite", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    platform(&server)
        .await
        .perform(
            PlatformCall::new(
                Operation::ChatsFind,
                params(json!({ "limit": 5, "isFavorite": true })),
            ),
            &key(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_sends_rest_as_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/p1/env-vars/delete"))
        .and(body_json(json!({ "environmentVariableIds": ["e1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    platform(&server)
        .await
        .perform(
            PlatformCall::new(
                Operation::ProjectsDeleteEnvVars,
                params(json!({ "projectId": "p1", "environmentVariableIds": ["e1"] })),
            ),
            &key(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/chats/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": { "message": "Chat not found" } })),
        )
        .mount(&server)
        .await;

    let err = platform(&server)
        .await
        .perform(
            PlatformCall::new(Operation::ChatsDelete, params(json!({ "chatId": "missing" }))),
            &key(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UpstreamError::Status {
            status: 404,
            message: "Chat not found".to_string(),
        }
    );
}

#[tokio::test]
async fn test_empty_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/hooks/h1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = platform(&server)
        .await
        .perform(
            PlatformCall::new(Operation::HooksDelete, params(json!({ "hookId": "h1" }))),
            &key(),
        )
        .await
        .unwrap();

    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn test_garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = platform(&server)
        .await
        .perform(PlatformCall::new(Operation::UserGet, Map::new()), &key())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Decode(_)));
}

#[tokio::test]
async fn test_empty_id_never_reaches_the_list_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let err = platform(&server)
        .await
        .perform(
            PlatformCall::new(Operation::ChatsGetById, params(json!({ "chatId": "" }))),
            &key(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::InvalidCall(_)));
}
