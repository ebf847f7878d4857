mod common;

use common::{handler, key, StubPlatform};
use serde_json::json;
use v0_mcp::platform::Operation;
use v0_mcp::UpstreamError;

#[tokio::test]
async fn test_create_chat_shows_id_and_url() {
    let (handler, stub) = handler(StubPlatform::new().respond(
        Operation::ChatsCreate,
        json!({ "id": "c1", "url": "https://v0.dev/chat/c1" }),
    ));

    let result = handler
        .dispatcher()
        .dispatch("create_chat", &json!({ "message": "Build a todo app" }), &key("key123"))
        .await;

    assert!(!result.is_error);
    let text = result.joined_text();
    assert!(text.contains("c1"), "{}", text);
    assert!(text.contains("https://v0.dev/chat/c1"), "{}", text);

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, "key123");
    assert_eq!(calls[0].call.operation, Operation::ChatsCreate);
    assert_eq!(calls[0].call.params.get("message"), Some(&json!("Build a todo app")));
    assert!(!calls[0].call.params.contains_key("modelConfiguration"));
}

#[tokio::test]
async fn test_create_chat_nests_model_configuration() {
    let (handler, stub) = handler(StubPlatform::new());

    handler
        .dispatcher()
        .dispatch(
            "create_chat",
            &json!({ "message": "hi", "modelId": "v0-1.5-md", "imageGenerations": true }),
            &key("key123"),
        )
        .await;

    let params = &stub.calls()[0].call.params;
    assert_eq!(
        params.get("modelConfiguration"),
        Some(&json!({ "modelId": "v0-1.5-md", "imageGenerations": true }))
    );
    assert!(!params.contains_key("modelId"));
}

#[tokio::test]
async fn test_missing_required_never_reaches_platform() {
    let (handler, stub) = handler(StubPlatform::new());

    let result = handler
        .dispatcher()
        .dispatch("get_chat", &json!({}), &key("key123"))
        .await;

    assert!(result.is_error);
    let text = result.joined_text();
    assert!(text.starts_with("Error getting chat:"), "{}", text);
    assert!(text.contains("chatId"), "{}", text);
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_every_bad_field_listed_at_once() {
    let (handler, stub) = handler(StubPlatform::new());

    let result = handler
        .dispatcher()
        .dispatch(
            "create_chat",
            &json!({ "chatPrivacy": "everyone", "thinking": "yes" }),
            &key("key123"),
        )
        .await;

    let text = result.joined_text();
    assert!(text.contains("message is required"), "{}", text);
    assert!(text.contains("chatPrivacy must be one of"), "{}", text);
    assert!(text.contains("thinking must be a boolean"), "{}", text);
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_upstream_404_is_a_result() {
    let (handler, _stub) = handler(StubPlatform::new().fail(
        Operation::ChatsDelete,
        UpstreamError::Status {
            status: 404,
            message: "Chat not found".to_string(),
        },
    ));

    let result = handler
        .dispatcher()
        .dispatch("delete_chat", &json!({ "chatId": "c1" }), &key("key123"))
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.joined_text(),
        "Error deleting chat: HTTP 404: Chat not found"
    );
}

#[tokio::test]
async fn test_unknown_tool_is_a_result() {
    let (handler, stub) = handler(StubPlatform::new());

    let result = handler
        .dispatcher()
        .dispatch("launch_rocket", &json!({}), &key("key123"))
        .await;

    assert!(result.is_error);
    assert_eq!(result.joined_text(), "Error: unknown tool 'launch_rocket'");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_same_response_same_envelope() {
    let (handler, stub) = handler(StubPlatform::new().respond(
        Operation::UserGet,
        json!({ "id": "u1", "name": "Ada", "email": "ada@example.com" }),
    ));
    let dispatcher = handler.dispatcher();

    let first = dispatcher.dispatch("get_user_info", &json!({}), &key("key123")).await;
    let second = dispatcher.dispatch("get_user_info", &json!({}), &key("key123")).await;

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(stub.calls().len(), 2);
}

#[tokio::test]
async fn test_credential_is_per_call() {
    let (handler, stub) = handler(StubPlatform::new());
    let dispatcher = handler.dispatcher();

    dispatcher.dispatch("find_projects", &json!({}), &key("alice")).await;
    dispatcher.dispatch("find_projects", &json!({}), &key("bob")).await;

    let keys: Vec<_> = stub.calls().into_iter().map(|c| c.api_key).collect();
    assert_eq!(keys, vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_unknown_arguments_dropped_and_defaults_applied() {
    let (handler, stub) = handler(StubPlatform::new());

    handler
        .dispatcher()
        .dispatch(
            "find_env_vars",
            &json!({ "projectId": "p1", "verbose": true }),
            &key("key123"),
        )
        .await;

    let params = &stub.calls()[0].call.params;
    assert_eq!(params.get("decrypted"), Some(&json!(false)));
    assert!(!params.contains_key("verbose"));
}

#[tokio::test]
async fn test_delete_env_vars_renames_ids() {
    let (handler, stub) = handler(StubPlatform::new());

    handler
        .dispatcher()
        .dispatch(
            "delete_env_vars",
            &json!({ "projectId": "p1", "ids": ["e1"] }),
            &key("key123"),
        )
        .await;

    let params = &stub.calls()[0].call.params;
    assert_eq!(params.get("environmentVariableIds"), Some(&json!(["e1"])));
    assert!(!params.contains_key("ids"));
}

#[tokio::test]
async fn test_pagination_passes_through() {
    let (handler, stub) = handler(StubPlatform::new().respond(
        Operation::ChatsFindMessages,
        json!({ "data": [{ "id": "m1", "role": "user" }], "pagination": { "nextCursor": "n2" } }),
    ));

    let result = handler
        .dispatcher()
        .dispatch(
            "find_messages",
            &json!({ "chatId": "c1", "limit": 1, "cursor": "n1" }),
            &key("key123"),
        )
        .await;

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].call.params.get("cursor"), Some(&json!("n1")));
    assert!(result.joined_text().contains("Next cursor: n2"));
}
