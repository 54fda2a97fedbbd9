//! Integration tests for the request transport: classification, retry
//! budget, typed exhaustion errors, and the convenience methods. Single-shot
//! responses use mockito; sequenced responses use the scripted local server.

mod common;

use std::time::Duration;

use botgram_client::{
    ApiClient, ApiClientError, Bot, ClientOptions, DeleteWebhookParams, SendMessageParams,
};
use botgram_core::{Update, User};
use common::{spawn_scripted, spawn_slow, spawn_stalled_body, update_json, ScriptedApi};
use serde_json::json;

const TOKEN: &str = "test-token";

fn options(api_base: String, max_retries: u32) -> ClientOptions {
    ClientOptions {
        api_base: Some(api_base),
        timeout: Some(Duration::from_secs(5)),
        max_retries: Some(max_retries),
    }
}

#[tokio::test]
async fn test_call_posts_json_and_decodes_result() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/getMe")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok": true, "result": {"id": 42, "is_bot": true, "first_name": "TestBot", "username": "testbot"}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::with_options(TOKEN, options(server.url(), 3));
    let me: User = client.call("getMe", &json!({})).await.unwrap();

    assert_eq!(me.id, 42);
    assert_eq!(me.username.as_deref(), Some("testbot"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_is_fatal_and_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/sendMessage")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::with_options(TOKEN, options(server.url(), 3));
    let result: Result<botgram_core::Message, _> = client
        .call("sendMessage", &SendMessageParams::new(1, "hi"))
        .await;

    match result {
        Err(ApiClientError::Api {
            code, description, ..
        }) => {
            assert_eq!(code, Some(400));
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("expected api error, got {:?}", other.map(|_| ())),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_persistent_rate_limit_exhausts_to_rate_limit_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/sendMessage")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok": false, "error_code": 429, "description": "Too Many Requests: retry after 0", "parameters": {"retry_after": 0}}"#,
        )
        .expect(3)
        .create_async()
        .await;

    let client = ApiClient::with_options(TOKEN, options(server.url(), 3));
    let result: Result<botgram_core::Message, _> = client
        .call("sendMessage", &SendMessageParams::new(1, "hi"))
        .await;

    match result {
        Err(ApiClientError::RateLimited {
            retry_after,
            attempts,
            ..
        }) => {
            assert_eq!(retry_after, Some(0));
            assert_eq!(attempts, 3);
        }
        other => panic!("expected rate limit error, got {:?}", other.map(|_| ())),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_persistent_5xx_exhausts_to_server_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/getUpdates")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "description": "Internal Server Error"}"#)
        .expect(2)
        .create_async()
        .await;

    let client = ApiClient::with_options(TOKEN, options(server.url(), 2));
    let result: Result<Vec<Update>, _> = client.call("getUpdates", &json!({})).await;

    assert!(matches!(
        result,
        Err(ApiClientError::Server {
            status: 500,
            attempts: 2,
            ..
        })
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_undecodable_body_is_fatal_on_first_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/getMe")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::with_options(TOKEN, options(server.url(), 3));
    let result: Result<User, _> = client.call("getMe", &json!({})).await;

    assert!(matches!(
        result,
        Err(ApiClientError::MalformedResponse { .. })
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_recovers_within_budget_after_transient_5xx() {
    let api = ScriptedApi::new(vec![
        (500, json!({"ok": false, "description": "boom"})),
        (500, json!({"ok": false, "description": "boom"})),
        (200, json!({"ok": true, "result": [update_json(5, "hello")]})),
    ]);
    let base = spawn_scripted("/bottest-token/getUpdates", api.clone()).await;

    let client = ApiClient::with_options(TOKEN, options(base, 3));
    let updates: Vec<Update> = client.call("getUpdates", &json!({})).await.unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 5);
    assert_eq!(api.hits(), 3);
}

#[tokio::test]
async fn test_timeout_exhaustion_names_method_and_deadline() {
    let base = spawn_slow("/bottest-token/getMe", Duration::from_secs(2)).await;

    let client = ApiClient::with_options(
        TOKEN,
        ClientOptions {
            api_base: Some(base),
            timeout: Some(Duration::from_millis(100)),
            max_retries: Some(2),
        },
    );
    let result: Result<User, _> = client.call("getMe", &json!({})).await;

    match result {
        Err(ApiClientError::Timeout { method, timeout_ms }) => {
            assert_eq!(method, "getMe");
            assert_eq!(timeout_ms, 100);
        }
        other => panic!("expected timeout error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_timeout_while_reading_body_is_reported_as_timeout() {
    let base = spawn_stalled_body(Duration::from_secs(2)).await;

    let client = ApiClient::with_options(
        TOKEN,
        ClientOptions {
            api_base: Some(base),
            timeout: Some(Duration::from_millis(100)),
            max_retries: Some(2),
        },
    );
    let result: Result<User, _> = client.call("getMe", &json!({})).await;

    match result {
        Err(ApiClientError::Timeout { method, timeout_ms }) => {
            assert_eq!(method, "getMe");
            assert_eq!(timeout_ms, 100);
        }
        other => panic!("expected timeout error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_bot_send_message_sends_typed_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/sendMessage")
        .match_body(mockito::Matcher::PartialJson(
            json!({"chat_id": 7, "text": "hi"}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok": true, "result": {"message_id": 9, "chat": {"id": 7, "type": "private"}, "date": 1700000000, "text": "hi"}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let bot = Bot::with_options(TOKEN, options(server.url(), 3));
    let message = bot
        .send_message(&SendMessageParams::new(7, "hi"))
        .await
        .unwrap();

    assert_eq!(message.message_id, 9);
    assert_eq!(message.chat.id, 7);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bot_delete_webhook_returns_flag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/deleteWebhook")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": true}"#)
        .expect(1)
        .create_async()
        .await;

    let bot = Bot::with_options(TOKEN, options(server.url(), 3));
    let dropped = bot
        .delete_webhook(&DeleteWebhookParams::default())
        .await
        .unwrap();

    assert!(dropped);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bot_api_accessor_reaches_unwrapped_methods() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bottest-token/getWebhookInfo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": {"url": "", "pending_update_count": 3}}"#)
        .expect(1)
        .create_async()
        .await;

    let bot = Bot::with_options(TOKEN, options(server.url(), 3));
    let info: serde_json::Value = bot.api().call("getWebhookInfo", &json!({})).await.unwrap();

    assert_eq!(info["pending_update_count"], 3);
    mock.assert_async().await;
}
