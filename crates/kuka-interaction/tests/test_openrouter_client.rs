use kuka_core::client::{CatalogClient, ClientError, CompletionClient};
use kuka_infrastructure::config::ApiConfig;
use kuka_interaction::OpenRouterClient;
use mockito::{Matcher, Server};
use serde_json::json;

fn client_for(server: &Server) -> OpenRouterClient {
    let api = ApiConfig {
        base_url: server.url(),
        referer: "http://localhost:3000".to_string(),
        app_title: "KukaChat".to_string(),
        timeout_secs: 5,
    };
    OpenRouterClient::from_config(&api, "test-key").expect("Should build client")
}

#[tokio::test]
async fn test_list_models_parses_data_array() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [
                    {"id": "openai/gpt-4o", "name": "GPT-4o", "description": "Flagship", "context_length": 128000},
                    {"id": "meta-llama/llama-3:free", "name": "Llama 3"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let models = client_for(&server).list_models().await.expect("Should list models");

    mock.assert_async().await;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "openai/gpt-4o");
    assert_eq!(models[0].description, "Flagship");
    assert_eq!(models[1].description, "");
}

#[tokio::test]
async fn test_list_models_http_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(401)
        .with_body(json!({"error": {"message": "No auth credentials found"}}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).list_models().await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Http {
            status: 401,
            message: "No auth credentials found".to_string()
        }
    );
}

#[tokio::test]
async fn test_complete_sends_prompt_and_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_header("http-referer", "http://localhost:3000")
        .match_header("x-title", "KukaChat")
        .match_body(Matcher::Json(json!({
            "model": "gpt-x",
            "messages": [{"role": "user", "content": "Be brief\nHello"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "gen-1",
                "choices": [{"message": {"role": "assistant", "content": "Hi!"}}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reply = client_for(&server)
        .complete("gpt-x", "Be brief\nHello")
        .await
        .expect("Should complete");

    mock.assert_async().await;
    assert_eq!(reply, "Hi!");
}

#[tokio::test]
async fn test_complete_server_error_is_retryable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body(json!({"error": {"message": "Provider overloaded"}}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).complete("gpt-x", "Hello").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "HTTP error! status: 503, message: Provider overloaded"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_complete_without_choices_is_invalid() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": []}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).complete("gpt-x", "Hello").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid response from model gpt-x");
}

#[tokio::test]
async fn test_complete_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).complete("gpt-x", "Hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}
