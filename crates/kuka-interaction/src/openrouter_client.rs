//! OpenRouterClient - REST client for an OpenRouter-compatible inference API.
//!
//! Implements both halves of the API the chat client needs: the model
//! listing (`GET /models`) and single-turn chat completions
//! (`POST /chat/completions`).

use async_trait::async_trait;
use kuka_core::catalog::Model;
use kuka_core::client::{CatalogClient, ClientError, CompletionClient};
use kuka_infrastructure::config::{ApiConfig, DEFAULT_APP_TITLE, DEFAULT_BASE_URL, DEFAULT_REFERER};
use kuka_infrastructure::storage::{SecretStorage, resolve_api_key};
use kuka_infrastructure::KukaPaths;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

/// HTTP client for the hosted inference API.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    referer: String,
    app_title: String,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.base_url)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Creates a client for the default endpoint with the given bearer token.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }

    /// Creates a client from config.toml settings.
    pub fn from_config(api: &ApiConfig, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|err| ClientError::Transport {
                message: format!("failed to build HTTP client: {err}"),
                retryable: false,
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: api.base_url.clone(),
            referer: api.referer.clone(),
            app_title: api.app_title.clone(),
        })
    }

    /// Resolves the bearer token (secret.json, then `OPENROUTER_API_KEY`)
    /// and builds a client from `api`.
    pub fn try_from_env(paths: &KukaPaths, api: &ApiConfig) -> Result<Self, ClientError> {
        let storage = SecretStorage::new(paths);
        let api_key = resolve_api_key(storage.as_ref())
            .map_err(|err| ClientError::MissingApiKey(err.to_string()))?;
        Self::from_config(api, api_key)
    }

    /// Overrides the base URL after construction.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(map_http_error(status, &body))
    }
}

#[async_trait]
impl CatalogClient for OpenRouterClient {
    async fn list_models(&self) -> Result<Vec<Model>, ClientError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check_status(response).await?;
        let parsed: ModelsResponse = response
            .json()
            .await
            .map_err(|err| ClientError::Decode(format!("model list: {err}")))?;

        tracing::debug!(count = parsed.data.len(), "fetched model catalog");
        Ok(parsed.data)
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, model_id: &str, prompt: &str) -> Result<String, ClientError> {
        let body = ChatCompletionRequest {
            model: model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = model_id, "sending completion request");
        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check_status(response).await?;
        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ClientError::Decode(format!("completion from {model_id}: {err}")))?;

        extract_text_response(parsed, model_id)
    }
}

#[derive(Deserialize)]
struct ModelsResponse {
    data: Vec<Model>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_text_response(response: ChatCompletionResponse, model_id: &str) -> Result<String, ClientError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ClientError::InvalidResponse {
            model: model_id.to_string(),
        })
}

fn map_http_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| "Unknown error".to_string());

    ClientError::Http { status, message }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    ClientError::Transport {
        retryable: err.is_connect() || err.is_timeout(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_uses_api_message() {
        let err = map_http_error(429, r#"{"error":{"message":"Rate limit exceeded","code":429}}"#);
        assert_eq!(
            err,
            ClientError::Http {
                status: 429,
                message: "Rate limit exceeded".to_string()
            }
        );
    }

    #[test]
    fn test_map_http_error_without_json_body() {
        let err = map_http_error(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "HTTP error! status: 502, message: Unknown error");
    }

    #[test]
    fn test_extract_text_response_requires_choice() {
        let empty = ChatCompletionResponse { choices: vec![] };
        assert_eq!(
            extract_text_response(empty, "gpt-x").unwrap_err(),
            ClientError::InvalidResponse {
                model: "gpt-x".to_string()
            }
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = OpenRouterClient::new("key").with_base_url("http://localhost:1234/api/v1/");
        assert_eq!(
            client.endpoint("chat/completions"),
            "http://localhost:1234/api/v1/chat/completions"
        );
    }
}
