//! Completion service client

use crate::ai_sql::config::CompletionSettings;
use crate::ai_sql::error::CompletionError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Trait for completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the generated text for a prompt, unmodified
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Client for the OpenAI text completions endpoint
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    settings: CompletionSettings,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: String, settings: CompletionSettings) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CompletionError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.settings.model,
            prompt,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = self.build_request(prompt);

        debug!(
            "Calling completion API with model: {}, max_tokens: {}, temperature: {}, prompt length: {} chars",
            self.settings.model,
            self.settings.max_tokens,
            self.settings.temperature,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to read response body: {}", e)))?;

        if status != StatusCode::OK {
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let response_body: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| CompletionError::Parse(e.to_string()))?;

        response_body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(CompletionError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "OpenAI completions"
    }
}

// Completion API types
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiCompletionClient {
        let settings = CompletionSettings {
            endpoint: format!("{}/v1/completions", server.uri()),
            timeout_seconds: 5,
            ..CompletionSettings::default()
        };
        OpenAiCompletionClient::new("test-key".to_string(), settings).unwrap()
    }

    #[tokio::test]
    async fn test_request_shape_and_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "model": "text-davinci-003",
                "prompt": "count the users",
                "temperature": 0.5,
                "max_tokens": 250
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-1",
                "choices": [
                    {"text": "\n-- count rows\nSELECT count(*) FROM users;", "index": 0},
                    {"text": "SELECT 1;", "index": 1}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let text = client.complete("count the users").await.unwrap();

        assert_eq!(text, "\n-- count rows\nSELECT count(*) FROM users;");
    }

    #[tokio::test]
    async fn test_non_200_status_includes_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid key"}"#))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.complete("anything").await.unwrap_err();

        assert!(matches!(error, CompletionError::Http { status: 401, .. }));
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid key"));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.complete("anything").await.unwrap_err();

        assert!(matches!(error, CompletionError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.complete("anything").await.unwrap_err();

        assert!(matches!(error, CompletionError::Parse(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "SELECT 1"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.complete("anything").await.unwrap_err();

        assert!(matches!(error, CompletionError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let settings = CompletionSettings {
            endpoint: "http://127.0.0.1:9/v1/completions".to_string(),
            timeout_seconds: 2,
            ..CompletionSettings::default()
        };
        let client = OpenAiCompletionClient::new("test-key".to_string(), settings).unwrap();

        let error = client.complete("anything").await.unwrap_err();
        assert!(matches!(error, CompletionError::Network(_)));
    }
}
