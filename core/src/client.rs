use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::CuraConfig;
use crate::errors::{CoreError, CoreResult};
use crate::types::*;

/// A fallible function from prompt to reply text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generate a reply for the prompt
    async fn generate(&self, prompt: &Prompt) -> CoreResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> String;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: &CuraConfig) -> CoreResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CoreError::ConfigError(
                    "API key is required to initialize the Gemini client".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .connect_timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| CoreError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model_name: config.model().to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    /// Get the generateContent URL for the configured model
    fn get_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        )
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> CoreResult<GenerateContentResponse> {
        let response = self
            .client
            .post(self.get_url())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| CoreError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                CoreError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(CoreError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| CoreError::ParsingError(format!("Failed to parse response: {}", e)))
    }
}

/// Pull the reply text out of the first candidate
pub fn extract_text_from_response(response: &GenerateContentResponse) -> CoreResult<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| CoreError::ResponseError("No candidates in response".to_string()))?;

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| CoreError::ResponseError("No content in candidate".to_string()))?;

    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(CoreError::ResponseError("No text in content".to_string()));
    }

    Ok(text)
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> CoreResult<String> {
        let request = GenerateContentRequest::from_prompt(prompt, 0.7);
        debug!(
            model = %self.model_name,
            history_turns = prompt.history.len(),
            "Sending generateContent request"
        );
        let response = self.generate_content(&request).await?;
        extract_text_from_response(&response)
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> CuraConfig {
        CuraConfig {
            api_key: Some("test-key".to_string()),
            api_base_url: Some(server.uri()),
            ..CuraConfig::defaults()
        }
    }

    fn prompt() -> Prompt {
        Prompt {
            system_instruction: "You are CURA.".to_string(),
            history: vec![Turn::user("hi"), Turn::model("Hello there")],
            message: "I feel stressed".to_string(),
        }
    }

    #[test]
    fn test_missing_api_key() {
        let result = GeminiClient::new(&CuraConfig::defaults());
        assert!(matches!(result, Err(CoreError::ConfigError(_))));

        let blank = CuraConfig {
            api_key: Some("   ".to_string()),
            ..CuraConfig::defaults()
        };
        assert!(GeminiClient::new(&blank).is_err());
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Let's take a breath together."}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let reply = client.generate(&prompt()).await.unwrap();
        assert_eq!(reply, "Let's take a breath together.");
    }

    #[tokio::test]
    async fn test_quota_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let err = client.generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, CoreError::HttpError { status_code: 429, .. }));
        assert!(err.is_auth_or_quota());
    }

    #[tokio::test]
    async fn test_malformed_body_is_parsing_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let err = client.generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, CoreError::ParsingError(_)));
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            extract_text_from_response(&response),
            Err(CoreError::ResponseError(_))
        ));
    }
}
