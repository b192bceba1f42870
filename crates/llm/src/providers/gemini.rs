//! Gemini LLM provider implementation.
//!
//! Talks to the Generative Language REST API (`models/<model>:generateContent`).
//! The key is sent in the `x-goog-api-key` header, never in the URL.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use digibuddy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default Generative Language API base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    message: String,
}

/// Gemini LLM client.
pub struct GeminiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    ///
    /// A `None` key produces an unconfigured client: `is_configured()` is false
    /// and `complete` refuses to send anything.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_GEMINI_URL, api_key)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn to_gemini_request(&self, request: &LlmRequest) -> GenerateContentRequest {
        let generation_config = if request.temperature.is_some()
            || request.top_p.is_some()
            || request.max_tokens.is_some()
        {
            Some(GenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part {
                    text: Some(system.clone()),
                }],
            }),
            generation_config,
        }
    }

    /// Join the text parts of the first candidate. No candidates means no text.
    fn convert_response(&self, response: GenerateContentResponse, model: &str) -> LlmResponse {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let usage = response
            .usage_metadata
            .map(|u| {
                LlmUsage::new(
                    u.prompt_token_count.unwrap_or(0),
                    u.candidates_token_count.unwrap_or(0),
                )
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            usage,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Gemini API key is not configured".to_string()))?;

        tracing::info!("Sending completion request to Gemini");
        tracing::debug!(model = %request.model, prompt_len = request.prompt.len(), "Gemini request");

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&self.to_gemini_request(request))
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to send request to Gemini: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = match serde_json::from_str::<ErrorEnvelope>(&error_text) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{}: {}", code, envelope.error.message),
                    None => envelope.error.message,
                },
                Err(_) => error_text,
            };

            return Err(AppError::Provider(format!(
                "Gemini API error ({}): {}",
                status, message
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse Gemini response: {}", e)))?;

        let converted = self.convert_response(body, &request.model);
        tracing::info!(
            completion_tokens = converted.usage.completion_tokens,
            "Received completion from Gemini"
        );

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_without_key() {
        assert!(!GeminiClient::new(None).is_configured());
        assert!(!GeminiClient::new(Some("  ".to_string())).is_configured());
        assert!(GeminiClient::new(Some("key".to_string())).is_configured());
    }

    #[tokio::test]
    async fn test_complete_refuses_without_key() {
        let client = GeminiClient::new(None);
        let result = client
            .complete(&LlmRequest::new("hi", "gemini-2.5-flash"))
            .await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_endpoint_accepts_prefixed_model() {
        let client = GeminiClient::new(Some("k".to_string()));
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.endpoint("gemini-2.5-flash"), client.endpoint("models/gemini-2.5-flash"));
    }

    #[test]
    fn test_request_shape() {
        let client = GeminiClient::new(Some("k".to_string()));
        let request = LlmRequest::new("How do I sleep better?", "gemini-2.5-flash")
            .with_max_tokens(512);

        let json = serde_json::to_value(client.to_gemini_request(&request)).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "How do I sleep better?");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_joins_parts() {
        let client = GeminiClient::new(Some("k".to_string()));
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Try a "}, {"text": "short walk."}]}}],
                "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 4, "totalTokenCount": 24}
            }"#,
        )
        .unwrap();

        let response = client.convert_response(body, "gemini-2.5-flash");
        assert_eq!(response.content, "Try a short walk.");
        assert_eq!(response.model, "gemini-2.5-flash");
        assert_eq!(response.usage.total_tokens, 24);
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let client = GeminiClient::new(Some("k".to_string()));
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();

        let response = client.convert_response(body, "gemini-2.5-flash");
        assert!(response.content.is_empty());
    }
}
