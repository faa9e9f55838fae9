use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{BridgeConfig, GOOGLE_BASE_URL};
use crate::contract::{OutputContract, PromptRequest, JSON_MIME_TYPE};
use crate::error::{BridgeError, Result};
use crate::providers::LlmProvider;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini `generateContent` transport
#[derive(Clone)]
pub struct GoogleProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    ///
    /// The key is required when talking to Google directly. A custom
    /// `base_url` may point at a proxy that attaches the key itself.
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let api_key = config.resolved_api_key();
        let base_url = config.base_url.trim_end_matches('/').to_string();

        if api_key.is_none() && base_url == GOOGLE_BASE_URL {
            return Err(BridgeError::MissingApiKey);
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BridgeError::Builder(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GoogleProvider {
            client,
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_body<'a>(&self, request: &'a PromptRequest) -> GenerateContentRequest<'a> {
        let contract = request.output_contract();
        let generation_config = GenerationConfig {
            response_mime_type: contract.map(|_| JSON_MIME_TYPE),
            response_schema: contract,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt(),
                }],
            }],
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn complete(&self, request: &PromptRequest) -> Result<String> {
        let url = self.endpoint();
        debug!(
            "Sending request to {} (structured: {})",
            url,
            request.output_contract().is_some()
        );

        let mut http = self.client.post(&url).json(&self.build_body(request));
        if let Some(key) = &self.api_key {
            http = http.header(API_KEY_HEADER, key);
        }

        let response = http.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Gemini API error ({}): {}", status, body);
            return Err(BridgeError::Upstream { status, body });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            BridgeError::EmptyResponse(format!("unexpected response shape: {}", e))
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini usage ({}): prompt tokens {:?}, candidate tokens {:?}",
                parsed.model_version.as_deref().unwrap_or(&self.model),
                usage.prompt_token_count,
                usage.candidates_token_count
            );
        }

        extract_text(parsed)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.unwrap_or_default().into_iter().next() else {
        return Err(BridgeError::EmptyResponse(match block_reason {
            Some(reason) => format!("prompt blocked: {}", reason),
            None => "no candidates in response".to_string(),
        }));
    };

    let finish_reason = candidate.finish_reason;
    candidate
        .content
        .and_then(|content| content.parts.unwrap_or_default().into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            BridgeError::EmptyResponse(match finish_reason {
                Some(reason) => format!("no text in first candidate (finish reason: {})", reason),
                None => "no text in first candidate".to_string(),
            })
        })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a OutputContract>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig<'_> {
    fn is_empty(&self) -> bool {
        self.response_schema.is_none()
            && self.temperature.is_none()
            && self.max_output_tokens.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> GoogleProvider {
        GoogleProvider::with_base_url(
            Some("test-key".to_string()),
            "http://localhost:1234/".to_string(),
            "gemini-2.0-flash".to_string(),
        )
    }

    fn parse(body: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().provider_name(), "google");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(
            provider().endpoint(),
            "http://localhost:1234/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_new_requires_key_for_google() {
        let config = BridgeConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        // GOOGLE_API_KEY may be set in the environment running the tests
        if std::env::var("GOOGLE_API_KEY").is_err() {
            assert!(matches!(
                GoogleProvider::new(&config),
                Err(BridgeError::MissingApiKey)
            ));
        }
    }

    #[test]
    fn test_new_allows_proxy_without_key() {
        let config = BridgeConfig {
            base_url: "https://recipes.example.com/ai/".to_string(),
            timeout_secs: Some(10),
            ..Default::default()
        };
        let provider = GoogleProvider::new(&config).unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://recipes.example.com/ai/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_plain_body_has_no_generation_config() {
        let request = PromptRequest::text("Substitutes for butter").unwrap();
        let body = serde_json::to_value(provider().build_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Substitutes for butter" }] }]
            })
        );
    }

    #[test]
    fn test_structured_body_carries_schema() {
        let request = PromptRequest::structured("Pair wine", OutputContract::wine_pairing()).unwrap();
        let body = serde_json::to_value(provider().build_body(&request)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            OutputContract::wine_pairing().schema().clone()
        );
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_sampling_overrides_without_schema() {
        let mut provider = provider();
        provider.temperature = Some(0.5);
        provider.max_output_tokens = Some(512);

        let request = PromptRequest::text("Substitutes for butter").unwrap();
        let body = serde_json::to_value(provider.build_body(&request)).unwrap();
        assert_eq!(
            body["generationConfig"],
            json!({ "temperature": 0.5, "maxOutputTokens": 512 })
        );
    }

    #[test]
    fn test_extract_text_first_candidate() {
        let response = parse(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second part" }] } },
                { "content": { "parts": [{ "text": "other candidate" }] } }
            ]
        }));
        assert_eq!(extract_text(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let err = extract_text(parse(json!({ "candidates": [] }))).unwrap_err();
        assert!(matches!(err, BridgeError::EmptyResponse(_)));
    }

    #[test]
    fn test_extract_text_reports_block_reason() {
        let err = extract_text(parse(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_missing_parts() {
        let err = extract_text(parse(json!({
            "candidates": [{ "content": { "role": "model" }, "finishReason": "MAX_TOKENS" }]
        })))
        .unwrap_err();
        assert!(matches!(err, BridgeError::EmptyResponse(_)));
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_extract_text_rejects_empty_string() {
        let err = extract_text(parse(json!({
            "candidates": [{ "content": { "parts": [{ "text": "" }] } }]
        })))
        .unwrap_err();
        assert!(matches!(err, BridgeError::EmptyResponse(_)));
    }
}
