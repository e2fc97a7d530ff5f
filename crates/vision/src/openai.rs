//! OpenAI chat-completions vision client.
//!
//! One request per analysis: a user message carrying the prompt text and the
//! image as a base64 data URL. Transient and hard failures map onto the
//! external-service subkinds; retries are the caller's business, not ours.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use cropsight_core::config::VisionConfig;
use cropsight_core::{Error, Result, VisionClient};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiVisionClient {
    client: Client,
    api_key: Secret<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiVisionClient {
    /// Create a client from the vision configuration and a resolved API key.
    pub fn new(api_key: Secret<String>, config: &VisionConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn build_request(&self, image_base64: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", image_base64),
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl VisionClient for OpenAiVisionClient {
    async fn analyze(&self, image_base64: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(image_base64, prompt);

        tracing::debug!(model = %self.model, "Calling vision model");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Vision request failed to send");
                Error::connection_failed(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Vision provider returned an error");

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    Error::rate_limited(format!("provider returned 429: {}", body))
                }
                s if s.is_server_error() => {
                    Error::connection_failed(format!("provider unavailable ({}): {}", s, body))
                }
                s => Error::request_rejected(format!("provider returned {}: {}", s, body)),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to decode vision provider response");
            Error::request_rejected(format!("unexpected response body: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::request_rejected("empty completion from vision model"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn client() -> OpenAiVisionClient {
        OpenAiVisionClient::new(Secret::new("sk-test".into()), &VisionConfig::default())
    }

    #[test]
    fn test_request_wire_shape() {
        let request = client().build_request("aW1hZ2U=", "analyze this");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,aW1hZ2U="
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = VisionConfig {
            base_url: "https://example.test/v1/".into(),
            ..VisionConfig::default()
        };
        let client = OpenAiVisionClient::new(Secret::new("sk-test".into()), &config);
        assert_eq!(client.base_url, "https://example.test/v1");
    }

    #[test]
    fn test_response_decoding() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "{\"is_crop_image\": false}"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"is_crop_image\": false}")
        );
    }
}
