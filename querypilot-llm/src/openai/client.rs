use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    client::LlmClient,
    error::LlmError,
    openai::types::{
        OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIChatMessage,
        OpenAIErrorResponse, OpenAIRole,
    },
    types::{CompletionRequest, CompletionResponse, ContentBlock, Role, Usage},
};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible LLM client
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl OpenAIClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 minute timeout
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for an OpenAI-compatible endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model used by [`LlmClient::complete`]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create a chat completion using the Chat Completions API
    pub async fn create_chat_completion(
        &self,
        request: OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(model = %request.model, "Sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let openai_response: OpenAIChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;
            return Ok(openai_response);
        }

        // Extract retry-after header before consuming the response
        let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
        } else {
            None
        };

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Prefer the structured error body when the endpoint provides one
        let message = match serde_json::from_str::<OpenAIErrorResponse>(&error_text) {
            Ok(error_response) => error_response.error.message,
            Err(_) => error_text,
        };

        match status {
            reqwest::StatusCode::BAD_REQUEST => Err(LlmError::invalid_request(message)),
            reqwest::StatusCode::UNAUTHORIZED => Err(LlmError::authentication(message)),
            reqwest::StatusCode::FORBIDDEN => Err(LlmError::authentication(message)),
            reqwest::StatusCode::PAYLOAD_TOO_LARGE => {
                Err(LlmError::invalid_request("Request too large"))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                Err(LlmError::rate_limit(message, retry_after))
            }
            _ => Err(LlmError::api_error(status.as_u16(), message)),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OpenAIChatMessage::system(system.clone()));
        }
        for message in &request.messages {
            let role = match message.role {
                Role::User => OpenAIRole::User,
                Role::Assistant => OpenAIRole::Assistant,
                Role::System => OpenAIRole::System,
            };
            messages.push(OpenAIChatMessage::new(role, flatten_content(&message.content)));
        }

        let wire_request = OpenAIChatCompletionRequest {
            model: request.model,
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
            top_p: request.top_p,
            stop: request.stop_sequences,
        };

        let response = self.create_chat_completion(wire_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::empty_response("Completion returned no choices"))?;

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text {
                text: choice.message.content,
            }],
            role: Role::Assistant,
            usage: Usage {
                input_tokens: response.usage.prompt_tokens,
                output_tokens: response.usage.completion_tokens,
            },
            stop_reason: choice.finish_reason,
        })
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn flatten_content(content: &[ContentBlock]) -> String {
    content
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_skips_absent_options() {
        let request = OpenAIChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                OpenAIChatMessage::system("be terse"),
                OpenAIChatMessage::user("hello"),
            ],
            max_tokens: Some(128),
            temperature: Some(0.7),
            top_p: None,
            stop: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
        assert_eq!(value["max_tokens"], 128);
        assert!(value.get("top_p").is_none());
        assert!(value.get("stop").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4o-mini",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "```sql\nSELECT 1\n```"},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: OpenAIChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content, "```sql\nSELECT 1\n```");
        assert_eq!(response.usage.completion_tokens, 5);
    }

    #[test]
    fn test_flatten_content_joins_blocks() {
        let content = vec![
            ContentBlock::Text {
                text: "a".to_string(),
            },
            ContentBlock::Text {
                text: "b".to_string(),
            },
        ];
        assert_eq!(flatten_content(&content), "a\nb");
    }
}
