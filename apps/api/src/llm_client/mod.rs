//! LLM Client — the single point of entry for all chat-model calls.
//!
//! No other module may talk to the AI provider directly. Callers depend on the
//! `ChatCapability` trait so the provider can be swapped (or faked in tests).
//!
//! Model: gpt-4o (hardcoded — do not make configurable to prevent drift)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod readiness;

/// The model requested for every review.
pub const MODEL: &str = "gpt-4o";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatOptions {
    pub model: String,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: MODEL.to_string(),
        }
    }
}

/// A chat reply as handed back by a provider: either bare text or a record
/// carrying the text under `message.content`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    Text(String),
    Record(Value),
}

impl ChatReply {
    /// Extracts the reply text. Unknown shapes yield an empty string.
    pub fn content(&self) -> String {
        match self {
            ChatReply::Text(text) => text.clone(),
            ChatReply::Record(record) => match record.pointer("/message/content") {
                Some(Value::String(text)) => text.clone(),
                // Some providers return content as a list of `{type, text}` parts.
                Some(Value::Array(parts)) => parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect::<Vec<_>>()
                    .join(""),
                _ => String::new(),
            },
        }
    }
}

/// The chat capability consumed by the review pipeline.
///
/// Carried in `AppState` as `Arc<dyn ChatCapability>`.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatReply, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP backend (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Value>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat client for an OpenAI-compatible `/chat/completions` endpoint.
/// One request per call: no retries, no streaming.
#[derive(Clone)]
pub struct HttpChatClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpChatClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl ChatCapability for HttpChatClient {
    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatReply, LlmError> {
        let request_body = CompletionRequest {
            model: &options.model,
            messages,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(body),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        if let Some(usage) = &completion.usage {
            debug!(
                "Chat call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(reply_from_completion(completion))
    }
}

/// Prefers the provider's structured error message over the raw body.
fn provider_error_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// The first choice already has the `{message: {content}}` record shape.
fn reply_from_completion(completion: CompletionResponse) -> ChatReply {
    completion
        .choices
        .into_iter()
        .next()
        .map(ChatReply::Record)
        .unwrap_or_else(|| ChatReply::Text(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_reply_content() {
        let reply: ChatReply = serde_json::from_value(json!("hello")).unwrap();
        assert_eq!(reply, ChatReply::Text("hello".to_string()));
        assert_eq!(reply.content(), "hello");
    }

    #[test]
    fn test_record_reply_content() {
        let reply: ChatReply =
            serde_json::from_value(json!({"message": {"role": "assistant", "content": "{}"}}))
                .unwrap();
        assert_eq!(reply.content(), "{}");
    }

    #[test]
    fn test_record_reply_with_content_parts() {
        let reply = ChatReply::Record(json!({
            "message": {"content": [{"type": "text", "text": "{\"a\":"}, {"type": "text", "text": "1}"}]}
        }));
        assert_eq!(reply.content(), "{\"a\":1}");
    }

    #[test]
    fn test_unknown_reply_shape_defaults_to_empty() {
        assert_eq!(ChatReply::Record(json!({"foo": 1})).content(), "");
        assert_eq!(ChatReply::Record(json!(42)).content(), "");
        assert_eq!(
            ChatReply::Record(json!({"message": {"content": null}})).content(),
            ""
        );
    }

    #[test]
    fn test_completion_first_choice_becomes_reply() {
        let completion: CompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }))
        .unwrap();
        assert_eq!(reply_from_completion(completion).content(), "first");
    }

    #[test]
    fn test_completion_without_choices_is_empty() {
        let completion: CompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(reply_from_completion(completion).content(), "");
    }

    #[test]
    fn test_provider_error_message_extracted() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            provider_error_message(body.to_string()),
            "Incorrect API key provided"
        );
        assert_eq!(provider_error_message("gateway timeout".to_string()), "gateway timeout");
    }

    #[test]
    fn test_request_serializes_lowercase_roles() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = serde_json::to_value(CompletionRequest {
            model: MODEL,
            messages: &messages,
        })
        .unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
    }
}
