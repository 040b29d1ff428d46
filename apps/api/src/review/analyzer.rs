//! Analysis Client — fills the prompt template, makes one chat call and
//! parses the reply. No retries, no streaming.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{ChatCapability, ChatMessage, ChatOptions};
use crate::review::analysis::{parse_ai_response, AnalysisResult};
use crate::review::prompts::{ANALYZE_RESUME_PROMPT, DOCUMENT_PLACEHOLDER, REVIEW_SYSTEM};

/// A prompt template with exactly one `{{DOCUMENT_TEXT}}` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let count = template.matches(DOCUMENT_PLACEHOLDER).count();
        if count != 1 {
            bail!("Prompt template must contain {DOCUMENT_PLACEHOLDER} exactly once, found {count}");
        }
        Ok(Self(template))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt template '{}'", path.display()))?;
        Self::new(raw)
    }

    pub fn fill(&self, document_text: &str) -> String {
        self.0.replacen(DOCUMENT_PLACEHOLDER, document_text, 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self(ANALYZE_RESUME_PROMPT.to_string())
    }
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    chat: Arc<dyn ChatCapability>,
    template: PromptTemplate,
}

impl ResumeAnalyzer {
    pub fn new(chat: Arc<dyn ChatCapability>, template: PromptTemplate) -> Self {
        Self { chat, template }
    }

    /// The two-message exchange sent for `text`: system persona, then the filled prompt.
    pub fn build_messages(&self, text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(format!("{REVIEW_SYSTEM} {JSON_ONLY_SYSTEM}")),
            ChatMessage::user(self.template.fill(text)),
        ]
    }

    /// Reviews `text`. An `error` reported by the model becomes `AppError::Analysis`.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AppError> {
        let messages = self.build_messages(text);
        let options = ChatOptions::default();
        info!(model = %options.model, chars = text.len(), "Requesting resume review");

        let reply = self.chat.send(&messages, &options).await?;
        let content = reply.content();
        debug!(chars = content.len(), "Received review reply");

        let result = parse_ai_response(&content)?;
        if let Some(error) = result.error {
            return Err(AppError::Analysis(error));
        }
        Ok(result)
    }
}
