//! Abstractive summarization through a pretrained model served by Ollama.
//!
//! Sends the acquired text to Ollama's /api/generate endpoint with
//! deterministic decoding, so identical input and model state yield an
//! identical summary. Input past the configured char budget is truncated,
//! not chunked.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::config::SummarizerConfig;
use crate::errors::ProviderError;

const SUMMARIZE_PROMPT: &str = r#"Summarize the following text in roughly {min} to {max} words of plain prose. No headings, no bullet points. Output ONLY the summary, nothing else.

Text: {text}

Summary:"#;

/// Min/max token budget for one summarization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    pub min_tokens: u32,
    pub max_tokens: u32,
}

impl SummaryBounds {
    /// Bounds used by the document pipeline.
    pub fn document(config: &SummarizerConfig) -> Self {
        Self {
            min_tokens: config.document_min_tokens,
            max_tokens: config.document_max_tokens,
        }
    }

    /// Bounds used by the plain-text pipeline.
    pub fn plain_text(config: &SummarizerConfig) -> Self {
        Self {
            min_tokens: config.text_min_tokens,
            max_tokens: config.text_max_tokens,
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Reduce `text` to one summary string within `bounds`.
    async fn summarize(&self, text: &str, bounds: SummaryBounds)
        -> Result<String, ProviderError>;
}

pub struct OllamaSummarizer {
    host: String,
    model: String,
    max_input_chars: usize,
    client: Client,
}

impl OllamaSummarizer {
    pub fn new(config: &SummarizerConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            host: config.host.clone(),
            model: config.model.clone(),
            max_input_chars: config.max_input_chars,
            client,
        }
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> Result<String, ProviderError> {
        let input = truncate_chars(text, self.max_input_chars);
        if input.len() < text.len() {
            debug!(
                "Input truncated from {} to {} chars",
                text.len(),
                input.len()
            );
        }

        let prompt = SUMMARIZE_PROMPT
            .replace("{min}", &bounds.min_tokens.to_string())
            .replace("{max}", &bounds.max_tokens.to_string())
            .replace("{text}", input);

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.0,
                "num_predict": bounds.max_tokens
            }
        });

        let url = format!("{}/api/generate", self.host);
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let summary = data["response"].as_str().unwrap_or("").trim().to_string();
        if summary.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        info!(
            "Summarized {} chars → {} chars (bounds {}..{})",
            text.len(),
            summary.len(),
            bounds.min_tokens,
            bounds.max_tokens
        );
        Ok(summary)
    }
}

/// Truncate to at most `max` chars without splitting a codepoint.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}
