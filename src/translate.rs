//! Translation of the English summary into each target language.
//!
//! Uses the public Google translate endpoint (the same one the original
//! deep-translator workflow calls). Source language is auto-detected per
//! call, and every call receives the original English summary, so errors
//! never compound across languages.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::errors::ProviderError;

const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the language named by `lang_code`.
    async fn translate(&self, text: &str, lang_code: &str) -> Result<String, ProviderError>;
}

pub struct GoogleTranslator {
    endpoint: String,
    client: Client,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: TRANSLATE_ENDPOINT.to_string(),
            client,
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, lang_code: &str) -> Result<String, ProviderError> {
        debug!("Translating {} chars to '{lang_code}'", text.len());

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", lang_code),
                ("dt", "t"),
                ("q", text),
            ])
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

        let translated = join_segments(&data).ok_or_else(|| {
            ProviderError::ParseError("unexpected translate response shape".into())
        })?;
        if translated.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        info!("Translated to '{lang_code}' ({} chars)", translated.len());
        Ok(translated)
    }
}

/// The endpoint answers with a nested array whose first element lists
/// `[translated, original, ...]` segments. Concatenate the translations.
fn join_segments(data: &serde_json::Value) -> Option<String> {
    let segments = data.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
            out.push_str(piece);
        }
    }
    Some(out)
}
