//! Speech synthesis through the Google TTS endpoint.
//!
//! Each translated summary becomes one MP3 at a uniquely named temp path.
//! The endpoint accepts short inputs only, so longer text is split at
//! sentence/whitespace boundaries and the MP3 payloads concatenated in
//! order (what the original gTTS client does internally). Artifacts are
//! persisted and left to the OS temp cleanup, never reclaimed here.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::SpeechConfig;
use crate::errors::ProviderError;

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` spoken in `lang_code`, returning the audio path.
    async fn synthesize(&self, text: &str, lang_code: &str) -> Result<PathBuf, ProviderError>;
}

pub struct GoogleSpeech {
    endpoint: String,
    chunk_chars: usize,
    client: Client,
}

impl GoogleSpeech {
    pub fn new(config: &SpeechConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: TTS_ENDPOINT.to_string(),
            chunk_chars: config.chunk_chars,
            client,
        }
    }

    async fn fetch_chunk(&self, chunk: &str, lang_code: &str) -> Result<Vec<u8>, ProviderError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang_code),
                ("q", chunk),
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

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    async fn synthesize(&self, text: &str, lang_code: &str) -> Result<PathBuf, ProviderError> {
        let chunks = chunk_text(text, self.chunk_chars);
        debug!(
            "Synthesizing {} chars in '{lang_code}' ({} chunk(s))",
            text.len(),
            chunks.len()
        );

        let mut audio = Vec::new();
        for chunk in &chunks {
            audio.extend(self.fetch_chunk(chunk, lang_code).await?);
        }
        if audio.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let mut file = tempfile::Builder::new()
            .prefix("polyvox-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        // Persist: the artifact outlives the run, OS temp cleanup owns it.
        let (_file, path) = file.keep().map_err(|e| ProviderError::Io(e.error))?;

        info!(
            "Wrote {} bytes of '{lang_code}' audio to {}",
            audio.len(),
            path.display()
        );
        Ok(path)
    }
}

/// Split text into pieces of at most `budget` chars, preferring sentence
/// ends, then whitespace. A single word longer than the budget is cut hard.
pub fn chunk_text(text: &str, budget: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= budget {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let remaining = chars.len() - start;
        if remaining <= budget {
            push_trimmed(&mut chunks, &chars[start..]);
            break;
        }

        let window = &chars[start..start + budget];
        let cut = find_cut(window);
        push_trimmed(&mut chunks, &chars[start..start + cut]);
        start += cut;
    }
    chunks
}

/// Best split point within a full window: last sentence end, else last
/// whitespace, else the whole window.
fn find_cut(window: &[char]) -> usize {
    if let Some(i) = window
        .iter()
        .rposition(|&c| c == '.' || c == '!' || c == '?' || c == '।')
    {
        return i + 1;
    }
    if let Some(i) = window.iter().rposition(|c| c.is_whitespace()) {
        return i + 1;
    }
    window.len()
}

fn push_trimmed(chunks: &mut Vec<String>, piece: &[char]) {
    let s: String = piece.iter().collect();
    let s = s.trim();
    if !s.is_empty() {
        chunks.push(s.to_string());
    }
}
