//! Configuration management for polyvox.
//!
//! Loads config from YAML files in standard locations. Every section has
//! defaults, so the tool runs with no config file at all.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One target language for the translate/speak loop.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Display name, printed in progress messages.
    pub name: String,
    /// Language code passed to the translation and TTS services.
    pub code: String,
}

impl LanguageEntry {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

fn default_languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("Tamil", "ta"),
        LanguageEntry::new("Hindi", "hi"),
        LanguageEntry::new("Telugu", "te"),
        LanguageEntry::new("Bengali", "bn"),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub host: String,
    pub model: String,
    /// Token bounds for the document pipeline.
    pub document_max_tokens: u32,
    pub document_min_tokens: u32,
    /// Token bounds for the plain-text pipeline.
    pub text_max_tokens: u32,
    pub text_min_tokens: u32,
    /// Input beyond this many chars is truncated, not chunked.
    pub max_input_chars: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".into(),
            model: "llama3.2:3b".into(),
            document_max_tokens: 150,
            document_min_tokens: 50,
            text_max_tokens: 80,
            text_min_tokens: 25,
            max_input_chars: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language codes tried for each scanned page, each paired with English.
    pub languages: Vec<String>,
    /// Directory holding `{lang}.traineddata` assets.
    pub tessdata_dir: String,
    pub tesseract_bin: String,
    pub pdftoppm_bin: String,
    /// Resolution for page rendering.
    pub render_dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: vec!["hin".into(), "tel".into(), "ben".into()],
            tessdata_dir: "/usr/share/tesseract-ocr/5/tessdata".into(),
            tesseract_bin: "tesseract".into(),
            pdftoppm_bin: "pdftoppm".into(),
            render_dpi: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Per-request character budget of the TTS endpoint. Longer text is
    /// split at sentence boundaries and the audio concatenated.
    pub chunk_chars: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { chunk_chars: 180 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// "system" opens the OS default handler, "builtin" plays through rodio.
    pub backend: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            backend: "system".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub languages: Vec<LanguageEntry>,
    pub summarizer: SummarizerConfig,
    pub ocr: OcrConfig,
    pub speech: SpeechConfig,
    pub player: PlayerConfig,
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            summarizer: SummarizerConfig::default(),
            ocr: OcrConfig::default(),
            speech: SpeechConfig::default(),
            player: PlayerConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./polyvox.yaml
    /// 2. ~/.config/polyvox/polyvox.yaml
    /// 3. /etc/polyvox/polyvox.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("polyvox.yaml")),
                dirs::home_dir().map(|h| h.join(".config/polyvox/polyvox.yaml")),
                Some(PathBuf::from("/etc/polyvox/polyvox.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match serde_yml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}: {e}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }
}
