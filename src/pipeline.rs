//! Pipeline driver: acquire text → summarize → per-language loop.
//!
//! Owns explicitly constructed collaborator instances, no ambient globals.
//! The per-language translate/synthesize/play path is an independent unit
//! of work: a failure there is reported and the remaining languages still
//! run. Failures before the loop (extraction, summarization) abort.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::LanguageEntry;
use crate::errors::AppError;
use crate::extract::PdfExtractor;
use crate::player::AudioPlayer;
use crate::speech::SpeechSynthesizer;
use crate::summarize::{Summarizer, SummaryBounds};
use crate::translate::Translator;

/// What happened for one target language.
#[derive(Debug)]
pub struct LanguageOutcome {
    pub name: String,
    pub code: String,
    /// Path of the synthesized audio, when synthesis succeeded.
    pub audio: Option<PathBuf>,
    /// First error hit on this language's path, if any.
    pub error: Option<String>,
}

impl LanguageOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one full pipeline run.
#[derive(Debug)]
pub struct RunReport {
    pub input_chars: usize,
    pub summary: String,
    pub outcomes: Vec<LanguageOutcome>,
    pub total_ms: u64,
}

impl RunReport {
    pub fn summary_chars(&self) -> usize {
        self.summary.chars().count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }
}

pub struct Pipeline {
    languages: Vec<LanguageEntry>,
    extractor: PdfExtractor,
    summarizer: Arc<dyn Summarizer>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
    document_bounds: SummaryBounds,
    text_bounds: SummaryBounds,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        languages: Vec<LanguageEntry>,
        extractor: PdfExtractor,
        summarizer: Arc<dyn Summarizer>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        player: Arc<dyn AudioPlayer>,
        document_bounds: SummaryBounds,
        text_bounds: SummaryBounds,
    ) -> Self {
        Self {
            languages,
            extractor,
            summarizer,
            translator,
            synthesizer,
            player,
            document_bounds,
            text_bounds,
        }
    }

    /// Full document pipeline: extract, summarize with document bounds,
    /// then the language loop.
    pub async fn run_document(&self, pdf_path: &Path) -> Result<RunReport, AppError> {
        println!("Extracting text from {}...", pdf_path.display());
        let text = self.extractor.extract_text(pdf_path).await?;
        println!("Extracted {} characters", text.chars().count());
        self.run_with(&text, self.document_bounds).await
    }

    /// Plain-text pipeline: summarize with the tighter text bounds, then
    /// the language loop.
    pub async fn run_text(&self, paragraph: &str) -> Result<RunReport, AppError> {
        self.run_with(paragraph, self.text_bounds).await
    }

    async fn run_with(&self, text: &str, bounds: SummaryBounds) -> Result<RunReport, AppError> {
        let t_start = Instant::now();

        println!("Summarizing...");
        let summary = self.summarizer.summarize(text, bounds).await?;
        println!("\nEnglish summary:\n{summary}\n");

        let mut outcomes = Vec::with_capacity(self.languages.len());
        for language in &self.languages {
            // Always translate the original English summary, never a
            // previous translation.
            outcomes.push(self.speak_language(&summary, language).await);
        }

        let report = RunReport {
            input_chars: text.chars().count(),
            summary,
            outcomes,
            total_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            "Run complete: {} language(s) spoken, {} failed, {}ms",
            report.succeeded(),
            report.failed(),
            report.total_ms
        );
        Ok(report)
    }

    async fn speak_language(&self, summary: &str, language: &LanguageEntry) -> LanguageOutcome {
        let mut outcome = LanguageOutcome {
            name: language.name.clone(),
            code: language.code.clone(),
            audio: None,
            error: None,
        };

        println!("Translating to {}...", language.name);
        let translated = match self.translator.translate(summary, &language.code).await {
            Ok(t) => t,
            Err(e) => {
                warn!("Translation to {} failed: {e}", language.name);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };
        println!("{} summary:\n{translated}\n", language.name);

        let audio = match self.synthesizer.synthesize(&translated, &language.code).await {
            Ok(path) => path,
            Err(e) => {
                warn!("Speech synthesis for {} failed: {e}", language.name);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };
        outcome.audio = Some(audio.clone());

        println!("Playing {} audio...", language.name);
        if let Err(e) = self.player.play(&audio) {
            warn!("Playback for {} failed: {e}", language.name);
            outcome.error = Some(e.to_string());
        }
        outcome
    }
}
