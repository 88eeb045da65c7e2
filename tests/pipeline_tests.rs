//! Pipeline driver behavior with mock collaborators: non-compounding
//! translation, per-language failure isolation, and the end-to-end shape
//! of a run.

mod common;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use polyvox::config::LanguageEntry;
use polyvox::errors::{ExtractError, PlaybackError, ProviderError};
use polyvox::extract::{OcrEngine, PageRenderer, PdfExtractor};
use polyvox::pipeline::Pipeline;
use polyvox::player::AudioPlayer;
use polyvox::speech::SpeechSynthesizer;
use polyvox::summarize::{Summarizer, SummaryBounds};
use polyvox::translate::Translator;

// --- Mock collaborators ---

struct MockSummarizer {
    summary: String,
    calls: Arc<Mutex<Vec<(String, SummaryBounds)>>>,
}

impl MockSummarizer {
    fn new(summary: &str) -> Self {
        Self {
            summary: summary.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push((text.to_string(), bounds));
        Ok(self.summary.clone())
    }
}

struct MockTranslator {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    fail_code: Option<String>,
}

impl MockTranslator {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_code: None,
        }
    }

    fn failing_for(code: &str) -> Self {
        Self {
            fail_code: Some(code.into()),
            ..Self::new()
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, lang_code: &str) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), lang_code.to_string()));
        if self.fail_code.as_deref() == Some(lang_code) {
            return Err(ProviderError::RequestFailed("connection reset".into()));
        }
        Ok(format!("[{lang_code}] {text}"))
    }
}

struct MockSynthesizer {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockSynthesizer {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, lang_code: &str) -> Result<PathBuf, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), lang_code.to_string()));
        Ok(PathBuf::from(format!("/tmp/polyvox-test-{lang_code}.mp3")))
    }
}

struct MockPlayer {
    played: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockPlayer {
    fn new() -> Self {
        Self {
            played: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl AudioPlayer for MockPlayer {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        self.played.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

// The text pipeline never touches the extractor; these satisfy its seams.
struct NullRenderer;

#[async_trait]
impl PageRenderer for NullRenderer {
    async fn render(&self, _pdf: &Path, page: u32, _out: &Path) -> Result<(), ExtractError> {
        Err(ExtractError::Render {
            page,
            message: "not available in this test".into(),
        })
    }
}

struct NullOcr;

#[async_trait]
impl OcrEngine for NullOcr {
    async fn recognize(&self, _image: &Path, _page: u32) -> Result<Vec<String>, ExtractError> {
        Ok(Vec::new())
    }
}

fn languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("Tamil", "ta"),
        LanguageEntry::new("Hindi", "hi"),
        LanguageEntry::new("Telugu", "te"),
        LanguageEntry::new("Bengali", "bn"),
    ]
}

const DOC_BOUNDS: SummaryBounds = SummaryBounds {
    min_tokens: 50,
    max_tokens: 150,
};
const TEXT_BOUNDS: SummaryBounds = SummaryBounds {
    min_tokens: 25,
    max_tokens: 80,
};

struct Harness {
    pipeline: Pipeline,
    summarizer_calls: Arc<Mutex<Vec<(String, SummaryBounds)>>>,
    translator_calls: Arc<Mutex<Vec<(String, String)>>>,
    synthesizer_calls: Arc<Mutex<Vec<(String, String)>>>,
    played: Arc<Mutex<Vec<PathBuf>>>,
}

fn harness(summary: &str, translator: MockTranslator) -> Harness {
    let summarizer = Arc::new(MockSummarizer::new(summary));
    let translator = Arc::new(translator);
    let synthesizer = Arc::new(MockSynthesizer::new());
    let player = Arc::new(MockPlayer::new());

    let summarizer_calls = summarizer.calls.clone();
    let translator_calls = translator.calls.clone();
    let synthesizer_calls = synthesizer.calls.clone();
    let played = player.played.clone();

    let pipeline = Pipeline::new(
        languages(),
        PdfExtractor::new(Arc::new(NullRenderer), Arc::new(NullOcr)),
        summarizer,
        translator,
        synthesizer,
        player,
        DOC_BOUNDS,
        TEXT_BOUNDS,
    );

    Harness {
        pipeline,
        summarizer_calls,
        translator_calls,
        synthesizer_calls,
        played,
    }
}

// --- Tests ---

#[tokio::test]
async fn every_translation_starts_from_the_english_summary() {
    let h = harness("A concise English summary.", MockTranslator::new());
    h.pipeline.run_text("Some long paragraph.").await.unwrap();

    let calls = h.translator_calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    for (text, _code) in calls.iter() {
        assert_eq!(text, "A concise English summary.");
    }
    let codes: Vec<&str> = calls.iter().map(|(_, c)| c.as_str()).collect();
    assert_eq!(codes, vec!["ta", "hi", "te", "bn"]);
}

#[tokio::test]
async fn one_failing_language_does_not_stop_the_rest() {
    let h = harness("Summary.", MockTranslator::failing_for("hi"));
    let report = h.pipeline.run_text("text").await.unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), 3);

    let hindi = report.outcomes.iter().find(|o| o.code == "hi").unwrap();
    assert!(hindi.error.is_some());
    assert!(hindi.audio.is_none());

    // The three remaining languages were synthesized and played.
    assert_eq!(h.synthesizer_calls.lock().unwrap().len(), 3);
    assert_eq!(h.played.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn plain_text_run_uses_the_text_bounds() {
    let h = harness(
        "A fox jumps over a dog.",
        MockTranslator::new(),
    );
    let report = h
        .pipeline
        .run_text("The quick brown fox jumps over the lazy dog.")
        .await
        .unwrap();

    assert!(!report.summary.is_empty());
    assert!(report.summary.len() <= 400, "summary within configured max");

    let calls = h.summarizer_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, TEXT_BOUNDS);

    // One audio artifact played per configured language.
    assert_eq!(h.played.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn document_run_extracts_then_uses_document_bounds() {
    let pdf = common::one_page_pdf(Some("Hello World"));
    let h = harness("Summary of the document.", MockTranslator::new());

    let report = h.pipeline.run_document(pdf.path()).await.unwrap();
    assert_eq!(report.input_chars, "Hello World\n".len());

    let calls = h.summarizer_calls.lock().unwrap();
    assert_eq!(calls[0].0, "Hello World\n");
    assert_eq!(calls[0].1, DOC_BOUNDS);
}

#[tokio::test]
async fn char_counts_are_not_byte_counts() {
    let input = "नमस्ते दुनिया";
    let summary = "सारांश यहाँ है।";
    let h = harness(summary, MockTranslator::new());

    let report = h.pipeline.run_text(input).await.unwrap();
    assert_eq!(report.input_chars, input.chars().count());
    assert!(report.input_chars < input.len());
    assert_eq!(report.summary_chars(), summary.chars().count());
    assert!(report.summary_chars() < summary.len());
}

#[tokio::test]
async fn synthesizer_receives_the_translated_text() {
    let h = harness("Summary.", MockTranslator::new());
    h.pipeline.run_text("text").await.unwrap();

    let calls = h.synthesizer_calls.lock().unwrap();
    for (text, code) in calls.iter() {
        assert_eq!(text, &format!("[{code}] Summary."));
    }
}
