//! Error types for the polyvox pipeline.
//!
//! Pre-loop failures (PDF extraction, summarization) abort the whole run.
//! Per-language failures are caught by the pipeline driver and reported
//! without stopping the remaining languages.

use thiserror::Error;

/// Errors raised while acquiring text from a PDF.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The PDF could not be opened or parsed at all.
    #[error("failed to open PDF: {0}")]
    Open(String),

    /// Rendering a page to an image for OCR failed.
    #[error("failed to render page {page}: {message}")]
    Render { page: u32, message: String },

    /// Running the OCR engine over a rendered page failed.
    #[error("OCR failed on page {page}: {message}")]
    Ocr { page: u32, message: String },

    /// A configured OCR language has no trained-data asset on disk.
    #[error("missing OCR trained data for '{lang}' under {dir}")]
    MissingTrainedData { lang: String, dir: String },

    /// Filesystem error while managing temporary page images.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the HTTP-backed collaborators (summarizer, translator,
/// speech synthesizer).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request never completed (connect failure, timeout, ...).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("service responded with status {status}: {message}")]
    BadStatus { status: u16, message: String },

    /// The response body could not be interpreted.
    #[error("failed to parse service response: {0}")]
    ParseError(String),

    /// The service answered successfully but produced nothing usable.
    #[error("service returned an empty result")]
    EmptyResponse,

    /// Filesystem error while writing an audio artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the playback dispatcher.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The platform handler command could not be spawned.
    #[error("failed to launch audio handler: {0}")]
    Spawn(String),

    /// The builtin backend could not decode or play the file.
    #[error("builtin playback failed: {0}")]
    Builtin(String),
}

/// Top-level error wrapping every pipeline stage.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
