//! polyvox: chained pretrained models that turn a PDF document or a plain
//! paragraph into spoken summaries in multiple languages.
//!
//! The pipeline is strictly sequential: acquire text → summarize →
//! {translate → synthesize speech → play audio} once per configured language.
//! Every heavy capability (summarization, OCR, translation, speech synthesis)
//! is delegated to an external pretrained model or service.

pub mod config;
pub mod errors;
pub mod extract;
pub mod history;
pub mod pipeline;
pub mod player;
pub mod speech;
pub mod summarize;
pub mod translate;
