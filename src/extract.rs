//! PDF text acquisition with per-page OCR fallback.
//!
//! Pages with an embedded text layer are used verbatim. Pages without one
//! are rendered to a temporary PNG and run through OCR once per configured
//! language (each paired with English), all hits concatenated in iteration
//! order. Rendered images are deleted as soon as OCR finishes, whether or
//! not it found anything.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use lopdf::Document;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::errors::ExtractError;

/// Renders one PDF page to an image file for OCR.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, pdf: &Path, page: u32, out: &Path) -> Result<(), ExtractError>;
}

/// Recognizes text lines in a page image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &Path, page: u32) -> Result<Vec<String>, ExtractError>;
}

/// Page rendering via poppler's pdftoppm.
pub struct PdftoppmRenderer {
    bin: String,
    dpi: u32,
}

impl PdftoppmRenderer {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            bin: config.pdftoppm_bin.clone(),
            dpi: config.render_dpi,
        }
    }
}

#[async_trait]
impl PageRenderer for PdftoppmRenderer {
    async fn render(&self, pdf: &Path, page: u32, out: &Path) -> Result<(), ExtractError> {
        // pdftoppm -singlefile writes "{prefix}.png"
        let prefix = out.with_extension("");
        let page_arg = page.to_string();
        let dpi_arg = self.dpi.to_string();

        let output = Command::new(&self.bin)
            .args(["-png", "-singlefile", "-r", &dpi_arg])
            .args(["-f", &page_arg, "-l", &page_arg])
            .arg(pdf)
            .arg(&prefix)
            .output()
            .await
            .map_err(|e| ExtractError::Render {
                page,
                message: format!("failed to run {}: {e}", self.bin),
            })?;

        if !output.status.success() {
            return Err(ExtractError::Render {
                page,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !out.exists() {
            return Err(ExtractError::Render {
                page,
                message: format!("{} produced no image", self.bin),
            });
        }
        Ok(())
    }
}

/// OCR via the tesseract binary, one pass per configured language.
pub struct TesseractOcr {
    bin: String,
    languages: Vec<String>,
    tessdata_dir: PathBuf,
}

impl TesseractOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            bin: config.tesseract_bin.clone(),
            languages: config.languages.clone(),
            tessdata_dir: PathBuf::from(&config.tessdata_dir),
        }
    }

    /// The per-language model assets are cached under a fixed directory
    /// keyed by language code; a missing asset fails before any OCR runs.
    fn check_trained_data(&self) -> Result<(), ExtractError> {
        for lang in &self.languages {
            let asset = self.tessdata_dir.join(format!("{lang}.traineddata"));
            if !asset.exists() {
                return Err(ExtractError::MissingTrainedData {
                    lang: lang.clone(),
                    dir: self.tessdata_dir.display().to_string(),
                });
            }
        }
        Ok(())
    }

    async fn run_tesseract(
        &self,
        image: &Path,
        lang: &str,
        page: u32,
    ) -> Result<String, ExtractError> {
        let lang_pair = format!("{lang}+eng");
        let output = Command::new(&self.bin)
            .arg(image)
            .arg("stdout")
            .args(["-l", lang_pair.as_str()])
            .arg("--tessdata-dir")
            .arg(&self.tessdata_dir)
            .output()
            .await
            .map_err(|e| ExtractError::Ocr {
                page,
                message: format!("failed to run {}: {e}", self.bin),
            })?;

        if !output.status.success() {
            return Err(ExtractError::Ocr {
                page,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &Path, page: u32) -> Result<Vec<String>, ExtractError> {
        self.check_trained_data()?;

        let mut lines = Vec::new();
        for lang in &self.languages {
            let text = self.run_tesseract(image, lang, page).await?;
            let pass: Vec<String> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
            debug!("OCR pass '{lang}' on page {page}: {} line(s)", pass.len());
            lines.extend(pass);
        }
        Ok(lines)
    }
}

/// Extracts the full text of a PDF, page by page.
pub struct PdfExtractor {
    renderer: Arc<dyn PageRenderer>,
    ocr: Arc<dyn OcrEngine>,
}

impl PdfExtractor {
    pub fn new(renderer: Arc<dyn PageRenderer>, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { renderer, ocr }
    }

    /// Produce one string containing all page text, embedded layer first,
    /// OCR fallback for pages without one. Fails whole if the PDF cannot
    /// be opened; no partial output, no retry.
    pub async fn extract_text(&self, pdf_path: &Path) -> Result<String, ExtractError> {
        let doc = Document::load(pdf_path).map_err(|e| ExtractError::Open(e.to_string()))?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();

        // Per-run directory keeps page images from colliding across runs.
        let image_dir = tempfile::tempdir()?;

        let mut full_text = String::new();
        let mut ocr_pages = 0u32;

        for page in &pages {
            let embedded = match doc.extract_text(&[*page]) {
                Ok(text) => text,
                Err(e) => {
                    debug!("No readable text layer on page {page}: {e}");
                    String::new()
                }
            };

            if !embedded.trim().is_empty() {
                full_text.push_str(embedded.trim_end());
                full_text.push('\n');
                continue;
            }

            ocr_pages += 1;
            let lines = self.ocr_page(pdf_path, *page, image_dir.path()).await?;
            full_text.push_str(lines.join(" ").trim_end());
            full_text.push('\n');
        }

        info!(
            "Extracted {} chars from {} page(s) ({ocr_pages} via OCR)",
            full_text.len(),
            pages.len()
        );
        Ok(full_text)
    }

    /// Render one page and OCR it. The rendered image is removed before
    /// this returns, for both success and empty-result cases.
    async fn ocr_page(
        &self,
        pdf_path: &Path,
        page: u32,
        image_dir: &Path,
    ) -> Result<Vec<String>, ExtractError> {
        let image = image_dir.join(format!("page_{page}.png"));
        debug!("Page {page} has no text layer, running OCR");

        let rendered = self.renderer.render(pdf_path, page, &image).await;
        if let Err(e) = rendered {
            remove_quietly(&image);
            return Err(e);
        }

        let result = self.ocr.recognize(&image, page).await;
        remove_quietly(&image);
        result
    }
}

fn remove_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove page image {}: {e}", path.display());
        }
    }
}
