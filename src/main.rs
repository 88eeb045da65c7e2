//! polyvox: spoken multilingual summaries for PDF documents and plain text.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use polyvox::config::Config;
use polyvox::extract::{PdfExtractor, PdftoppmRenderer, TesseractOcr};
use polyvox::history::{self, LanguageStatus, RunRecord};
use polyvox::pipeline::{Pipeline, RunReport};
use polyvox::player;
use polyvox::speech::GoogleSpeech;
use polyvox::summarize::{OllamaSummarizer, SummaryBounds};
use polyvox::translate::GoogleTranslator;

#[derive(Parser, Debug)]
#[command(name = "polyvox", about = "Spoken multilingual summaries for PDFs and text")]
struct Args {
    /// Path to polyvox.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Summarize this PDF (skips the interactive prompt)
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Summarize this paragraph (skips the interactive prompt)
    #[arg(long)]
    text: Option<String>,

    /// Print today's run history and exit
    #[arg(long)]
    history: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

enum InputSource {
    Pdf(PathBuf),
    Text(String),
}

impl InputSource {
    fn kind(&self) -> &'static str {
        match self {
            Self::Pdf(_) => "pdf",
            Self::Text(_) => "text",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("polyvox starting");

    if args.history {
        println!("{}", history::daily_report(&history::today()));
        return Ok(());
    }

    let config = Config::load(args.config.as_deref());
    let names: Vec<&str> = config.languages.iter().map(|l| l.name.as_str()).collect();
    info!("Target languages: {}", names.join(", "));

    let source = match (args.pdf, args.text) {
        (Some(_), Some(_)) => bail!("pass either --pdf or --text, not both"),
        (Some(pdf), None) => InputSource::Pdf(pdf),
        (None, Some(text)) => InputSource::Text(text),
        (None, None) => prompt_for_input()?,
    };

    // Collaborators are constructed here and handed to the pipeline; no
    // module reaches for globals.
    let renderer = Arc::new(PdftoppmRenderer::new(&config.ocr));
    let ocr = Arc::new(TesseractOcr::new(&config.ocr));
    let extractor = PdfExtractor::new(renderer, ocr);
    let summarizer = Arc::new(OllamaSummarizer::new(&config.summarizer));
    let translator = Arc::new(GoogleTranslator::new());
    let synthesizer = Arc::new(GoogleSpeech::new(&config.speech));
    let audio_player = player::from_config(&config.player);

    let pipeline = Pipeline::new(
        config.languages.clone(),
        extractor,
        summarizer,
        translator,
        synthesizer,
        audio_player,
        SummaryBounds::document(&config.summarizer),
        SummaryBounds::plain_text(&config.summarizer),
    );

    let report = match &source {
        InputSource::Pdf(path) => pipeline.run_document(path).await?,
        InputSource::Text(paragraph) => pipeline.run_text(paragraph).await?,
    };

    if config.history.enabled {
        history::save_run_record(&run_record(&source, &report));
    }

    println!(
        "Done: {} language(s) spoken, {} failed.",
        report.succeeded(),
        report.failed()
    );
    Ok(())
}

/// Blocking console prompts: paragraph or PDF path.
fn prompt_for_input() -> io::Result<InputSource> {
    loop {
        let choice = prompt("Summarize (1) a paragraph or (2) a PDF file? ")?;
        match choice.as_str() {
            "1" => {
                let text = prompt("Enter the paragraph: ")?;
                if text.is_empty() {
                    println!("Nothing entered.");
                    continue;
                }
                return Ok(InputSource::Text(text));
            }
            "2" => {
                let path = prompt("Enter PDF file path: ")?;
                if path.is_empty() {
                    println!("Nothing entered.");
                    continue;
                }
                return Ok(InputSource::Pdf(PathBuf::from(path)));
            }
            _ => println!("Please answer 1 or 2."),
        }
    }
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn run_record(source: &InputSource, report: &RunReport) -> RunRecord {
    RunRecord {
        timestamp: chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
        source: source.kind().to_string(),
        input_chars: report.input_chars,
        summary_chars: report.summary_chars(),
        languages: report
            .outcomes
            .iter()
            .map(|o| LanguageStatus {
                code: o.code.clone(),
                ok: o.is_ok(),
                error: o.error.clone(),
            })
            .collect(),
        total_ms: report.total_ms,
    }
}
