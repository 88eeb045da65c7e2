//! Run history and reporting.
//!
//! Appends one JSON line per pipeline run to
//! `{data_dir}/polyvox/{date}-runs.jsonl`. Best-effort: failures are
//! logged and never abort the run. `daily_report` renders a day's
//! records for the `--history` flag.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

fn history_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("polyvox")
}

fn history_file(date: &str) -> PathBuf {
    history_dir().join(format!("{date}-runs.jsonl"))
}

/// Today's date in the history file naming scheme.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Per-language result inside a run record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageStatus {
    pub code: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: String,
    /// "pdf" or "text".
    pub source: String,
    pub input_chars: usize,
    pub summary_chars: usize,
    pub languages: Vec<LanguageStatus>,
    pub total_ms: u64,
}

pub fn save_run_record(record: &RunRecord) {
    write_record(&history_file(&today()), record);
}

pub fn load_run_records(date: &str) -> Vec<RunRecord> {
    read_records(&history_file(date))
}

/// Human-readable summary of one day's runs.
pub fn daily_report(date: &str) -> String {
    render_report(date, &load_run_records(date))
}

fn write_record(path: &Path, record: &RunRecord) {
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("Failed to create history dir: {e}");
            return;
        }
    }

    let mut file = match fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to open history file: {e}");
            return;
        }
    };

    match serde_json::to_string(record) {
        Ok(line) => {
            if let Err(e) = writeln!(file, "{line}") {
                warn!("Failed to write run record: {e}");
            }
        }
        Err(e) => warn!("Failed to serialize run record: {e}"),
    }
}

fn read_records(path: &Path) -> Vec<RunRecord> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    contents
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

fn render_report(date: &str, records: &[RunRecord]) -> String {
    if records.is_empty() {
        return format!("No runs recorded for {date}.");
    }

    let total = records.len();
    let spoken: usize = records
        .iter()
        .map(|r| r.languages.iter().filter(|l| l.ok).count())
        .sum();
    let failed: usize = records
        .iter()
        .map(|r| r.languages.iter().filter(|l| !l.ok).count())
        .sum();
    let avg_ms: f64 =
        records.iter().map(|r| r.total_ms as f64).sum::<f64>() / total as f64;

    let mut report = format!(
        "# polyvox runs for {date}\n\n\
        - Runs: {total}\n\
        - Languages spoken: {spoken}\n\
        - Languages failed: {failed}\n\
        - Avg run time: {avg_ms:.0}ms\n\n\
        ## Sources\n"
    );

    let mut source_counts = HashMap::new();
    for r in records {
        *source_counts.entry(r.source.as_str()).or_insert(0) += 1;
    }
    for (source, count) in &source_counts {
        report.push_str(&format!("- {source}: {count}\n"));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, ok_codes: &[&str], failed_codes: &[&str]) -> RunRecord {
        let mut languages: Vec<LanguageStatus> = ok_codes
            .iter()
            .map(|c| LanguageStatus {
                code: c.to_string(),
                ok: true,
                error: None,
            })
            .collect();
        languages.extend(failed_codes.iter().map(|c| LanguageStatus {
            code: c.to_string(),
            ok: false,
            error: Some("request failed: timeout".into()),
        }));

        RunRecord {
            timestamp: "2026-08-29T10:00:00".into(),
            source: source.into(),
            input_chars: 4200,
            summary_chars: 310,
            languages,
            total_ms: 9000,
        }
    }

    #[test]
    fn records_survive_the_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polyvox").join("2026-08-29-runs.jsonl");

        write_record(&path, &record("pdf", &["hi", "te"], &["ta"]));
        write_record(&path, &record("text", &["bn"], &[]));

        let back = read_records(&path);
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].source, "pdf");
        assert_eq!(back[0].languages.len(), 3);
        assert_eq!(back[1].languages, vec![LanguageStatus {
            code: "bn".into(),
            ok: true,
            error: None,
        }]);

        // Successful languages carry no error field at all.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("\"error\":null"));
    }

    #[test]
    fn missing_file_reads_as_no_records() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(&dir.path().join("nope.jsonl")).is_empty());
    }

    #[test]
    fn report_counts_runs_and_language_outcomes() {
        let records = vec![
            record("pdf", &["hi", "te"], &["ta"]),
            record("text", &["bn"], &[]),
        ];
        let report = render_report("2026-08-29", &records);
        assert!(report.contains("- Runs: 2"));
        assert!(report.contains("- Languages spoken: 3"));
        assert!(report.contains("- Languages failed: 1"));
        assert!(report.contains("- pdf: 1"));
        assert!(report.contains("- text: 1"));
    }

    #[test]
    fn empty_day_reports_no_runs() {
        assert_eq!(
            render_report("2026-08-29", &[]),
            "No runs recorded for 2026-08-29."
        );
    }
}
