use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use sha1::{Digest, Sha1};

use crate::analysis::crawler::PageMetrics;
use crate::analysis::error::AnalysisError;
use crate::cli::config::{AppConfig, resolve_svg_ocr};
use crate::detector::visual::FixedDetector;
use crate::report::console::format_console_report;
use crate::report::sink::{FileSink, ResultSink};
use crate::{AnalysisRequest, run_analysis, score_page};

/// Task id derived from the URL and request time: 16 hex chars of SHA-1.
pub fn generate_task_id(url: &str, timestamp: DateTime<Local>) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    url: &str,
    callback_url: Option<&str>,
    task_id: Option<&str>,
    website_id: Option<&str>,
    enable_svg_ocr: bool,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = AnalysisRequest {
        url: url.to_string(),
        task_id: task_id
            .map(str::to_string)
            .unwrap_or_else(|| generate_task_id(url, Local::now())),
        website_id: website_id.map(str::to_string),
        callback_url: callback_url.map(str::to_string),
        enable_svg_ocr: resolve_svg_ocr(enable_svg_ocr, config),
        output: output.map(PathBuf::from),
    };

    let report = run_analysis(&request, config)?;
    print!("{}", format_console_report(&report));
    Ok(())
}

// ============================================================================
// score subcommand
// ============================================================================

/// Load page metrics saved by an earlier crawl.
pub fn load_page_metrics(path: &Path) -> Result<PageMetrics, AnalysisError> {
    let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| AnalysisError::JsonParse {
        context: path.display().to_string(),
        source: e,
    })
}

pub fn cmd_score(
    metrics_path: &str,
    detected: usize,
    output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page_metrics(Path::new(metrics_path))?;
    let task_id = generate_task_id(&page.url, Local::now());
    let report = score_page(&page, &FixedDetector(detected), &task_id, None)?;

    if let Some(path) = output {
        FileSink::at(Path::new(path)).deliver(&task_id, &report)?;
    }
    print!("{}", format_console_report(&report));
    Ok(())
}
