use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::{
    analysis::{
        crawler::{Crawler, PageMetrics},
        error::AnalysisError,
    },
    browser::{page_session::PageSession, session::BrowserSession},
    cli::config::{AppConfig, build_crawl_settings},
    detector::visual::{CommandDetector, VisualDetector},
    page::classifier::CommandRecognizer,
    report::{
        result_model::AnalysisReport,
        sink::{CallbackSink, FileSink, ResultSink},
    },
    scoring::composite::evaluate,
};

pub mod analysis;
pub mod browser;
pub mod cli;
pub mod controls;
pub mod detector;
pub mod metrics;
pub mod page;
pub mod report;
pub mod scoring;
pub mod style;

/// One live analysis, as requested on the command line.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub url: String,
    pub task_id: String,
    pub website_id: Option<String>,
    pub callback_url: Option<String>,
    pub enable_svg_ocr: bool,
    /// Extra copy of the report at this path.
    pub output: Option<PathBuf>,
}

/// Analyze a live page end to end: crawl, detect, score, deliver.
///
/// The elapsed time is logged whether or not the run succeeds.
pub fn run_analysis(
    request: &AnalysisRequest,
    config: &AppConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let start = Instant::now();
    info!("Analysis started: {} (task {})", request.url, request.task_id);

    let result = run_analysis_inner(request, config);

    let elapsed = start.elapsed();
    match &result {
        Ok(report) => info!(
            "Analysis finished in {:.1}s: score {}",
            elapsed.as_secs_f64(),
            report.summary.final_score
        ),
        Err(e) => warn!("Analysis failed after {:.1}s: {}", elapsed.as_secs_f64(), e),
    }
    result
}

fn run_analysis_inner(
    request: &AnalysisRequest,
    config: &AppConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let mut crawler = Crawler::new(build_crawl_settings(config));
    if request.enable_svg_ocr {
        let ocr = config.ocr.as_ref().ok_or_else(|| {
            AnalysisError::Config("icon-text recognition requested but no `ocr` command is configured".into())
        })?;
        crawler = crawler.with_recognizer(Box::new(CommandRecognizer::new(&ocr.command, &ocr.args)));
    }

    let detector = CommandDetector::new(&config.detector.command, &config.detector.args);
    let work_dir = PathBuf::from(&config.output.work_dir);

    // The browser is released before detection starts, on error paths too.
    let page = {
        let mut session = BrowserSession::launch(&config.browser)?;
        let page = crawler.crawl(&mut session, &request.url, &work_dir)?;
        session.quit()?;
        page
    };
    let report = score_page(&page, &detector, &request.task_id, request.website_id.as_deref())?;

    let mut sinks: Vec<Box<dyn ResultSink>> =
        vec![Box::new(FileSink::new(&config.output.results_dir))];
    if let Some(path) = &request.output {
        sinks.push(Box::new(FileSink::at(path)));
    }
    if let Some(url) = &request.callback_url {
        sinks.push(Box::new(CallbackSink::new(url)));
    }
    deliver_all(&sinks, &request.task_id, &report);

    Ok(report)
}

/// Crawl a page through any session and score it with any detector.
pub fn analyze_page(
    session: &mut dyn PageSession,
    crawler: &mut Crawler,
    detector: &dyn VisualDetector,
    url: &str,
    work_dir: &Path,
    task_id: &str,
) -> Result<AnalysisReport, AnalysisError> {
    let page = crawler.crawl(session, url, work_dir)?;
    score_page(&page, detector, task_id, None)
}

/// Run the detector on the page's screenshot and fuse everything into a report.
pub fn score_page(
    page: &PageMetrics,
    detector: &dyn VisualDetector,
    task_id: &str,
    website_id: Option<&str>,
) -> Result<AnalysisReport, AnalysisError> {
    let detected = detector.detect(&page.screenshot_path)?;
    let result = evaluate(&page.inputs, page.crawled_control_count, detected);
    Ok(AnalysisReport::build(page, &result, task_id, website_id, Local::now()))
}

/// Hand the report to every sink. Failures are logged, never returned.
pub fn deliver_all(sinks: &[Box<dyn ResultSink>], task_id: &str, report: &AnalysisReport) {
    for sink in sinks {
        if let Err(e) = sink.deliver(task_id, report) {
            warn!("Delivery to {} failed: {}", sink.name(), e);
        }
    }
}
