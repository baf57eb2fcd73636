//! One page visit: drives the session through extraction, admission,
//! control matching and button collection, and reduces it all to
//! `PageMetrics`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::artifacts::capture_artifacts;
use crate::analysis::error::AnalysisError;
use crate::browser::page_session::PageSession;
use crate::controls::buttons::collect_buttons;
use crate::controls::pagination::find_page_controls;
use crate::metrics::calculators::{
    Thresholds, button_contrast_score, button_size_score, font_size_score,
    graded_contrast_average, graded_font_average, overall_contrast_score, page_script_ratio,
    visual_feedback_score,
};
use crate::page::classifier::{IconTextRecognizer, resolve_text_with_icon_fallback};
use crate::page::element_model::{ElementId, SnapshotEntry};
use crate::page::extractor::viewport_snapshots;
use crate::page::lineage::Lineage;
use crate::page::visibility::{ScrollInfo, has_scrollbar};
use crate::scoring::score_model::MetricInputs;
use crate::style::aggregator::StyleAggregator;

pub const SCREENSHOT_FILE: &str = "screenshot.png";
pub const SCREENSHOT_MAX_HEIGHT: u32 = 12000;

/// Everything measured on one page, before the detector count is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub url: String,
    pub scroll: ScrollInfo,
    /// Accepted pagination controls.
    pub crawled_control_count: usize,
    /// Visible buttons inside the viewport.
    pub viewport_button_count: usize,
    pub total_elements: usize,
    pub unique_styles: usize,
    pub graded_contrast_average: f64,
    pub graded_font_average: f64,
    pub inputs: MetricInputs,
    pub screenshot_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlSettings {
    pub thresholds: Thresholds,
    pub settle_ms: u64,
    pub probe_feedback: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            settle_ms: 2000,
            probe_feedback: true,
        }
    }
}

/// Reusable page analyzer. Each `crawl` starts from a clean aggregate.
pub struct Crawler {
    settings: CrawlSettings,
    aggregator: StyleAggregator,
    recognizer: Option<Box<dyn IconTextRecognizer>>,
}

impl Crawler {
    pub fn new(settings: CrawlSettings) -> Self {
        Self {
            settings,
            aggregator: StyleAggregator::new(),
            recognizer: None,
        }
    }

    /// Enable icon-text recognition for empty vector-icon buttons.
    pub fn with_recognizer(mut self, recognizer: Box<dyn IconTextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn crawl(
        &mut self,
        session: &mut dyn PageSession,
        url: &str,
        work_dir: &Path,
    ) -> Result<PageMetrics, AnalysisError> {
        self.aggregator.reset();
        fs::create_dir_all(work_dir).map_err(|e| AnalysisError::Io {
            context: format!("creating {}", work_dir.display()),
            source: e,
        })?;

        info!("Navigating to {}", url);
        session.navigate(url)?;
        session.wait_idle(self.settings.settle_ms)?;

        let scroll = has_scrollbar(&session.scroll_metrics()?);

        let screenshot_path = work_dir.join(SCREENSHOT_FILE);
        session.screenshot(&screenshot_path, SCREENSHOT_MAX_HEIGHT)?;
        info!("Screenshot saved: {}", screenshot_path.display());

        // The screenshot leaves the window sized to the captured page, so
        // everything it shows counts as in view.
        let viewport = session.scroll_metrics()?.viewport();
        debug!(?scroll, width = viewport.width, height = viewport.height, "analysis viewport");

        let artifacts = capture_artifacts(session, work_dir);
        debug!(
            page_source = ?artifacts.page_source,
            stylesheets = ?artifacts.stylesheets,
            "artifacts captured"
        );

        let controls = find_page_controls(session)?;

        // ---- Text elements ----
        let entries = viewport_snapshots(session, &viewport)?;
        let lineage = load_lineage(session, &entries)?;

        let recognizer = self.recognizer.as_deref();
        let stats = self.aggregator.admit_batch(&entries, &lineage, |snapshot| {
            resolve_text_with_icon_fallback(snapshot, recognizer, || {
                match session.vector_markup(snapshot.id) {
                    Ok(markup) => markup,
                    Err(e) => {
                        warn!(element = snapshot.id.0, "Failed to read vector markup: {}", e);
                        None
                    }
                }
            })
        });
        debug!(?stats, "admission finished");

        // ---- Buttons ----
        let buttons = collect_buttons(session, &viewport, self.settings.probe_feedback)?;

        let thresholds = &self.settings.thresholds;
        let groups = self.aggregator.groups();
        let inputs = MetricInputs {
            button_visual_feedback: visual_feedback_score(&buttons),
            button_size: button_size_score(&buttons, thresholds),
            button_contrast: button_contrast_score(&buttons, thresholds),
            font_size: font_size_score(groups, thresholds),
            overall_contrast: overall_contrast_score(groups, thresholds),
            korean_ratio: page_script_ratio(groups),
        };

        let page = PageMetrics {
            url: url.to_string(),
            scroll,
            crawled_control_count: controls.len(),
            viewport_button_count: buttons.len(),
            total_elements: groups.total_elements(),
            unique_styles: groups.len(),
            graded_contrast_average: graded_contrast_average(groups, thresholds),
            graded_font_average: graded_font_average(groups, thresholds),
            inputs,
            screenshot_path,
        };

        info!(
            "Page crawled: {} elements in {} styles, {} page controls, {} buttons",
            page.total_elements, page.unique_styles, page.crawled_control_count, page.viewport_button_count
        );
        Ok(page)
    }
}

/// Fetch ancestor chains for every captured entry in one round trip.
fn load_lineage(
    session: &mut dyn PageSession,
    entries: &[SnapshotEntry],
) -> Result<Lineage, AnalysisError> {
    let ids: Vec<ElementId> = entries
        .iter()
        .filter_map(SnapshotEntry::captured)
        .map(|s| s.id)
        .collect();
    if ids.is_empty() {
        return Ok(Lineage::new());
    }

    let chains = session.ancestors(&ids)?;
    if chains.len() != ids.len() {
        return Err(AnalysisError::SessionProtocol {
            command: "ancestors".into(),
            error: format!("expected {} chains, got {}", ids.len(), chains.len()),
        });
    }
    let lineage = Lineage::from_chains(&ids, chains);
    debug!(known = lineage.len(), "lineage loaded");
    Ok(lineage)
}
