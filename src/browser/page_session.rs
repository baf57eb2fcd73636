use std::path::Path;

use crate::analysis::error::AnalysisError;
use crate::controls::control_model::ControlEntry;
use crate::page::element_model::{AncestorNode, ElementId, ScrollMetrics, SnapshotEntry};

/// The live page as seen by the analysis core.
///
/// Every batch method answers in a single round trip and returns results
/// index-aligned with its `ids` argument. Implemented by `BrowserSession`
/// over browser_server.js, and by scripted fakes in tests.
pub trait PageSession {
    fn navigate(&mut self, url: &str) -> Result<(), AnalysisError>;

    /// Let the page settle for `ms` milliseconds.
    fn wait_idle(&mut self, ms: u64) -> Result<(), AnalysisError>;

    fn scroll_metrics(&mut self) -> Result<ScrollMetrics, AnalysisError>;

    /// Ids of every element matching a CSS selector, in document order,
    /// without duplicates.
    fn select(&mut self, selector: &str) -> Result<Vec<ElementId>, AnalysisError>;

    fn snapshot(&mut self, ids: &[ElementId]) -> Result<Vec<SnapshotEntry>, AnalysisError>;

    /// Ancestor chains (nearest first, with computed backgrounds); `None`
    /// where the chain could not be read.
    fn ancestors(
        &mut self,
        ids: &[ElementId],
    ) -> Result<Vec<Option<Vec<AncestorNode>>>, AnalysisError>;

    fn controls(
        &mut self,
        ids: &[ElementId],
        probe_feedback: bool,
    ) -> Result<Vec<ControlEntry>, AnalysisError>;

    /// Outer markup of the first `<svg>` inside the element.
    fn vector_markup(&mut self, id: ElementId) -> Result<Option<String>, AnalysisError>;

    /// Full-page screenshot, height capped at `max_height` pixels. Leaves the
    /// window resized to the captured extent.
    fn screenshot(&mut self, path: &Path, max_height: u32) -> Result<(), AnalysisError>;

    fn page_source(&mut self) -> Result<String, AnalysisError>;

    /// `href` of every `link[rel="stylesheet"]`.
    fn stylesheet_links(&mut self) -> Result<Vec<String>, AnalysisError>;
}
