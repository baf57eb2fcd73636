use std::collections::{HashMap, HashSet};
use std::path::Path;

use page_accessibility::analysis::error::AnalysisError;
use page_accessibility::browser::page_session::PageSession;
use page_accessibility::controls::control_model::{ControlEntry, ControlSnapshot};
use page_accessibility::page::element_model::{
    AncestorNode, ElementId, ElementSnapshot, ScrollMetrics, SnapshotEntry,
};

/// Scripted stand-in for a live page. Unknown selectors match nothing,
/// unknown ids come back as failed entries.
pub struct FakePage {
    pub metrics: ScrollMetrics,
    pub selectors: HashMap<String, Vec<ElementId>>,
    pub rejected_selectors: HashSet<String>,
    pub snapshots: HashMap<ElementId, ElementSnapshot>,
    pub chains: HashMap<ElementId, Vec<AncestorNode>>,
    pub controls: HashMap<ElementId, ControlSnapshot>,
    pub markup: HashMap<ElementId, String>,
    pub source: String,
    pub fail_navigation: bool,
    pub fail_screenshot: bool,
    /// Command names in call order.
    pub calls: Vec<String>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            metrics: ScrollMetrics {
                scroll_height: 2400.0,
                scroll_width: 375.0,
                inner_height: 812.0,
                inner_width: 375.0,
            },
            selectors: HashMap::new(),
            rejected_selectors: HashSet::new(),
            snapshots: HashMap::new(),
            chains: HashMap::new(),
            controls: HashMap::new(),
            markup: HashMap::new(),
            source: "<html><body></body></html>".into(),
            fail_navigation: false,
            fail_screenshot: false,
            calls: Vec::new(),
        }
    }

    pub fn with_selector(mut self, selector: &str, ids: &[u64]) -> Self {
        self.selectors
            .insert(selector.to_string(), ids.iter().map(|&i| ElementId(i)).collect());
        self
    }

    pub fn with_snapshot(mut self, snapshot: ElementSnapshot) -> Self {
        self.snapshots.insert(snapshot.id, snapshot);
        self
    }

    /// Chain for `id`, nearest ancestor first, as `(id, background)` pairs.
    pub fn with_chain(mut self, id: u64, chain: &[(u64, &str)]) -> Self {
        let nodes = chain
            .iter()
            .map(|&(a, bg)| AncestorNode {
                id: ElementId(a),
                background_color: bg.to_string(),
            })
            .collect();
        self.chains.insert(ElementId(id), nodes);
        self
    }

    pub fn with_control(mut self, control: ControlSnapshot) -> Self {
        self.controls.insert(control.id, control);
        self
    }

    pub fn called(&self, command: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == command).count()
    }
}

impl PageSession for FakePage {
    fn navigate(&mut self, url: &str) -> Result<(), AnalysisError> {
        self.calls.push("navigate".into());
        if self.fail_navigation {
            return Err(AnalysisError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".into(),
            });
        }
        Ok(())
    }

    fn wait_idle(&mut self, _ms: u64) -> Result<(), AnalysisError> {
        self.calls.push("wait".into());
        Ok(())
    }

    fn scroll_metrics(&mut self) -> Result<ScrollMetrics, AnalysisError> {
        self.calls.push("scroll_metrics".into());
        Ok(self.metrics)
    }

    fn select(&mut self, selector: &str) -> Result<Vec<ElementId>, AnalysisError> {
        self.calls.push("select".into());
        if self.rejected_selectors.contains(selector) {
            return Err(AnalysisError::SessionProtocol {
                command: "select".into(),
                error: format!("'{}' is not a valid selector", selector),
            });
        }
        Ok(self.selectors.get(selector).cloned().unwrap_or_default())
    }

    fn snapshot(&mut self, ids: &[ElementId]) -> Result<Vec<SnapshotEntry>, AnalysisError> {
        self.calls.push("snapshot".into());
        Ok(ids
            .iter()
            .enumerate()
            .map(|(index, id)| match self.snapshots.get(id) {
                Some(s) => {
                    let mut s = s.clone();
                    s.index = index;
                    SnapshotEntry::Captured(Box::new(s))
                }
                None => SnapshotEntry::Failed {
                    index,
                    error: "element is detached".into(),
                },
            })
            .collect())
    }

    fn ancestors(
        &mut self,
        ids: &[ElementId],
    ) -> Result<Vec<Option<Vec<AncestorNode>>>, AnalysisError> {
        self.calls.push("ancestors".into());
        Ok(ids.iter().map(|id| self.chains.get(id).cloned()).collect())
    }

    fn controls(
        &mut self,
        ids: &[ElementId],
        probe_feedback: bool,
    ) -> Result<Vec<ControlEntry>, AnalysisError> {
        self.calls.push("controls".into());
        Ok(ids
            .iter()
            .enumerate()
            .map(|(index, id)| match self.controls.get(id) {
                Some(c) => {
                    let mut c = c.clone();
                    if !probe_feedback {
                        c.feedback = None;
                    }
                    ControlEntry::Captured(Box::new(c))
                }
                None => ControlEntry::Failed {
                    index,
                    error: "element is detached".into(),
                },
            })
            .collect())
    }

    fn vector_markup(&mut self, id: ElementId) -> Result<Option<String>, AnalysisError> {
        self.calls.push("vector_markup".into());
        Ok(self.markup.get(&id).cloned())
    }

    fn screenshot(&mut self, path: &Path, max_height: u32) -> Result<(), AnalysisError> {
        self.calls.push("screenshot".into());
        if self.fail_screenshot {
            return Err(AnalysisError::Screenshot("page crashed".into()));
        }
        // A full-page capture grows the window to the page, up to the cap.
        self.metrics.inner_height = self.metrics.scroll_height.min(max_height as f64);
        std::fs::write(path, b"\x89PNG").map_err(|e| AnalysisError::Io {
            context: "fake screenshot".into(),
            source: e,
        })
    }

    fn page_source(&mut self) -> Result<String, AnalysisError> {
        self.calls.push("page_source".into());
        Ok(self.source.clone())
    }

    fn stylesheet_links(&mut self) -> Result<Vec<String>, AnalysisError> {
        self.calls.push("stylesheets".into());
        Ok(Vec::new())
    }
}
