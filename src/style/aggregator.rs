use tracing::{debug, info};

use crate::page::classifier::snapshot_is_button_like;
use crate::page::element_model::{ElementSnapshot, SnapshotEntry};
use crate::page::lineage::{Lineage, ProcessedElements, is_processed_child, resolve_background};
use crate::page::visibility::is_visible;
use crate::style::style_group::{
    ElementRecord, StyleGroupKey, StyleGroups, StyleInterner, parse_font_size_px,
};

/// Outcome of offering one element to the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admitted(StyleGroupKey),
    Invisible,
    /// The element or an ancestor already sits in a group.
    Duplicate,
    NoContent,
    /// A plain text wrapper whose children carry the text themselves.
    WrapsTextChild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchStats {
    pub processed: usize,
    pub skipped: usize,
}

/// Buckets admitted elements by literal style signature. Every metric over
/// page text reads from here.
#[derive(Debug, Default)]
pub struct StyleAggregator {
    groups: StyleGroups,
    processed: ProcessedElements,
    interner: StyleInterner,
}

impl StyleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &StyleGroups {
        &self.groups
    }

    pub fn processed(&self) -> &ProcessedElements {
        &self.processed
    }

    /// Forget everything from the previous page visit.
    pub fn reset(&mut self) {
        self.groups.clear();
        self.processed.clear();
        self.interner.clear();
    }

    /// Cheap pre-checks, run before any text resolution.
    pub fn is_candidate(&self, snapshot: &ElementSnapshot, lineage: &Lineage) -> Result<(), Admission> {
        if !snapshot.is_visible || !is_visible(&snapshot.paint, &snapshot.rect) {
            return Err(Admission::Invisible);
        }
        if is_processed_child(snapshot.id, &self.processed, lineage) {
            return Err(Admission::Duplicate);
        }
        Ok(())
    }

    /// Gate one element with its already-resolved display text.
    pub fn admit(&mut self, snapshot: &ElementSnapshot, text: &str, lineage: &Lineage) -> Admission {
        if let Err(rejection) = self.is_candidate(snapshot, lineage) {
            return rejection;
        }

        let is_button = snapshot_is_button_like(snapshot);
        let has_text = !text.is_empty();
        let has_icon = snapshot.has_icon();

        if !has_text && !(is_button && has_icon) {
            return Admission::NoContent;
        }
        if !is_button && has_text && snapshot.has_text_child {
            return Admission::WrapsTextChild;
        }

        let background = resolve_background(snapshot.id, &snapshot.background_color, lineage);
        let key = self
            .interner
            .key(&snapshot.font_size, &snapshot.color, &background);

        self.groups.push(
            key.clone(),
            ElementRecord {
                id: snapshot.id,
                index: snapshot.index,
                text: text.to_string(),
                is_button,
                has_icon,
                width: snapshot.rect.width,
                height: snapshot.rect.height,
                font_size_px: parse_font_size_px(&snapshot.font_size),
            },
        );
        self.processed.insert(snapshot.id);
        Admission::Admitted(key)
    }

    /// Admit a whole extraction batch. `resolve_text` is only called for
    /// elements that pass the visibility and ownership pre-checks.
    pub fn admit_batch<F>(
        &mut self,
        entries: &[SnapshotEntry],
        lineage: &Lineage,
        mut resolve_text: F,
    ) -> BatchStats
    where
        F: FnMut(&ElementSnapshot) -> String,
    {
        info!("Batch admission started: {} elements", entries.len());
        let mut stats = BatchStats::default();

        for entry in entries {
            let snapshot: &ElementSnapshot = match entry {
                SnapshotEntry::Captured(snapshot) => snapshot,
                SnapshotEntry::Failed { index, error } => {
                    debug!(index, %error, "element extraction failed");
                    stats.skipped += 1;
                    continue;
                }
            };

            if self.is_candidate(snapshot, lineage).is_err() {
                stats.skipped += 1;
                continue;
            }

            let text = resolve_text(snapshot);
            match self.admit(snapshot, &text, lineage) {
                Admission::Admitted(_) => {
                    stats.processed += 1;
                    if stats.processed % 100 == 0 {
                        info!("Progress: {}/{} admitted", stats.processed, entries.len());
                    }
                }
                rejection => {
                    debug!(element = snapshot.id.0, ?rejection, "element not admitted");
                    stats.skipped += 1;
                }
            }
        }

        info!(
            "Batch admission done: {} admitted, {} skipped",
            stats.processed, stats.skipped
        );
        stats
    }
}
