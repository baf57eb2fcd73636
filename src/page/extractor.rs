use tracing::{debug, info};

use crate::analysis::error::AnalysisError;
use crate::browser::page_session::PageSession;
use crate::controls::control_model::ControlEntry;
use crate::page::element_model::{ElementId, SnapshotEntry, ViewportSize};
use crate::page::visibility::{is_in_viewport, is_visible};

/// Everything that can carry text or act as a control.
pub const CONTENT_SELECTOR: &str = "a,button,input,textarea,select,label,\
[role='button'],[onclick],[href],[class*='btn'],[class*='button'],\
[id*='btn'],[id*='button'],h1,h2,h3,h4,h5,h6,p,li,span,div";

fn check_alignment(command: &str, expected: usize, got: usize) -> Result<(), AnalysisError> {
    if expected != got {
        return Err(AnalysisError::SessionProtocol {
            command: command.into(),
            error: format!("expected {} entries, got {}", expected, got),
        });
    }
    Ok(())
}

/// Extract snapshots for a batch of elements in one round trip.
///
/// The result is index-aligned with `ids`; elements that failed on the page
/// side come back as `SnapshotEntry::Failed` instead of aborting the batch.
pub fn extract_snapshots(
    session: &mut dyn PageSession,
    ids: &[ElementId],
) -> Result<Vec<SnapshotEntry>, AnalysisError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let entries = session.snapshot(ids)?;
    check_alignment("snapshot", ids.len(), entries.len())?;

    let failed = entries.iter().filter(|e| e.captured().is_none()).count();
    debug!(requested = ids.len(), failed, "snapshot batch extracted");
    Ok(entries)
}

/// Same contract as `extract_snapshots`, for control records.
pub fn extract_controls(
    session: &mut dyn PageSession,
    ids: &[ElementId],
    probe_feedback: bool,
) -> Result<Vec<ControlEntry>, AnalysisError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let entries = session.controls(ids, probe_feedback)?;
    check_alignment("controls", ids.len(), entries.len())?;
    Ok(entries)
}

/// Keep entries that are painted and on screen. Failed entries are kept so
/// the admission pass counts them as skipped.
pub fn retain_viewport(entries: Vec<SnapshotEntry>, viewport: &ViewportSize) -> Vec<SnapshotEntry> {
    entries
        .into_iter()
        .filter(|entry| match entry.captured() {
            Some(s) => is_visible(&s.paint, &s.rect) && is_in_viewport(&s.rect, viewport),
            None => true,
        })
        .collect()
}

/// Select every content element and snapshot those inside the viewport.
pub fn viewport_snapshots(
    session: &mut dyn PageSession,
    viewport: &ViewportSize,
) -> Result<Vec<SnapshotEntry>, AnalysisError> {
    let ids = session.select(CONTENT_SELECTOR)?;
    let entries = extract_snapshots(session, &ids)?;
    let kept = retain_viewport(entries, viewport);
    info!("Viewport elements: {} of {} selected", kept.len(), ids.len());
    Ok(kept)
}
