use std::collections::HashSet;

use tracing::{info, warn};

use crate::analysis::error::AnalysisError;
use crate::browser::page_session::PageSession;
use crate::controls::control_model::{ControlEntry, ControlSnapshot, PageControlCandidate};
use crate::page::classifier::resolve_label;
use crate::page::element_model::ElementId;
use crate::page::extractor::extract_controls;
use crate::page::visibility::is_visible;

/// Selectors for anything that looks clickable.
pub const CONTROL_SELECTORS: [&str; 12] = [
    "button",
    "[role='button']",
    "a[href]",
    "[onclick]",
    "[class*='btn']",
    "[class*='button']",
    "[id*='btn']",
    "[id*='button']",
    "span[onclick]",
    "div[onclick]",
    "[style*='cursor:pointer']",
    "[style*='cursor: pointer']",
];

/// Previous/next glyphs and words (Korean and English).
const PAGING_VOCABULARY: [&str; 8] = ["◀", "▶", "<", ">", "이전", "다음", "prev", "next"];

/// A page number or a prev/next control label.
pub fn is_paging_label(label: &str) -> bool {
    let label = label.trim();
    if label.is_empty() {
        return false;
    }
    if label.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = label.to_lowercase();
    PAGING_VOCABULARY.contains(&lower.as_str())
}

/// Whether the control visibly invites a click.
pub fn has_click_affordance(control: &ControlSnapshot) -> bool {
    if control.onclick.as_deref().is_some_and(|s| !s.is_empty()) {
        return true;
    }
    let tag = control.tag_name.to_lowercase();
    let has_href = control.href.as_deref().is_some_and(|h| !h.is_empty());
    let semantic = matches!(tag.as_str(), "a" | "button" | "input") && (has_href || tag == "button");
    let role_button = control
        .role
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("button"));

    semantic || role_button || control.cursor.to_lowercase().contains("pointer")
}

pub fn control_label(control: &ControlSnapshot) -> String {
    resolve_label(
        &control.text,
        control.aria_label.as_deref(),
        control.title.as_deref(),
        control.value.as_deref(),
    )
}

/// Match pagination controls among already-extracted control entries.
pub fn match_page_controls(entries: &[ControlEntry]) -> Vec<PageControlCandidate> {
    entries
        .iter()
        .filter_map(ControlEntry::captured)
        .filter(|control| is_visible(&control.paint, &control.rect))
        .filter_map(|control| {
            let label = control_label(control);
            is_paging_label(&label).then(|| PageControlCandidate {
                id: control.id,
                label,
                has_click_affordance: has_click_affordance(control),
            })
        })
        .collect()
}

/// Union of all selector matches, first-seen order, without duplicates.
/// A selector the page rejects is logged and skipped.
pub fn select_candidates(
    session: &mut dyn PageSession,
    selectors: &[&str],
) -> Result<Vec<ElementId>, AnalysisError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for selector in selectors {
        match session.select(selector) {
            Ok(matched) => ids.extend(matched.into_iter().filter(|id| seen.insert(*id))),
            Err(AnalysisError::SessionProtocol { error, .. }) => {
                warn!("Selector '{}' failed: {}", selector, error);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(ids)
}

/// Find pagination controls on the live page.
pub fn find_page_controls(
    session: &mut dyn PageSession,
) -> Result<Vec<PageControlCandidate>, AnalysisError> {
    let ids = select_candidates(session, &CONTROL_SELECTORS)?;
    info!("Page control candidates: {}", ids.len());

    let entries = extract_controls(session, &ids, false)?;
    let controls = match_page_controls(&entries);

    info!("Page controls matched: {}", controls.len());
    Ok(controls)
}
