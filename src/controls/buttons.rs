use tracing::info;

use crate::analysis::error::AnalysisError;
use crate::browser::page_session::PageSession;
use crate::controls::control_model::{ButtonSummaryRecord, ControlEntry, ControlSnapshot};
use crate::page::element_model::ViewportSize;
use crate::page::extractor::extract_controls;
use crate::page::visibility::{is_in_viewport, is_visible};

pub const BUTTON_SELECTORS: [&str; 15] = [
    "button",
    "[role='button']",
    "input[type='button']",
    "input[type='submit']",
    "input[type='reset']",
    "a[href]",
    "a[onclick]",
    "[class*='btn']",
    "[class*='button']",
    "[id*='btn']",
    "[id*='button']",
    "span[onclick]",
    "div[onclick]",
    "[style*='cursor: pointer']",
    "[style*='cursor:pointer']",
];

const NO_TEXT: &str = "(none)";

fn summary_text(control: &ControlSnapshot) -> String {
    std::iter::once(Some(control.text.as_str()))
        .chain([
            control.aria_label.as_deref(),
            control.title.as_deref(),
            control.value.as_deref(),
            control.placeholder.as_deref(),
            control.href.as_deref(),
        ])
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(NO_TEXT)
        .to_string()
}

pub fn to_button_summary(control: &ControlSnapshot) -> ButtonSummaryRecord {
    ButtonSummaryRecord {
        x: control.rect.x,
        y: control.rect.y,
        width: control.rect.width,
        height: control.rect.height,
        text: summary_text(control),
        background_color: control.background_color.clone(),
        text_color: control.color.clone(),
        cursor: control.cursor.clone(),
        border: control.border.clone(),
        box_shadow: control.box_shadow.clone(),
        element_type: control.tag_name.to_lowercase(),
        role: control.role.clone(),
        href: control.href.clone(),
        onclick: control.onclick.clone(),
        class: control.class_name.clone(),
        feedback: control.feedback.unwrap_or_default(),
    }
}

/// Visible, on-screen controls as button summary records.
pub fn summarize_buttons(entries: &[ControlEntry], viewport: &ViewportSize) -> Vec<ButtonSummaryRecord> {
    entries
        .iter()
        .filter_map(ControlEntry::captured)
        .filter(|c| is_visible(&c.paint, &c.rect) && is_in_viewport(&c.rect, viewport))
        .map(to_button_summary)
        .collect()
}

/// Collect button summaries from the live page in two round trips.
pub fn collect_buttons(
    session: &mut dyn PageSession,
    viewport: &ViewportSize,
    probe_feedback: bool,
) -> Result<Vec<ButtonSummaryRecord>, AnalysisError> {
    let ids = session.select(&BUTTON_SELECTORS.join(","))?;
    let entries = extract_controls(session, &ids, probe_feedback)?;
    let buttons = summarize_buttons(&entries, viewport);
    info!("Buttons in viewport: {}", buttons.len());
    Ok(buttons)
}
