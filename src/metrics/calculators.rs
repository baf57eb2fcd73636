use serde::{Deserialize, Serialize};

use crate::controls::control_model::ButtonSummaryRecord;
use crate::metrics::color::{MIN_CONTRAST, css_contrast};
use crate::metrics::script::script_ratio;
use crate::style::style_group::{StyleGroupKey, StyleGroups};

/// Pass/fail thresholds used by the metric calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_min_contrast")]
    pub min_contrast: f64,
    #[serde(default = "default_min_text_size_px")]
    pub min_text_size_px: f64,
    #[serde(default = "default_min_button_size")]
    pub min_button_size: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_contrast: MIN_CONTRAST,
            min_text_size_px: 16.0,
            min_button_size: 44.0,
        }
    }
}

fn default_min_contrast() -> f64 { MIN_CONTRAST }
fn default_min_text_size_px() -> f64 { 16.0 }
fn default_min_button_size() -> f64 { 44.0 }

fn percentage(passing: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    passing as f64 / total as f64 * 100.0
}

// ============================================================================
// Style-group metrics (weighted by group membership)
// ============================================================================

fn weighted_score<P>(groups: &StyleGroups, passes: P) -> f64
where
    P: Fn(&StyleGroupKey) -> bool,
{
    let (passing, total) = groups.iter().fold((0, 0), |(passing, total), (key, records)| {
        let n = records.len();
        (passing + if passes(key) { n } else { 0 }, total + n)
    });
    percentage(passing, total)
}

/// Share of admitted elements whose font size meets the minimum.
pub fn font_size_score(groups: &StyleGroups, thresholds: &Thresholds) -> f64 {
    weighted_score(groups, |key| key.font_size_px() >= thresholds.min_text_size_px)
}

/// Share of admitted elements whose text/background contrast meets the minimum.
pub fn overall_contrast_score(groups: &StyleGroups, thresholds: &Thresholds) -> f64 {
    weighted_score(groups, |key| {
        css_contrast(&key.text_color, &key.background_color) >= thresholds.min_contrast
    })
}

/// Hangul share over every admitted element's text.
pub fn page_script_ratio(groups: &StyleGroups) -> f64 {
    script_ratio(groups.records().map(|r| r.text.as_str()))
}

fn graded_average<F>(groups: &StyleGroups, grade: F) -> f64
where
    F: Fn(&StyleGroupKey) -> f64,
{
    if groups.is_empty() {
        return 0.0;
    }
    let sum: f64 = groups.iter().map(|(key, _)| grade(key).min(1.0) * 100.0).sum();
    sum / groups.len() as f64
}

/// Per-group `min(contrast / threshold, 1)`, averaged over groups.
pub fn graded_contrast_average(groups: &StyleGroups, thresholds: &Thresholds) -> f64 {
    graded_average(groups, |key| {
        css_contrast(&key.text_color, &key.background_color) / thresholds.min_contrast
    })
}

/// Per-group `min(font px / threshold, 1)`, averaged over groups.
pub fn graded_font_average(groups: &StyleGroups, thresholds: &Thresholds) -> f64 {
    graded_average(groups, |key| key.font_size_px() / thresholds.min_text_size_px)
}

// ============================================================================
// Button metrics
// ============================================================================

pub fn button_size_score(buttons: &[ButtonSummaryRecord], thresholds: &Thresholds) -> f64 {
    let passing = buttons
        .iter()
        .filter(|b| b.width >= thresholds.min_button_size && b.height >= thresholds.min_button_size)
        .count();
    percentage(passing, buttons.len())
}

pub fn button_contrast_score(buttons: &[ButtonSummaryRecord], thresholds: &Thresholds) -> f64 {
    let passing = buttons
        .iter()
        .filter(|b| css_contrast(&b.text_color, &b.background_color) >= thresholds.min_contrast)
        .count();
    percentage(passing, buttons.len())
}

/// Share of buttons showing at least two interactive-state changes.
pub fn visual_feedback_score(buttons: &[ButtonSummaryRecord]) -> f64 {
    let passing = buttons
        .iter()
        .filter(|b| b.feedback.change_count() >= 2)
        .count();
    percentage(passing, buttons.len())
}
