use serde::{Deserialize, Serialize};

use crate::page::element_model::{ElementId, PaintState, Rect};

/// Six interactive-state deltas reported by the session when it probes
/// hover/focus/active styles. All false when probing is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFeedback {
    #[serde(default)]
    pub background_change: bool,
    #[serde(default)]
    pub text_change: bool,
    #[serde(default)]
    pub border_change: bool,
    #[serde(default)]
    pub shadow_change: bool,
    #[serde(default)]
    pub transform_change: bool,
    #[serde(default)]
    pub size_change: bool,
}

impl StateFeedback {
    pub fn change_count(&self) -> usize {
        [
            self.background_change,
            self.text_change,
            self.border_change,
            self.shadow_change,
            self.transform_change,
            self.size_change,
        ]
        .into_iter()
        .filter(|&changed| changed)
        .count()
    }
}

/// Raw per-control data from the `controls` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSnapshot {
    pub id: ElementId,
    pub tag_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub onclick: Option<String>,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub border: String,
    #[serde(default)]
    pub box_shadow: String,
    pub color: String,
    pub background_color: String,
    #[serde(flatten)]
    pub paint: PaintState,
    pub rect: Rect,
    #[serde(default)]
    pub feedback: Option<StateFeedback>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlEntry {
    Failed { index: usize, error: String },
    Captured(Box<ControlSnapshot>),
}

impl ControlEntry {
    pub fn captured(&self) -> Option<&ControlSnapshot> {
        match self {
            ControlEntry::Captured(control) => Some(control),
            ControlEntry::Failed { .. } => None,
        }
    }
}

/// A control accepted by the pagination matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageControlCandidate {
    pub id: ElementId,
    pub label: String,
    pub has_click_affordance: bool,
}

/// Per-button record consumed by the size, contrast and feedback metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonSummaryRecord {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
    pub cursor: String,
    pub border: String,
    pub box_shadow: String,
    pub element_type: String,
    pub role: Option<String>,
    pub href: Option<String>,
    pub onclick: Option<String>,
    pub class: String,
    #[serde(default)]
    pub feedback: StateFeedback,
}
