use serde::{Deserialize, Serialize};

/// Opaque handle the browser session assigns to a live DOM element.
///
/// Ids are stable for the lifetime of one page visit; the session keeps the
/// id → node registry on its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

/// Bounding client rect, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Computed-style fields that decide whether anything is painted at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintState {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            display: "block".into(),
            visibility: "visible".into(),
            opacity: 1.0,
        }
    }
}

/// Window inner extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Document scroll extents versus window inner extents.
///
/// `scroll_*` is already `max(body, documentElement)` on the session side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_height: f64,
    pub scroll_width: f64,
    pub inner_height: f64,
    pub inner_width: f64,
}

impl ScrollMetrics {
    pub fn viewport(&self) -> ViewportSize {
        ViewportSize {
            width: self.inner_width,
            height: self.inner_height,
        }
    }
}

// ============================================================================
// Per-element snapshot (one batched extraction per page visit)
// ============================================================================

/// Flat data record for one element, produced by the `snapshot` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub id: ElementId,
    #[serde(default)]
    pub index: usize,
    pub tag_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    pub font_size: String,
    pub color: String,
    pub background_color: String,
    #[serde(flatten)]
    pub paint: PaintState,
    pub rect: Rect,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub onclick: bool,
    #[serde(default)]
    pub has_svg: bool,
    #[serde(default)]
    pub has_img: bool,
    /// Any direct child element renders non-empty text.
    #[serde(default)]
    pub has_text_child: bool,
    pub is_visible: bool,
}

impl ElementSnapshot {
    pub fn has_icon(&self) -> bool {
        self.has_svg || self.has_img
    }
}

/// One slot of a batched extraction, index-aligned with the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotEntry {
    /// The element vanished or threw while being read.
    Failed { index: usize, error: String },
    Captured(Box<ElementSnapshot>),
}

impl SnapshotEntry {
    pub fn captured(&self) -> Option<&ElementSnapshot> {
        match self {
            SnapshotEntry::Captured(snapshot) => Some(snapshot),
            SnapshotEntry::Failed { .. } => None,
        }
    }
}

/// One step of a materialized ancestor chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorNode {
    pub id: ElementId,
    pub background_color: String,
}
