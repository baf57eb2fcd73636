use serde::{Deserialize, Serialize};

use crate::page::element_model::{PaintState, Rect, ScrollMetrics, ViewportSize};

/// Something is painted: not `display:none`, not hidden, not fully
/// transparent, and with a non-empty box.
pub fn is_visible(paint: &PaintState, rect: &Rect) -> bool {
    paint.display != "none"
        && paint.visibility != "hidden"
        && paint.opacity > 0.0
        && rect.width > 0.0
        && rect.height > 0.0
}

/// The box overlaps the viewport rectangle on both axes.
pub fn is_in_viewport(rect: &Rect, viewport: &ViewportSize) -> bool {
    rect.bottom() > 0.0
        && rect.right() > 0.0
        && rect.top() < viewport.height
        && rect.left() < viewport.width
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollInfo {
    pub vertical_scroll: bool,
    pub horizontal_scroll: bool,
}

pub fn has_scrollbar(metrics: &ScrollMetrics) -> ScrollInfo {
    ScrollInfo {
        vertical_scroll: metrics.scroll_height > metrics.inner_height,
        horizontal_scroll: metrics.scroll_width > metrics.inner_width,
    }
}
