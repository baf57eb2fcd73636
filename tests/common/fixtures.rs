use page_accessibility::controls::control_model::{
    ButtonSummaryRecord, ControlSnapshot, StateFeedback,
};
use page_accessibility::page::element_model::{ElementId, ElementSnapshot, PaintState, Rect};

pub const BLACK: &str = "rgb(0, 0, 0)";
pub const WHITE: &str = "rgb(255, 255, 255)";
pub const CLEAR: &str = "rgba(0, 0, 0, 0)";

/// A visible 100x20 text element on a transparent background.
pub fn element(id: u64, tag: &str, text: &str) -> ElementSnapshot {
    ElementSnapshot {
        id: ElementId(id),
        index: 0,
        tag_name: tag.to_string(),
        text: text.to_string(),
        aria_label: None,
        title: None,
        value: None,
        font_size: "16px".into(),
        color: BLACK.into(),
        background_color: CLEAR.into(),
        paint: PaintState::default(),
        rect: Rect::new(0.0, id as f64 * 24.0, 100.0, 20.0),
        role: None,
        onclick: false,
        has_svg: false,
        has_img: false,
        has_text_child: false,
        is_visible: true,
    }
}

pub fn styled(id: u64, text: &str, font_size: &str, color: &str, background: &str) -> ElementSnapshot {
    ElementSnapshot {
        font_size: font_size.into(),
        color: color.into(),
        background_color: background.into(),
        ..element(id, "p", text)
    }
}

/// A visible 48x48 control with black text on white.
pub fn control(id: u64, tag: &str, text: &str) -> ControlSnapshot {
    ControlSnapshot {
        id: ElementId(id),
        tag_name: tag.to_string(),
        text: text.to_string(),
        aria_label: None,
        title: None,
        value: None,
        placeholder: None,
        role: None,
        href: None,
        onclick: None,
        class_name: String::new(),
        cursor: "auto".into(),
        border: "0px none".into(),
        box_shadow: "none".into(),
        color: BLACK.into(),
        background_color: WHITE.into(),
        paint: PaintState::default(),
        rect: Rect::new(10.0, id as f64 * 50.0, 48.0, 48.0),
        feedback: None,
    }
}

pub fn button(width: f64, height: f64) -> ButtonSummaryRecord {
    ButtonSummaryRecord {
        x: 0.0,
        y: 0.0,
        width,
        height,
        text: "OK".into(),
        background_color: WHITE.into(),
        text_color: BLACK.into(),
        cursor: "pointer".into(),
        border: "1px solid rgb(0, 0, 0)".into(),
        box_shadow: "none".into(),
        element_type: "button".into(),
        role: None,
        href: None,
        onclick: None,
        class: String::new(),
        feedback: StateFeedback::default(),
    }
}
