use std::cell::{Cell, RefCell};

use page_accessibility::page::classifier::{
    IconTextRecognizer, is_button_like, resolve_text, resolve_text_with_icon_fallback,
};
use page_accessibility::page::element_model::{
    AncestorNode, ElementId, PaintState, Rect, ScrollMetrics, SnapshotEntry, ViewportSize,
};
use page_accessibility::page::lineage::{
    Lineage, ProcessedElements, is_processed_child, resolve_background,
};
use page_accessibility::page::visibility::{has_scrollbar, is_in_viewport, is_visible};
use page_accessibility::style::aggregator::{Admission, StyleAggregator};

use crate::common::fixtures::{BLACK, CLEAR, WHITE, element, styled};

mod common;

fn chain(nodes: &[(u64, &str)]) -> Vec<AncestorNode> {
    nodes
        .iter()
        .map(|&(id, bg)| AncestorNode {
            id: ElementId(id),
            background_color: bg.to_string(),
        })
        .collect()
}

fn lineage(chains: &[(u64, &[(u64, &str)])]) -> Lineage {
    let mut lineage = Lineage::new();
    for (id, nodes) in chains {
        lineage.record_chain(ElementId(*id), &chain(nodes));
    }
    lineage
}

// =========================================================================
// Visibility and viewport
// =========================================================================

#[test]
fn hidden_or_empty_boxes_are_invisible() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(is_visible(&PaintState::default(), &rect));

    let none = PaintState {
        display: "none".into(),
        ..PaintState::default()
    };
    let hidden = PaintState {
        visibility: "hidden".into(),
        ..PaintState::default()
    };
    let clear = PaintState {
        opacity: 0.0,
        ..PaintState::default()
    };
    assert!(!is_visible(&none, &rect));
    assert!(!is_visible(&hidden, &rect));
    assert!(!is_visible(&clear, &rect));
    assert!(!is_visible(&PaintState::default(), &Rect::new(0.0, 0.0, 0.0, 10.0)));
}

#[test]
fn viewport_overlap_is_strict() {
    let viewport = ViewportSize {
        width: 375.0,
        height: 812.0,
    };
    assert!(is_in_viewport(&Rect::new(0.0, 800.0, 10.0, 10.0), &viewport));
    assert!(!is_in_viewport(&Rect::new(0.0, 812.0, 10.0, 10.0), &viewport));
    assert!(!is_in_viewport(&Rect::new(0.0, -10.0, 10.0, 10.0), &viewport));
    assert!(!is_in_viewport(&Rect::new(375.0, 0.0, 10.0, 10.0), &viewport));
}

#[test]
fn scrollbars_from_document_extents() {
    let info = has_scrollbar(&ScrollMetrics {
        scroll_height: 2000.0,
        scroll_width: 375.0,
        inner_height: 812.0,
        inner_width: 375.0,
    });
    assert!(info.vertical_scroll);
    assert!(!info.horizontal_scroll);
}

// =========================================================================
// Lineage, ownership and background
// =========================================================================

#[test]
fn lineage_walks_to_the_root() {
    let lineage = lineage(&[(3, &[(2, CLEAR), (1, WHITE)])]);

    assert_eq!(lineage.parent(ElementId(3)), Some(Some(ElementId(2))));
    assert_eq!(lineage.parent(ElementId(1)), Some(None));
    assert_eq!(lineage.parent(ElementId(99)), None);
    assert_eq!(lineage.ancestors(ElementId(3)), vec![ElementId(2), ElementId(1)]);
}

#[test]
fn processed_ancestor_marks_descendants() {
    let lineage = lineage(&[(3, &[(2, CLEAR), (1, WHITE)])]);
    let mut processed = ProcessedElements::default();
    processed.insert(ElementId(2));

    assert!(is_processed_child(ElementId(3), &processed, &lineage));
    assert!(is_processed_child(ElementId(2), &processed, &lineage));
    assert!(!is_processed_child(ElementId(1), &processed, &lineage));
}

#[test]
fn unknown_lineage_fails_open() {
    let processed = {
        let mut p = ProcessedElements::default();
        p.insert(ElementId(1));
        p
    };
    assert!(!is_processed_child(ElementId(42), &processed, &Lineage::new()));
}

#[test]
fn background_falls_back_through_ancestors() {
    let lineage = lineage(&[(3, &[(2, "transparent"), (1, "rgb(10, 20, 30)")])]);

    assert_eq!(resolve_background(ElementId(3), CLEAR, &lineage), "rgb(10, 20, 30)");
    assert_eq!(resolve_background(ElementId(3), BLACK, &lineage), BLACK);
}

#[test]
fn background_defaults_to_white() {
    let lineage = lineage(&[(2, &[(1, CLEAR)])]);
    assert_eq!(resolve_background(ElementId(2), "transparent", &lineage), WHITE);
    assert_eq!(resolve_background(ElementId(9), CLEAR, &Lineage::new()), WHITE);
}

// =========================================================================
// Classifier and text resolution
// =========================================================================

#[test]
fn button_likeness() {
    assert!(is_button_like("BUTTON", None, false));
    assert!(is_button_like("div", Some("button"), false));
    assert!(is_button_like("span", None, true));
    assert!(!is_button_like("a", Some("link"), false));
}

#[test]
fn text_falls_back_to_attributes() {
    let mut e = element(1, "button", "   ");
    e.aria_label = Some(" ".into());
    e.title = Some("Close".into());
    assert_eq!(resolve_text(&e), "Close");

    e.title = None;
    e.value = Some("Send".into());
    assert_eq!(resolve_text(&e), "Send");
}

struct StubRecognizer {
    seen: RefCell<Vec<String>>,
}

impl IconTextRecognizer for StubRecognizer {
    fn recognize(&self, vector_markup: &str) -> String {
        self.seen.borrow_mut().push(vector_markup.to_string());
        " 검색 ".into()
    }
}

#[test]
fn icon_fallback_only_for_empty_vector_buttons() {
    let recognizer = StubRecognizer {
        seen: RefCell::new(Vec::new()),
    };
    let mut icon_button = element(1, "button", "");
    icon_button.has_svg = true;

    let fetched = Cell::new(0);
    let text = resolve_text_with_icon_fallback(&icon_button, Some(&recognizer), || {
        fetched.set(fetched.get() + 1);
        Some("<svg/>".into())
    });
    assert_eq!(text, "검색");
    assert_eq!(fetched.get(), 1);

    let labelled = element(2, "button", "Go");
    let text = resolve_text_with_icon_fallback(&labelled, Some(&recognizer), || {
        fetched.set(fetched.get() + 1);
        Some("<svg/>".into())
    });
    assert_eq!(text, "Go");
    assert_eq!(fetched.get(), 1, "markup must not be fetched for labelled elements");

    let text = resolve_text_with_icon_fallback(&icon_button, None, || {
        fetched.set(fetched.get() + 1);
        Some("<svg/>".into())
    });
    assert_eq!(text, "");
    assert_eq!(fetched.get(), 1, "markup must not be fetched without a recognizer");
    assert_eq!(recognizer.seen.borrow().len(), 1);
}

// =========================================================================
// Style-group admission
// =========================================================================

#[test]
fn identical_styles_share_one_group() {
    let mut agg = StyleAggregator::new();
    let lineage = Lineage::new();
    let a = styled(1, "first", "16px", "rgb(0,0,0)", "rgb(255,255,255)");
    let b = styled(2, "second", "16px", "rgb(0,0,0)", "rgb(255,255,255)");

    let ka = agg.admit(&a, "first", &lineage);
    let kb = agg.admit(&b, "second", &lineage);

    assert_eq!(ka, kb);
    assert!(matches!(ka, Admission::Admitted(_)));
    assert_eq!(agg.groups().len(), 1);
    assert_eq!(agg.groups().total_elements(), 2);
}

#[test]
fn descendants_of_admitted_elements_are_duplicates() {
    let mut agg = StyleAggregator::new();
    let lineage = lineage(&[(2, &[(1, WHITE)])]);
    let parent = element(1, "li", "Item");
    let child = element(2, "span", "Item");

    assert!(matches!(agg.admit(&parent, "Item", &lineage), Admission::Admitted(_)));
    assert_eq!(agg.admit(&child, "Item", &lineage), Admission::Duplicate);
    assert_eq!(agg.admit(&parent, "Item", &lineage), Admission::Duplicate);
    assert_eq!(agg.processed().len(), 1);
}

#[test]
fn rejections() {
    let mut agg = StyleAggregator::new();
    let lineage = Lineage::new();

    let mut hidden = element(1, "p", "Hi");
    hidden.is_visible = false;
    assert_eq!(agg.admit(&hidden, "Hi", &lineage), Admission::Invisible);

    let empty = element(2, "div", "");
    assert_eq!(agg.admit(&empty, "", &lineage), Admission::NoContent);

    let mut wrapper = element(3, "div", "Hello");
    wrapper.has_text_child = true;
    assert_eq!(agg.admit(&wrapper, "Hello", &lineage), Admission::WrapsTextChild);

    let mut button_wrapper = element(4, "button", "Hello");
    button_wrapper.has_text_child = true;
    assert!(matches!(
        agg.admit(&button_wrapper, "Hello", &lineage),
        Admission::Admitted(_)
    ));
}

#[test]
fn icon_only_button_is_admitted_without_text() {
    let mut agg = StyleAggregator::new();
    let mut icon = element(1, "button", "");
    icon.has_img = true;

    assert!(matches!(agg.admit(&icon, "", &Lineage::new()), Admission::Admitted(_)));
}

#[test]
fn transparent_background_is_resolved_into_the_key() {
    let mut agg = StyleAggregator::new();
    let lineage = lineage(&[(2, &[(1, "rgb(0, 0, 128)")])]);
    let text = element(2, "span", "Navy");

    match agg.admit(&text, "Navy", &lineage) {
        Admission::Admitted(key) => assert_eq!(&*key.background_color, "rgb(0, 0, 128)"),
        other => panic!("expected admission, got {:?}", other),
    }
}

#[test]
fn batch_counts_failures_and_skips_text_resolution_for_duplicates() {
    let mut agg = StyleAggregator::new();
    let lineage = lineage(&[(2, &[(1, WHITE)])]);
    let entries = vec![
        SnapshotEntry::Captured(Box::new(element(1, "p", "Parent"))),
        SnapshotEntry::Captured(Box::new(element(2, "span", "Child"))),
        SnapshotEntry::Failed {
            index: 2,
            error: "detached".into(),
        },
    ];

    let mut resolved = Vec::new();
    let stats = agg.admit_batch(&entries, &lineage, |s| {
        resolved.push(s.id);
        resolve_text(s)
    });

    assert_eq!(stats.processed, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(resolved, vec![ElementId(1)]);
}

#[test]
fn reset_forgets_the_previous_page() {
    let mut agg = StyleAggregator::new();
    let lineage = Lineage::new();
    let e = element(1, "p", "Hi");

    assert!(matches!(agg.admit(&e, "Hi", &lineage), Admission::Admitted(_)));
    agg.reset();
    assert!(agg.groups().is_empty());
    assert!(agg.processed().is_empty());
    assert!(matches!(agg.admit(&e, "Hi", &lineage), Admission::Admitted(_)));
}
