use std::path::Path;

use page_accessibility::browser::session::{BrowserRequest, BrowserResponse, HARDENING_CSS};
use page_accessibility::cli::config::BrowserConfig;
use page_accessibility::controls::control_model::ControlEntry;
use page_accessibility::page::element_model::{ElementId, ScrollMetrics, SnapshotEntry};

// =========================================================================
// BrowserRequest serialization
// =========================================================================

#[test]
fn browser_request_navigate_serializes_correctly() {
    let req = BrowserRequest::navigate("https://example.com");
    let json = serde_json::to_value(&req).unwrap();

    assert_eq!(json["cmd"], "navigate");
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(req.name(), "navigate");
}

#[test]
fn browser_request_configure_carries_hardening_profile() {
    let req = BrowserRequest::configure(&BrowserConfig::default());
    let json = serde_json::to_value(&req).unwrap();

    assert_eq!(json["cmd"], "configure");
    assert_eq!(json["viewport"]["width"], 375);
    assert_eq!(json["viewport"]["height"], 812);
    assert_eq!(json["viewport"]["device_scale_factor"], 3.0);
    assert!(json["user_agent"].as_str().unwrap().contains("iPhone"));
    assert!(json["blocked_urls"].as_array().unwrap().len() > 10);
    assert_eq!(json["inject_css"], HARDENING_CSS);
}

#[test]
fn browser_request_batches_serialize_ids_as_numbers() {
    let req = BrowserRequest::Controls {
        ids: vec![ElementId(4), ElementId(9)],
        probe_feedback: true,
    };
    let json = serde_json::to_value(&req).unwrap();

    assert_eq!(json["cmd"], "controls");
    assert_eq!(json["ids"], serde_json::json!([4, 9]));
    assert_eq!(json["probe_feedback"], true);
}

#[test]
fn browser_request_unit_variants_are_just_the_tag() {
    let json = serde_json::to_string(&BrowserRequest::ScrollMetrics).unwrap();
    assert_eq!(json, r#"{"cmd":"scroll_metrics"}"#);

    let json = serde_json::to_string(&BrowserRequest::PageSource).unwrap();
    assert_eq!(json, r#"{"cmd":"page_source"}"#);
}

#[test]
fn browser_request_screenshot_carries_height_cap() {
    let req = BrowserRequest::screenshot(Path::new("/tmp/shot.png"), 12000);
    let json = serde_json::to_value(&req).unwrap();

    assert_eq!(json["cmd"], "screenshot");
    assert_eq!(json["path"], "/tmp/shot.png");
    assert_eq!(json["max_height"], 12000);
}

// =========================================================================
// BrowserResponse decoding
// =========================================================================

#[test]
fn browser_response_ready_signal() {
    let resp: BrowserResponse = serde_json::from_str(r#"{"ok":true,"ready":true}"#).unwrap();
    assert!(resp.ok);
    assert_eq!(resp.ready, Some(true));
    assert!(resp.error.is_none());
}

#[test]
fn browser_response_decodes_scroll_metrics() {
    let resp: BrowserResponse = serde_json::from_str(
        r#"{"ok":true,"data":{"scrollHeight":3000,"scrollWidth":375,"innerHeight":812,"innerWidth":375}}"#,
    )
    .unwrap();
    let metrics: ScrollMetrics = resp.decode("scroll_metrics").unwrap();
    assert_eq!(metrics.scroll_height, 3000.0);
    assert_eq!(metrics.inner_width, 375.0);
}

#[test]
fn browser_response_missing_data_is_null() {
    let resp: BrowserResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
    let markup: Option<String> = resp.decode("vector_markup").unwrap();
    assert!(markup.is_none());
}

#[test]
fn browser_response_wrong_shape_is_parse_error() {
    let resp: BrowserResponse = serde_json::from_str(r#"{"ok":true,"data":"nope"}"#).unwrap();
    assert!(resp.decode::<Vec<ElementId>>("select").is_err());
}

#[test]
fn snapshot_batch_mixes_captured_and_failed() {
    let data = r#"[
        {"id": 1, "index": 0, "tagName": "P", "text": "안녕", "fontSize": "16px",
         "color": "rgb(0, 0, 0)", "backgroundColor": "rgba(0, 0, 0, 0)",
         "display": "block", "visibility": "visible", "opacity": 1,
         "rect": {"x": 0, "y": 10, "width": 200, "height": 24},
         "hasTextChild": false, "isVisible": true},
        {"index": 1, "error": "node is detached"}
    ]"#;
    let entries: Vec<SnapshotEntry> = serde_json::from_str(data).unwrap();

    let first = entries[0].captured().unwrap();
    assert_eq!(first.id, ElementId(1));
    assert_eq!(first.tag_name, "P");
    assert_eq!(first.paint.opacity, 1.0);
    assert!(!first.onclick);
    assert!(entries[1].captured().is_none());
}

#[test]
fn control_entry_reads_feedback_signals() {
    let data = r#"{"id": 5, "tagName": "BUTTON", "text": "Go", "cursor": "pointer",
        "color": "rgb(255, 255, 255)", "backgroundColor": "rgb(0, 90, 200)",
        "display": "inline-block", "visibility": "visible", "opacity": 1,
        "rect": {"x": 0, "y": 0, "width": 60, "height": 44},
        "feedback": {"backgroundChange": true, "shadowChange": true, "sizeChange": false}}"#;
    let entry: ControlEntry = serde_json::from_str(data).unwrap();

    let control = entry.captured().unwrap();
    assert_eq!(control.feedback.unwrap().change_count(), 2);
    assert_eq!(control.cursor, "pointer");
}
