//! Fuses the page metrics and the detector's button count into one weighted
//! score, a severity tier, a grade, and remediation advice.

use tracing::info;

use crate::scoring::score_model::{
    CompositeResult, Grade, Issue, MetricInputs, MetricKind, MetricScore, Priority,
    Recommendation, Severity,
};

/// Share of the composite given to each metric bracket. Sums to 1.
pub const BUTTON_WEIGHT: f64 = 0.25;
pub const BUTTON_STYLE_WEIGHT: f64 = 0.05;
pub const TEXT_WEIGHT: f64 = 0.4;
pub const SCRIPT_WEIGHT: f64 = 0.3;

/// Split of the button bracket between detection agreement and feedback.
const AGREEMENT_SHARE: f64 = 0.8;
const FEEDBACK_SHARE: f64 = 0.2;

/// Metrics scoring below this are reported as issues.
pub const ISSUE_THRESHOLD: f64 = 30.0;

/// Composite scores below this get the overall-improvement recommendation.
pub const OVERALL_IMPROVEMENT_THRESHOLD: f64 = 50.0;

/// Effective weight of a single metric in the composite.
pub fn effective_weight(kind: MetricKind) -> f64 {
    match kind {
        MetricKind::ButtonDetection => BUTTON_WEIGHT * AGREEMENT_SHARE,
        MetricKind::ButtonVisualFeedback => BUTTON_WEIGHT * FEEDBACK_SHARE,
        MetricKind::ButtonSize | MetricKind::ButtonContrast => BUTTON_STYLE_WEIGHT * 0.5,
        MetricKind::FontSize | MetricKind::OverallContrast => TEXT_WEIGHT * 0.5,
        MetricKind::KoreanRatio => SCRIPT_WEIGHT,
    }
}

/// How closely the crawled control count matches the detected one, in
/// [0, 100]. Zero when nothing was crawled.
pub fn detection_agreement(crawled: usize, detected: usize) -> f64 {
    if crawled == 0 {
        return 0.0;
    }
    let difference = crawled.abs_diff(detected) as f64;
    (1.0 - difference / crawled as f64).max(0.0) * 100.0
}

pub fn composite_score(agreement: f64, inputs: &MetricInputs) -> f64 {
    let button = (AGREEMENT_SHARE * agreement + FEEDBACK_SHARE * inputs.button_visual_feedback)
        * BUTTON_WEIGHT;
    let button_style = (0.5 * inputs.button_size + 0.5 * inputs.button_contrast) * BUTTON_STYLE_WEIGHT;
    let text = (0.5 * inputs.font_size + 0.5 * inputs.overall_contrast) * TEXT_WEIGHT;
    let script = inputs.korean_ratio * SCRIPT_WEIGHT;

    (button + button_style + text + script).clamp(0.0, 100.0)
}

fn metric_value(kind: MetricKind, agreement: f64, inputs: &MetricInputs) -> f64 {
    match kind {
        MetricKind::ButtonDetection => agreement,
        MetricKind::ButtonVisualFeedback => inputs.button_visual_feedback,
        MetricKind::ButtonSize => inputs.button_size,
        MetricKind::ButtonContrast => inputs.button_contrast,
        MetricKind::FontSize => inputs.font_size,
        MetricKind::OverallContrast => inputs.overall_contrast,
        MetricKind::KoreanRatio => inputs.korean_ratio,
    }
}

/// Every metric below the issue threshold, with its tier.
pub fn find_issues(scores: &[MetricScore]) -> Vec<Issue> {
    scores
        .iter()
        .filter(|s| s.value < ISSUE_THRESHOLD)
        .map(|s| Issue {
            kind: s.kind,
            score: s.value,
            severity: s.severity,
        })
        .collect()
}

fn recommendation(category: &str, priority: Priority, text: &str) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        priority,
        recommendation: text.to_string(),
    }
}

/// Fixed remediation advice per issue category.
///
/// Button and overall contrast share one recommendation.
pub fn generate_recommendations(issues: &[Issue], final_score: f64) -> Vec<Recommendation> {
    let has = |kind: MetricKind| issues.iter().any(|i| i.kind == kind);
    let mut out = Vec::new();

    if has(MetricKind::ButtonDetection) {
        out.push(recommendation(
            "Button detection",
            Priority::High,
            "Use proper HTML elements for buttons (button, input type='button') and add role='button' to custom controls.",
        ));
    }
    if has(MetricKind::ButtonVisualFeedback) {
        out.push(recommendation(
            "Button visual feedback",
            Priority::Medium,
            "Add visible hover, focus and active state changes to buttons.",
        ));
    }
    if has(MetricKind::ButtonSize) {
        out.push(recommendation(
            "Button size",
            Priority::High,
            "Make buttons at least 44x44px.",
        ));
    }
    if has(MetricKind::ButtonContrast) || has(MetricKind::OverallContrast) {
        out.push(recommendation(
            "Contrast",
            Priority::High,
            "Keep the text/background contrast ratio at 4.5:1 or higher.",
        ));
    }
    if has(MetricKind::FontSize) {
        out.push(recommendation(
            "Font size",
            Priority::Medium,
            "Set body text to at least 16px.",
        ));
    }
    if has(MetricKind::KoreanRatio) {
        out.push(recommendation(
            "Korean language support",
            Priority::High,
            "Provide the main content and UI elements in Korean.",
        ));
    }
    if final_score < OVERALL_IMPROVEMENT_THRESHOLD {
        out.push(recommendation(
            "Overall improvement",
            Priority::VeryHigh,
            "Broad improvements are needed; follow the Korean Web Content Accessibility Guidelines (KWCAG 2.1).",
        ));
    }

    out
}

/// Score a page from its metrics and the two control counts.
pub fn evaluate(inputs: &MetricInputs, crawled: usize, detected: usize) -> CompositeResult {
    let agreement = detection_agreement(crawled, detected);

    let scores: Vec<MetricScore> = MetricKind::ALL
        .iter()
        .map(|&kind| {
            let value = metric_value(kind, agreement, inputs);
            MetricScore {
                kind,
                value,
                weight: effective_weight(kind),
                severity: Severity::from_score(value),
            }
        })
        .collect();

    let final_score = composite_score(agreement, inputs);
    let issues = find_issues(&scores);
    let recommendations = generate_recommendations(&issues, final_score);

    info!(
        final_score,
        crawled,
        detected,
        issues = issues.len(),
        "composite score computed"
    );

    CompositeResult {
        scores,
        crawled_count: crawled,
        detected_count: detected,
        final_score,
        grade: Grade::from_score(final_score),
        severity: Severity::from_score(final_score),
        issues,
        recommendations,
    }
}
