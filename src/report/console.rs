use crate::report::result_model::AnalysisReport;

// ============================================================================
// Console reporter: formatted terminal summary
// ============================================================================

/// Format an analysis report for terminal output.
///
/// Produces output like:
/// ```text
/// ==================================================
/// Accessibility analysis: https://example.com
/// ==================================================
/// Final score: 35.5/100
/// Grade: Fair (grade C)
/// Severity: good
///
/// Issues (1):
///   - Button size: 12.5/100 (severe)
///
/// Recommendations (2):
///   [high] Button size: Make buttons at least 44x44px.
/// ```
pub fn format_console_report(report: &AnalysisReport) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();

    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Accessibility analysis: {}\n", report.analysis_info.url));
    out.push_str(&format!("{}\n", rule));

    let summary = &report.summary;
    out.push_str(&format!("Final score: {}/100\n", summary.final_score));
    out.push_str(&format!("Grade: {}\n", summary.accessibility_level));
    out.push_str(&format!("Severity: {}\n", summary.severity_level));

    let buttons = &report.button_analysis;
    out.push_str(&format!(
        "Buttons: {} crawled, {} detected (difference {})\n",
        buttons.crawled_button_count, buttons.detected_button_count, buttons.button_count_difference
    ));

    out.push_str(&format!("\nIssues ({}):\n", report.issues.len()));
    for issue in &report.issues {
        out.push_str(&format!(
            "  - {}: {}/100 ({})\n",
            issue.category, issue.score, issue.level
        ));
    }

    out.push_str(&format!("\nRecommendations ({}):\n", report.recommendations.len()));
    for rec in &report.recommendations {
        out.push_str(&format!(
            "  [{}] {}: {}\n",
            rec.priority, rec.category, rec.recommendation
        ));
    }

    out
}
