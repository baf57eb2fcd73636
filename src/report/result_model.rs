use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::analysis::crawler::PageMetrics;
use crate::scoring::score_model::{CompositeResult, MetricKind, Recommendation};

// ============================================================================
// Analysis report: the JSON document handed to result sinks
// ============================================================================

/// Round to two decimals for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `0.2` → `"20%"`, `0.025` → `"2.5%"`.
pub fn format_weight(weight: f64) -> String {
    let pct = (weight * 1000.0).round() / 10.0;
    if pct.fract() == 0.0 {
        format!("{:.0}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub url: String,
    pub analysis_date: DateTime<Local>,
    pub screenshot_path: String,
    pub task_id: String,
    pub website_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSection {
    pub vertical_scroll: bool,
    pub horizontal_scroll: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonAnalysis {
    pub crawled_button_count: usize,
    pub detected_button_count: usize,
    pub button_count_difference: usize,
    pub viewport_button_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub total_elements: usize,
    pub unique_styles: usize,
    pub graded_contrast_average: f64,
    pub graded_font_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedScore {
    pub score: f64,
    pub level: String,
    pub color: String,
    pub weight: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub final_score: f64,
    pub accessibility_level: String,
    pub grade: String,
    pub severity_level: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEntry {
    pub category: String,
    pub score: f64,
    pub level: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub category: String,
    pub priority: String,
    pub recommendation: String,
}

impl From<&Recommendation> for RecommendationEntry {
    fn from(r: &Recommendation) -> Self {
        Self {
            category: r.category.clone(),
            priority: r.priority.label().to_string(),
            recommendation: r.recommendation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_info: AnalysisInfo,
    pub scroll_info: ScrollSection,
    pub button_analysis: ButtonAnalysis,
    pub page_summary: PageSummary,
    /// Keyed by metric name (`button_detection`, `font_size`, ...).
    pub detailed_scores: BTreeMap<String, DetailedScore>,
    pub summary: Summary,
    pub issues: Vec<IssueEntry>,
    pub recommendations: Vec<RecommendationEntry>,
}

impl AnalysisReport {
    pub fn build(
        page: &PageMetrics,
        result: &CompositeResult,
        task_id: &str,
        website_id: Option<&str>,
        analysis_date: DateTime<Local>,
    ) -> Self {
        let detailed_scores = result
            .scores
            .iter()
            .map(|s| {
                (
                    s.kind.key().to_string(),
                    DetailedScore {
                        score: round2(s.value),
                        level: s.severity.label().to_string(),
                        color: s.severity.color().to_string(),
                        weight: format_weight(s.weight),
                        description: s.kind.description().to_string(),
                    },
                )
            })
            .collect();

        let issues = result
            .issues
            .iter()
            .map(|i| IssueEntry {
                category: i.kind.category().to_string(),
                score: round2(i.score),
                level: i.severity.label().to_string(),
                color: i.severity.color().to_string(),
            })
            .collect();

        Self {
            analysis_info: AnalysisInfo {
                url: page.url.clone(),
                analysis_date,
                screenshot_path: page.screenshot_path.display().to_string(),
                task_id: task_id.to_string(),
                website_id: website_id.map(str::to_string),
            },
            scroll_info: ScrollSection {
                vertical_scroll: page.scroll.vertical_scroll,
                horizontal_scroll: page.scroll.horizontal_scroll,
            },
            button_analysis: ButtonAnalysis {
                crawled_button_count: result.crawled_count,
                detected_button_count: result.detected_count,
                button_count_difference: result.count_difference(),
                viewport_button_count: page.viewport_button_count,
            },
            page_summary: PageSummary {
                total_elements: page.total_elements,
                unique_styles: page.unique_styles,
                graded_contrast_average: round2(page.graded_contrast_average),
                graded_font_average: round2(page.graded_font_average),
            },
            detailed_scores,
            summary: Summary {
                final_score: round2(result.final_score),
                accessibility_level: result.grade.label().to_string(),
                grade: result.grade.letter().to_string(),
                severity_level: result.severity.label().to_string(),
                color: result.severity.color().to_string(),
            },
            issues,
            recommendations: result.recommendations.iter().map(Into::into).collect(),
        }
    }

    pub fn detailed(&self, kind: MetricKind) -> Option<&DetailedScore> {
        self.detailed_scores.get(kind.key())
    }
}
