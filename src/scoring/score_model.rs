use serde::{Deserialize, Serialize};

// ============================================================================
// Metrics and their weights
// ============================================================================

/// The seven metrics fused into the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ButtonDetection,
    ButtonVisualFeedback,
    ButtonSize,
    ButtonContrast,
    FontSize,
    OverallContrast,
    KoreanRatio,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::ButtonDetection,
        MetricKind::ButtonVisualFeedback,
        MetricKind::ButtonSize,
        MetricKind::ButtonContrast,
        MetricKind::FontSize,
        MetricKind::OverallContrast,
        MetricKind::KoreanRatio,
    ];

    /// Key used in serialized reports.
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::ButtonDetection => "button_detection",
            MetricKind::ButtonVisualFeedback => "button_visual_feedback",
            MetricKind::ButtonSize => "button_size",
            MetricKind::ButtonContrast => "button_contrast",
            MetricKind::FontSize => "font_size",
            MetricKind::OverallContrast => "overall_contrast",
            MetricKind::KoreanRatio => "korean_ratio",
        }
    }

    /// Human-readable category name used in issues.
    pub fn category(&self) -> &'static str {
        match self {
            MetricKind::ButtonDetection => "Button detection",
            MetricKind::ButtonVisualFeedback => "Button visual feedback",
            MetricKind::ButtonSize => "Button size",
            MetricKind::ButtonContrast => "Button contrast",
            MetricKind::FontSize => "Font size",
            MetricKind::OverallContrast => "Overall contrast",
            MetricKind::KoreanRatio => "Korean text ratio",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::ButtonDetection => "Agreement between crawled and visually detected buttons",
            MetricKind::ButtonVisualFeedback => "How much visual feedback buttons give on interaction",
            MetricKind::ButtonSize => "Buttons meeting the minimum touch target size",
            MetricKind::ButtonContrast => "Text/background contrast of buttons",
            MetricKind::FontSize => "Adequacy of text font sizes",
            MetricKind::OverallContrast => "Text/background contrast across the page",
            MetricKind::KoreanRatio => "Share of Korean text",
        }
    }
}

// ============================================================================
// Severity tiers and grades
// ============================================================================

/// Three-level tier applied to any single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Severe,
    Moderate,
    Good,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Severity::Severe
        } else if score < 30.0 {
            Severity::Moderate
        } else {
            Severity::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Severe => "severe",
            Severity::Moderate => "moderate",
            Severity::Good => "good",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Severe => "red",
            Severity::Moderate => "orange",
            Severity::Good => "green",
        }
    }
}

/// Four-level grade, composite score only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 50.0 {
            Grade::A
        } else if score >= 40.0 {
            Grade::B
        } else if score >= 30.0 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "Excellent (grade A)",
            Grade::B => "Good (grade B)",
            Grade::C => "Fair (grade C)",
            Grade::D => "Poor (grade D)",
        }
    }
}

// ============================================================================
// Scores, issues, recommendations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub kind: MetricKind,
    pub value: f64,
    /// Effective share of the composite, in [0, 1].
    pub weight: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: MetricKind,
    pub score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    VeryHigh,
    High,
    Medium,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::VeryHigh => "very high",
            Priority::High => "high",
            Priority::Medium => "medium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub recommendation: String,
}

/// The six page-derived metric values, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricInputs {
    pub button_visual_feedback: f64,
    pub button_size: f64,
    pub button_contrast: f64,
    pub font_size: f64,
    pub overall_contrast: f64,
    pub korean_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    /// One entry per `MetricKind::ALL`, in that order.
    pub scores: Vec<MetricScore>,
    pub crawled_count: usize,
    pub detected_count: usize,
    pub final_score: f64,
    pub grade: Grade,
    pub severity: Severity,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

impl CompositeResult {
    pub fn score(&self, kind: MetricKind) -> Option<&MetricScore> {
        self.scores.iter().find(|s| s.kind == kind)
    }

    pub fn count_difference(&self) -> usize {
        self.crawled_count.abs_diff(self.detected_count)
    }
}
