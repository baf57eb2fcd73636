use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::error::AnalysisError;

/// Detections past this index are ignored.
pub const MAX_DETECTIONS: usize = 50;

pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// VINS labels counted as interactive: Checked View, Icon, Input Field,
/// Text Button, Switch.
pub const INTERACTIVE_LABELS: [u32; 5] = [3, 4, 5, 8, 12];

/// Counts interactive controls in a page screenshot.
pub trait VisualDetector {
    fn detect(&self, image: &Path) -> Result<usize, AnalysisError>;
}

/// One detection as emitted by the inference command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: u32,
    pub score: f64,
    /// `[x1, y1, x2, y2]` in screenshot pixels.
    #[serde(rename = "box", default)]
    pub bbox: Vec<f64>,
}

/// VINS class name for a label.
pub fn class_name(label: u32) -> &'static str {
    match label {
        0 => "BACKGROUND",
        1 => "OTHER",
        2 => "Background Image",
        3 => "Checked View",
        4 => "Icon",
        5 => "Input Field",
        6 => "Image",
        7 => "Text",
        8 => "Text Button",
        9 => "Page Indicator",
        10 => "Pop-Up Window",
        11 => "Sliding Menu",
        12 => "Switch",
        _ => "unknown",
    }
}

pub fn count_interactive(detections: &[Detection]) -> usize {
    detections
        .iter()
        .take(MAX_DETECTIONS)
        .filter(|d| d.score > CONFIDENCE_THRESHOLD && INTERACTIVE_LABELS.contains(&d.label))
        .count()
}

// ============================================================================
// Command-backed detector
// ============================================================================

/// Runs an external inference command as `<program> <args..> <image>` and
/// reads a JSON array of detections from its stdout.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandDetector {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl VisualDetector for CommandDetector {
    fn detect(&self, image: &Path) -> Result<usize, AnalysisError> {
        if !image.exists() {
            return Err(AnalysisError::Detector(format!(
                "screenshot not found: {}",
                image.display()
            )));
        }

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AnalysisError::SubprocessSpawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(AnalysisError::SubprocessFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let detections: Vec<Detection> =
            serde_json::from_slice(&output.stdout).map_err(|e| AnalysisError::JsonParse {
                context: format!("{} detections", self.program),
                source: e,
            })?;

        for d in detections.iter().take(MAX_DETECTIONS) {
            debug!(label = class_name(d.label), score = d.score, "detection");
        }

        let count = count_interactive(&detections);
        info!("Detected buttons: {} (of {} detections)", count, detections.len());
        Ok(count)
    }
}

/// Returns a fixed count. Used for offline scoring.
#[derive(Debug, Clone, Copy)]
pub struct FixedDetector(pub usize);

impl VisualDetector for FixedDetector {
    fn detect(&self, _image: &Path) -> Result<usize, AnalysisError> {
        Ok(self.0)
    }
}
