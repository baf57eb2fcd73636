use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::page::element_model::ElementSnapshot;

// ============================================================================
// Button-likeness and text resolution
// ============================================================================

pub fn is_button_like(tag: &str, role: Option<&str>, has_onclick: bool) -> bool {
    tag.eq_ignore_ascii_case("button")
        || role.is_some_and(|r| r.eq_ignore_ascii_case("button"))
        || has_onclick
}

pub fn snapshot_is_button_like(snapshot: &ElementSnapshot) -> bool {
    is_button_like(&snapshot.tag_name, snapshot.role.as_deref(), snapshot.onclick)
}

/// First non-empty of inner text, aria-label, title, form value.
pub fn resolve_label(
    text: &str,
    aria_label: Option<&str>,
    title: Option<&str>,
    value: Option<&str>,
) -> String {
    std::iter::once(Some(text))
        .chain([aria_label, title, value])
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn resolve_text(snapshot: &ElementSnapshot) -> String {
    resolve_label(
        &snapshot.text,
        snapshot.aria_label.as_deref(),
        snapshot.title.as_deref(),
        snapshot.value.as_deref(),
    )
}

// ============================================================================
// Icon-text recognition (OCR escape hatch)
// ============================================================================

/// Recognizes text drawn by an icon-only control from its vector markup.
///
/// Injected into the crawler at construction; a crawler without one never
/// attempts recognition.
pub trait IconTextRecognizer {
    /// Recognized text, or empty when nothing could be read.
    fn recognize(&self, vector_markup: &str) -> String;
}

/// Runs an external command that reads SVG markup on stdin and prints the
/// recognized text on stdout (rasterize + OCR happen on that side).
pub struct CommandRecognizer {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl IconTextRecognizer for CommandRecognizer {
    fn recognize(&self, vector_markup: &str) -> String {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to spawn icon recognizer '{}': {}", self.program, e);
                return String::new();
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(vector_markup.as_bytes()) {
                warn!("Failed to write markup to icon recognizer: {}", e);
            }
        }

        match child.wait_with_output() {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Ok(output) => {
                debug!("Icon recognizer exited with {}", output.status);
                String::new()
            }
            Err(e) => {
                warn!("Icon recognizer failed: {}", e);
                String::new()
            }
        }
    }
}

/// Resolve display text, falling back to icon recognition only for an
/// otherwise-empty button-like element that contains vector graphics.
///
/// `fetch_markup` is called at most once, and only when recognition will run.
pub fn resolve_text_with_icon_fallback<F>(
    snapshot: &ElementSnapshot,
    recognizer: Option<&dyn IconTextRecognizer>,
    fetch_markup: F,
) -> String
where
    F: FnOnce() -> Option<String>,
{
    let text = resolve_text(snapshot);
    if !text.is_empty() || !snapshot.has_svg || !snapshot_is_button_like(snapshot) {
        return text;
    }
    let Some(recognizer) = recognizer else {
        return text;
    };
    match fetch_markup() {
        Some(markup) if !markup.trim().is_empty() => {
            let recognized = recognizer.recognize(&markup).trim().to_string();
            debug!(element = snapshot.id.0, text = %recognized, "icon text recognized");
            recognized
        }
        _ => text,
    }
}
