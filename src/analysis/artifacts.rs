use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::browser::page_session::PageSession;

pub const STYLESHEET_TIMEOUT: Duration = Duration::from_secs(6);

/// Files written by a best-effort capture.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CapturedArtifacts {
    pub page_source: Option<PathBuf>,
    pub stylesheets: Vec<PathBuf>,
}

/// Save the page source and its linked stylesheets into `work_dir`.
///
/// Nothing here can fail the analysis: every error is logged and the
/// artifact skipped.
pub fn capture_artifacts(session: &mut dyn PageSession, work_dir: &Path) -> CapturedArtifacts {
    let mut captured = CapturedArtifacts::default();

    match session.page_source() {
        Ok(html) => {
            let path = work_dir.join("page.html");
            match fs::write(&path, html) {
                Ok(()) => captured.page_source = Some(path),
                Err(e) => warn!("Failed to save page source: {}", e),
            }
        }
        Err(e) => warn!("Failed to read page source: {}", e),
    }

    let links = match session.stylesheet_links() {
        Ok(links) => links,
        Err(e) => {
            warn!("Failed to list stylesheets: {}", e);
            return captured;
        }
    };
    captured.stylesheets = download_stylesheets(&links, work_dir);

    info!(
        "Artifacts saved: page source {}, {} of {} stylesheets",
        if captured.page_source.is_some() { "yes" } else { "no" },
        captured.stylesheets.len(),
        links.len()
    );
    captured
}

/// Fetch each absolute stylesheet URL as `style_N.css` (N counts from 1 over
/// `links`).
/// Where the stylesheet at position `index` of the link list is saved.
pub fn stylesheet_path(work_dir: &Path, index: usize) -> PathBuf {
    work_dir.join(format!("style_{}.css", index + 1))
}

pub fn download_stylesheets(links: &[String], work_dir: &Path) -> Vec<PathBuf> {
    if links.is_empty() {
        return Vec::new();
    }
    let client = match reqwest::blocking::Client::builder()
        .timeout(STYLESHEET_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build HTTP client: {}", e);
            return Vec::new();
        }
    };

    let mut saved = Vec::new();
    for (i, link) in links.iter().enumerate() {
        if !link.starts_with("http://") && !link.starts_with("https://") {
            warn!("Skipping stylesheet with non-HTTP URL: {}", link);
            continue;
        }
        let body = client
            .get(link)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text());
        match body {
            Ok(css) => {
                let path = stylesheet_path(work_dir, i);
                match fs::write(&path, css) {
                    Ok(()) => saved.push(path),
                    Err(e) => warn!("Failed to save stylesheet {}: {}", link, e),
                }
            }
            Err(e) => warn!("Failed to download stylesheet {}: {}", link, e),
        }
    }
    saved
}
