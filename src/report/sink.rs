use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::analysis::error::AnalysisError;
use crate::report::result_model::AnalysisReport;

pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a finished report goes. Callers log delivery failures and carry on.
pub trait ResultSink {
    fn deliver(&self, task_id: &str, report: &AnalysisReport) -> Result<(), AnalysisError>;

    fn name(&self) -> String;
}

// ============================================================================
// File sink
// ============================================================================

/// Pretty JSON at `<dir>/<file_name>`, or `<dir>/<task_id>.json` when no
/// name is fixed.
#[derive(Debug, Clone)]
pub struct FileSink {
    pub dir: PathBuf,
    pub file_name: Option<String>,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: None,
        }
    }

    /// Write to an exact path instead.
    pub fn at(path: &Path) -> Self {
        Self {
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        }
    }

    pub fn path_for(&self, task_id: &str) -> PathBuf {
        match &self.file_name {
            Some(name) => self.dir.join(name),
            None => self.dir.join(format!("{}.json", task_id)),
        }
    }
}

impl ResultSink for FileSink {
    fn deliver(&self, task_id: &str, report: &AnalysisReport) -> Result<(), AnalysisError> {
        let path = self.path_for(task_id);
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(|e| AnalysisError::Io {
                context: format!("creating {}", self.dir.display()),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(report).map_err(|e| AnalysisError::JsonSerialize {
            context: "AnalysisReport".into(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| AnalysisError::Io {
            context: format!("writing {}", path.display()),
            source: e,
        })?;
        info!("Results saved to {}", path.display());
        Ok(())
    }

    fn name(&self) -> String {
        format!("file {}", self.dir.display())
    }
}

// ============================================================================
// Callback sink
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CallbackPayload<'a> {
    pub task_id: &'a str,
    pub results: &'a AnalysisReport,
}

/// POSTs `{task_id, results}` as JSON to a callback URL.
#[derive(Debug, Clone)]
pub struct CallbackSink {
    pub url: String,
    pub timeout: Duration,
}

impl CallbackSink {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timeout: CALLBACK_TIMEOUT,
        }
    }
}

impl ResultSink for CallbackSink {
    fn deliver(&self, task_id: &str, report: &AnalysisReport) -> Result<(), AnalysisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AnalysisError::Sink(format!("HTTP client: {}", e)))?;

        let response = client
            .post(&self.url)
            .json(&CallbackPayload {
                task_id,
                results: report,
            })
            .send()
            .map_err(|e| AnalysisError::Sink(format!("POST {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Sink(format!(
                "POST {} returned {}",
                self.url, status
            )));
        }
        info!("Results delivered to {} ({})", self.url, status);
        Ok(())
    }

    fn name(&self) -> String {
        format!("callback {}", self.url)
    }
}
