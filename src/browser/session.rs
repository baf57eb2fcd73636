use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::error::AnalysisError;
use crate::browser::page_session::PageSession;
use crate::cli::config::{BrowserConfig, DeviceViewport};
use crate::controls::control_model::ControlEntry;
use crate::page::element_model::{AncestorNode, ElementId, ScrollMetrics, SnapshotEntry};

/// Stylesheet injected into every new document: no animation or transition
/// noise, no vertical overflow, and a Hangul-capable font fallback.
pub const HARDENING_CSS: &str = r#"* { animation: none !important; transition: none !important; }
html, body { overflow-y: hidden !important; overscroll-behavior: none !important; scroll-behavior: auto !important; }
body, *:not(i):not(svg) { font-family: -apple-system, system-ui, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, "Apple SD Gothic Neo", "Noto Sans KR", "Malgun Gothic", sans-serif !important; }"#;

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Configure {
        viewport: DeviceViewport,
        user_agent: String,
        blocked_urls: Vec<String>,
        inject_css: String,
    },
    Navigate {
        url: String,
    },
    Wait {
        duration_ms: u64,
    },
    ScrollMetrics,
    Select {
        selector: String,
    },
    Snapshot {
        ids: Vec<ElementId>,
    },
    Ancestors {
        ids: Vec<ElementId>,
    },
    Controls {
        ids: Vec<ElementId>,
        probe_feedback: bool,
    },
    VectorMarkup {
        id: ElementId,
    },
    Screenshot {
        path: String,
        max_height: u32,
    },
    PageSource,
    Stylesheets,
    Quit,
}

impl BrowserRequest {
    pub fn configure(config: &BrowserConfig) -> Self {
        BrowserRequest::Configure {
            viewport: config.viewport,
            user_agent: config.user_agent.clone(),
            blocked_urls: config.blocked_urls.clone(),
            inject_css: HARDENING_CSS.to_string(),
        }
    }

    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            url: url.to_string(),
        }
    }

    pub fn select(selector: &str) -> Self {
        BrowserRequest::Select {
            selector: selector.to_string(),
        }
    }

    pub fn screenshot(path: &Path, max_height: u32) -> Self {
        BrowserRequest::Screenshot {
            path: path.display().to_string(),
            max_height,
        }
    }

    /// The `cmd` tag, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Configure { .. } => "configure",
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::Wait { .. } => "wait",
            BrowserRequest::ScrollMetrics => "scroll_metrics",
            BrowserRequest::Select { .. } => "select",
            BrowserRequest::Snapshot { .. } => "snapshot",
            BrowserRequest::Ancestors { .. } => "ancestors",
            BrowserRequest::Controls { .. } => "controls",
            BrowserRequest::VectorMarkup { .. } => "vector_markup",
            BrowserRequest::Screenshot { .. } => "screenshot",
            BrowserRequest::PageSource => "page_source",
            BrowserRequest::Stylesheets => "stylesheets",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
}

impl BrowserResponse {
    /// Decode `data` into the shape a command promises. A missing `data`
    /// decodes as JSON null.
    pub fn decode<T: DeserializeOwned>(self, command: &str) -> Result<T, AnalysisError> {
        let data = self.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| AnalysisError::JsonParse {
            context: format!("{} response data", command),
            source: e,
        })
    }
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium page open.
/// Commands are sent as NDJSON over stdin, responses read from stdout. The
/// process is told to quit and reaped when the session is dropped, so it is
/// released on every exit path.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn browser_server.js, wait for its ready signal, and apply the
    /// hardening profile.
    pub fn launch(config: &BrowserConfig) -> Result<Self, AnalysisError> {
        let mut child = Command::new(&config.node_binary)
            .arg(&config.server_script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AnalysisError::SubprocessSpawn {
                program: config.server_script.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AnalysisError::SessionIO("Failed to capture stdin of browser_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            AnalysisError::SessionIO("Failed to capture stdout of browser_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| AnalysisError::SessionIO(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| AnalysisError::JsonParse {
                context: "browser_server.js ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AnalysisError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser_server.js".into(),
            });
        }

        let mut session = BrowserSession {
            child,
            stdin,
            reader,
            closed: false,
        };
        session.send_ok(&BrowserRequest::configure(config))?;
        debug!(
            blocked = config.blocked_urls.len(),
            "browser session configured"
        );
        Ok(session)
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AnalysisError> {
        let json = serde_json::to_string(request).map_err(|e| AnalysisError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            AnalysisError::SessionIO(format!("Failed to write to browser_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            AnalysisError::SessionIO(format!("Failed to flush browser_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            AnalysisError::SessionIO(format!("Failed to read from browser_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(AnalysisError::SessionIO(
                "Empty response from browser_server.js (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| AnalysisError::JsonParse {
            context: "browser_server.js response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AnalysisError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(AnalysisError::SessionProtocol {
                command: request.name().into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    fn query<T: DeserializeOwned>(&mut self, request: BrowserRequest) -> Result<T, AnalysisError> {
        let name = request.name();
        self.send_ok(&request)?.decode(name)
    }

    /// Quit the browser session. Safe to call more than once.
    pub fn quit(&mut self) -> Result<(), AnalysisError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best-effort quit; the process may already be gone
        if let Err(e) = self.send(&BrowserRequest::Quit) {
            warn!("browser_server.js did not acknowledge quit: {}", e);
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageSession for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), AnalysisError> {
        self.send_ok(&BrowserRequest::navigate(url))
            .map_err(|e| AnalysisError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
            .map(|_| ())
    }

    fn wait_idle(&mut self, ms: u64) -> Result<(), AnalysisError> {
        self.send_ok(&BrowserRequest::Wait { duration_ms: ms })?;
        Ok(())
    }

    fn scroll_metrics(&mut self) -> Result<ScrollMetrics, AnalysisError> {
        self.query(BrowserRequest::ScrollMetrics)
    }

    fn select(&mut self, selector: &str) -> Result<Vec<ElementId>, AnalysisError> {
        self.query(BrowserRequest::select(selector))
    }

    fn snapshot(&mut self, ids: &[ElementId]) -> Result<Vec<SnapshotEntry>, AnalysisError> {
        self.query(BrowserRequest::Snapshot { ids: ids.to_vec() })
    }

    fn ancestors(
        &mut self,
        ids: &[ElementId],
    ) -> Result<Vec<Option<Vec<AncestorNode>>>, AnalysisError> {
        self.query(BrowserRequest::Ancestors { ids: ids.to_vec() })
    }

    fn controls(
        &mut self,
        ids: &[ElementId],
        probe_feedback: bool,
    ) -> Result<Vec<ControlEntry>, AnalysisError> {
        self.query(BrowserRequest::Controls {
            ids: ids.to_vec(),
            probe_feedback,
        })
    }

    fn vector_markup(&mut self, id: ElementId) -> Result<Option<String>, AnalysisError> {
        self.query(BrowserRequest::VectorMarkup { id })
    }

    fn screenshot(&mut self, path: &Path, max_height: u32) -> Result<(), AnalysisError> {
        self.send_ok(&BrowserRequest::screenshot(path, max_height))
            .map_err(|e| AnalysisError::Screenshot(e.to_string()))?;
        Ok(())
    }

    fn page_source(&mut self) -> Result<String, AnalysisError> {
        self.query(BrowserRequest::PageSource)
    }

    fn stylesheet_links(&mut self) -> Result<Vec<String>, AnalysisError> {
        self.query(BrowserRequest::Stylesheets)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
