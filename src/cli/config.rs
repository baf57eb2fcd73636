use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::analysis::crawler::CrawlSettings;
use crate::metrics::calculators::Thresholds;

pub const DEFAULT_CONFIG_PATH: &str = "page-accessibility.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-accessibility",
    version,
    about = "Scores a web page's accessibility from its DOM and a visual button count"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: page-accessibility.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a live page and score it
    Analyze {
        /// Page to analyze
        #[arg(long)]
        url: String,

        /// POST the results to this URL when done
        #[arg(long)]
        callback_url: Option<String>,

        /// Task id (default: derived from the URL and the current time)
        #[arg(long)]
        task_id: Option<String>,

        /// Website id echoed in the report
        #[arg(long)]
        website_id: Option<String>,

        /// Recognize text of icon-only buttons
        #[arg(long)]
        enable_svg_ocr: bool,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Score previously saved page metrics offline
    Score {
        /// PageMetrics JSON file
        #[arg(long)]
        metrics: String,

        /// Visually detected button count
        #[arg(long)]
        detected: usize,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-accessibility.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub detector: CommandConfig,
    #[serde(default)]
    pub ocr: Option<CommandConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Emulated device. Sent to the browser as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceViewport {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_scale")]
    pub device_scale_factor: f64,
}

impl Default for DeviceViewport {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            device_scale_factor: default_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_node")]
    pub node_binary: String,

    #[serde(default = "default_server_script")]
    pub server_script: String,

    /// Pause after navigation before measuring.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default)]
    pub viewport: DeviceViewport,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL patterns the browser refuses to load.
    #[serde(default = "default_blocked_urls")]
    pub blocked_urls: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node_binary: default_node(),
            server_script: default_server_script(),
            settle_ms: default_settle_ms(),
            viewport: DeviceViewport::default(),
            user_agent: default_user_agent(),
            blocked_urls: default_blocked_urls(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub enable_svg_ocr: bool,

    /// Hover/focus every button to measure state feedback.
    #[serde(default = "default_true")]
    pub probe_feedback: bool,

    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enable_svg_ocr: false,
            probe_feedback: true,
            thresholds: Thresholds::default(),
        }
    }
}

/// An external command: `command args..`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["detector/detect.py".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            results_dir: default_results_dir(),
        }
    }
}

// Serde default helpers
fn default_width() -> u32 { 375 }
fn default_height() -> u32 { 812 }
fn default_scale() -> f64 { 3.0 }
fn default_node() -> String { "node".to_string() }
fn default_server_script() -> String { "node/browser_server.js".to_string() }
fn default_settle_ms() -> u64 { 2000 }
fn default_true() -> bool { true }
fn default_work_dir() -> String { "tmp/file".to_string() }
fn default_results_dir() -> String { "results".to_string() }

fn default_user_agent() -> String {
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 \
     (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1"
        .to_string()
}

fn default_blocked_urls() -> Vec<String> {
    [
        "*.png", "*.jpg", "*.jpeg", "*.webp", "*.gif",
        "*.mp4", "*.webm",
        "*.woff", "*.woff2", "*.ttf", "*.otf",
        "*google-analytics*", "*googletagmanager*", "*doubleclick*",
        "*adservice*", "*adsense*", "*ads/*", "*/ads/*",
        "*connect.facebook.net*", "*bat.bing.com*",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

pub fn build_crawl_settings(config: &AppConfig) -> CrawlSettings {
    CrawlSettings {
        thresholds: config.analysis.thresholds,
        settle_ms: config.browser.settle_ms,
        probe_feedback: config.analysis.probe_feedback,
    }
}

/// OCR is on when either the flag or the config asks for it.
pub fn resolve_svg_ocr(cli_flag: bool, config: &AppConfig) -> bool {
    cli_flag || config.analysis.enable_svg_ocr
}
