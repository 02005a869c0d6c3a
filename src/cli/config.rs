use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::SessionConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "quick-apply",
    version,
    about = "Unattended quick-apply session driver"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Ollama API endpoint (http oracle backend)
    #[arg(long, global = true)]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true)]
    pub ollama_model: Option<String>,

    /// Path to config file (default: quick-apply.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the listing and apply to every eligible item
    Apply {
        /// Display-text marker an item must carry to be eligible
        #[arg(long)]
        marker: Option<String>,

        /// Stop after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// CSV file submissions are appended to
        #[arg(short, long)]
        out: Option<String>,

        /// Oracle backend: process, http or scripted
        #[arg(long, default_value = "process")]
        oracle: String,

        /// Node driver script that owns the browser
        #[arg(long)]
        driver: Option<String>,
    },

    /// Enumerate currently rendered items and report eligibility
    Scan {
        /// Display-text marker an item must carry to be eligible
        #[arg(long)]
        marker: Option<String>,

        /// Node driver script that owns the browser
        #[arg(long)]
        driver: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `quick-apply.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionFileConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFileConfig {
    #[serde(default = "default_marker")]
    pub marker: String,

    pub max_pages: Option<u32>,

    #[serde(default = "default_records")]
    pub records: String,

    #[serde(default = "default_trace")]
    pub trace: Option<String>,

    #[serde(default = "default_scale")]
    pub pace_scale: f64,

    #[serde(default = "default_driver")]
    pub driver: String,
}

impl Default for SessionFileConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            max_pages: None,
            records: default_records(),
            trace: default_trace(),
            pace_scale: default_scale(),
            driver: default_driver(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OllamaConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

// Serde default helpers
fn default_marker() -> String {
    "Easy Apply".to_string()
}
fn default_records() -> String {
    "applied_jobs.csv".to_string()
}
fn default_trace() -> Option<String> {
    Some("apply_trace.jsonl".to_string())
}
fn default_scale() -> f64 {
    1.0
}
fn default_driver() -> String {
    "node/session_driver.js".to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("quick-apply.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build a SessionConfig from the config file with CLI overrides applied.
pub fn build_session_config(
    file: &SessionFileConfig,
    marker: Option<&str>,
    max_pages: Option<u32>,
    out: Option<&str>,
) -> SessionConfig {
    SessionConfig {
        marker: marker.unwrap_or(&file.marker).to_string(),
        max_pages: max_pages.or(file.max_pages),
        records_path: out.unwrap_or(&file.records).to_string(),
        trace_path: file.trace.clone(),
        pace_scale: file.pace_scale,
    }
}
