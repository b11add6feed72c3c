use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::page::element_model::ElementDecl;
use crate::registry::binding::BindingDecl;
use crate::transport::http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "webgate-sync",
    version,
    about = "Keep page controls in sync with variables on a webgate server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Server JSON endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Path to config file (default: webgate-sync.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror the configured page and apply user actions from stdin
    Sync {
        /// Polling interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Run a single read cycle, print the page and exit
        #[arg(long, default_value_t = false)]
        once: bool,

        /// JSON-lines trace file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Read one or more variables
    Get {
        /// Variable names
        #[arg(required = true)]
        variables: Vec<String>,
    },

    /// Write a variable
    Set {
        /// Variable name
        variable: String,

        /// New value
        value: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `webgate-sync.yaml`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub trace_file: Option<String>,

    #[serde(default)]
    pub elements: Vec<ElementDecl>,

    #[serde(default)]
    pub bindings: Vec<BindingDecl>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            poll_interval_ms: default_interval(),
            timeout_ms: default_timeout(),
            trace_file: None,
            elements: vec![],
            bindings: vec![],
        }
    }
}

// Serde default helpers
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_interval() -> u64 { 1000 }
fn default_timeout() -> u64 { DEFAULT_TIMEOUT_MS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("webgate-sync.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> AppConfig {
    serde_yaml::from_str(content).unwrap_or_default()
}

// ============================================================================
// Settings (merge CLI args with config file)
// ============================================================================

/// Connection settings after CLI flags override the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
}

pub fn resolve_connection(cli: &Cli, config: &AppConfig) -> ConnectionSettings {
    ConnectionSettings {
        endpoint: cli
            .endpoint
            .clone()
            .unwrap_or_else(|| config.endpoint.clone()),
        timeout_ms: cli.timeout_ms.unwrap_or(config.timeout_ms),
    }
}
