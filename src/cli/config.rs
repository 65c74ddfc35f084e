use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::dom::builder::AttributeOrder;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "dom-history",
    version,
    about = "Index DOM snapshots and re-identify acted-upon elements across them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sort attributes by name when building trees
    #[arg(long, global = true)]
    pub sort_attributes: bool,

    /// Path to config file (default: dom-history.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the line-oriented view of a snapshot
    Serialize {
        /// JSON driver dump
        #[arg(long)]
        dump: String,

        /// Attributes to render, comma separated
        #[arg(long, value_delimiter = ',')]
        include_attributes: Option<Vec<String>>,
    },

    /// Print every element with its flags and index
    Inspect {
        /// JSON driver dump
        #[arg(long)]
        dump: String,
    },

    /// Capture the element at an index as a history element
    Capture {
        /// JSON driver dump
        #[arg(long)]
        dump: String,

        /// Interaction index of the element acted on
        #[arg(long)]
        index: u32,

        /// Page URL stored in the step record
        #[arg(long, default_value = "")]
        url: String,

        /// Page title stored in the step record
        #[arg(long, default_value = "")]
        title: String,

        /// History log to append to
        #[arg(long)]
        log: Option<String>,
    },

    /// Find a captured element in a new snapshot
    Locate {
        /// JSON driver dump of the new snapshot
        #[arg(long)]
        dump: String,

        /// JSON file holding a history element
        #[arg(long)]
        element: String,
    },

    /// Re-locate every element in the history log against a new snapshot
    Replay {
        /// JSON driver dump of the new snapshot
        #[arg(long)]
        dump: String,

        /// History log to read
        #[arg(long)]
        log: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `dom-history.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub serialize: SerializeConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializeConfig {
    #[serde(default = "default_include_attributes")]
    pub include_attributes: Vec<String>,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            include_attributes: default_include_attributes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub sort_attributes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

// Serde default helpers
fn default_include_attributes() -> Vec<String> {
    [
        "title",
        "type",
        "name",
        "role",
        "tabindex",
        "aria-label",
        "placeholder",
        "value",
        "alt",
        "aria-expanded",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_log_path() -> String { "dom-history.jsonl".to_string() }
fn default_level() -> String { "info".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Falls back to defaults if the file is missing
/// or malformed; a malformed file also yields a diagnostic for the caller to
/// report once logging is up.
pub fn load_config(path: Option<&str>) -> (AppConfig, Option<String>) {
    let config_path = path.unwrap_or("dom-history.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => (config, None),
            Err(e) => (
                AppConfig::default(),
                Some(format!("malformed config {}: {}, using defaults", config_path, e)),
            ),
        },
        Err(_) => (AppConfig::default(), None),
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

// ============================================================================
// Resolution (CLI > config file > defaults)
// ============================================================================

pub fn attribute_order(cli_sort: bool, config: &AppConfig) -> AttributeOrder {
    if cli_sort || config.tree.sort_attributes {
        AttributeOrder::Sorted
    } else {
        AttributeOrder::AsReceived
    }
}

pub fn log_level(verbose: u8, config: &AppConfig) -> String {
    match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
