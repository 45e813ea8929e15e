//! Explain Configuration
//!
//! Defines configuration options for the explain tool.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Configuration for the explain tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How reports are printed.
    pub format: OutputFormat,

    /// List the competing signatures of ambiguous calls.
    pub show_candidates: bool,

    /// Exit with a failure status when any call fails to resolve.
    pub fail_on_unresolved: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_candidates: true,
            fail_on_unresolved: false,
        }
    }
}

/// Output format for call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per call.
    Text,
    /// A JSON array of reports.
    Json,
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
