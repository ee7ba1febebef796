//! Viewer configuration.
//!
//! Deserialized from `elfview.toml`: either the file named by `--config`, or
//! one in the current directory if present. Missing keys take their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose::vprintln;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = "elfview.toml";

/// A header group that can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// The ELF file header.
    Header,
    /// The program header table.
    Program,
    /// The section header table.
    Section,
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Views printed when no selection flag is given.
    pub default_views: Vec<View>,
    /// Drop leading zeros from hex fields.
    pub strip_leading_zeros: bool,
    /// Print the flag legend under each table.
    pub show_legend: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_views: vec![View::Header, View::Program, View::Section],
            strip_leading_zeros: true,
            show_legend: true,
        }
    }
}

/// Parse a configuration from TOML text.
pub fn parse(text: &str) -> Result<ViewConfig> {
    toml::from_str(text).context("invalid configuration")
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, `elfview.toml` in the current
/// directory is used if present, otherwise the defaults.
pub fn load(explicit: Option<&Path>) -> Result<ViewConfig> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(CONFIG_FILE).is_file() => Path::new(CONFIG_FILE),
        None => {
            vprintln!("no {CONFIG_FILE} found, using defaults");
            return Ok(ViewConfig::default());
        }
    };

    vprintln!("loading config from {}", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&text).with_context(|| format!("in {}", path.display()))
}
