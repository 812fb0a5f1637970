use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::layout::LayoutOptions;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Where cache files are written (defaults to `{{vault_root}}/.notegraph`).
    pub cache_dir: Option<String>,
    /// Folders to exclude from the graph (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Layout spacing and node sizes used by the `layout` command.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub padding: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { spacing_x: 40.0, spacing_y: 40.0, padding: 0.0, min_width: 120.0, min_height: 60.0 }
    }
}

impl LayoutConfig {
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            spacing_x: self.spacing_x,
            spacing_y: self.spacing_y,
            padding: self.padding,
            min_width: self.min_width,
            min_height: self.min_height,
            ..LayoutOptions::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    pub cache_dir: PathBuf,
    /// Folders to exclude from the graph (relative to vault_root).
    pub excluded_folders: Vec<PathBuf>,
    pub logging: LoggingConfig,
    pub layout: LayoutConfig,
}
