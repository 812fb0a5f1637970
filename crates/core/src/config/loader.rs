use std::path::{Path, PathBuf};
use std::{env, fs};

use thiserror::Error;
use tracing::debug;

use crate::config::types::{ConfigFile, LayoutConfig, LoggingConfig, Profile, ResolvedConfig};

const SUPPORTED_VERSION: u32 = 1;
const VAULT_ROOT_VAR: &str = "{{vault_root}}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,

    #[error("[layout] {0} must be a non-negative number")]
    InvalidLayout(&'static str),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Read the config file (default location unless `config_path` is given) and resolve
    /// the active profile: `profile_override`, else the file's `profile`, else `default`.
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = config_path.map_or_else(default_config_path, Path::to_path_buf);
        let file = read_config_file(&path)?;

        let active = profile_override
            .or(file.profile.as_deref())
            .unwrap_or("default")
            .to_string();
        let profile =
            file.profiles.get(&active).ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        debug!("Using profile '{}' from {}", active, path.display());
        resolve(active, profile, &file.logging, file.layout)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(ConfigError::NotFound(display));
    }

    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError(display.clone(), e))?;
    let file: ConfigFile =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError(display, e))?;

    if file.version != SUPPORTED_VERSION {
        return Err(ConfigError::BadVersion(file.version));
    }
    if file.profiles.is_empty() {
        return Err(ConfigError::NoProfiles);
    }
    validate_layout(&file.layout)?;
    Ok(file)
}

fn validate_layout(layout: &LayoutConfig) -> Result<(), ConfigError> {
    let fields = [
        ("spacing_x", layout.spacing_x),
        ("spacing_y", layout.spacing_y),
        ("padding", layout.padding),
        ("min_width", layout.min_width),
        ("min_height", layout.min_height),
    ];
    match fields.iter().find(|(_, value)| !(value.is_finite() && *value >= 0.0)) {
        Some((name, _)) => Err(ConfigError::InvalidLayout(*name)),
        None => Ok(()),
    }
}

fn resolve(
    active_profile: String,
    profile: &Profile,
    logging: &LoggingConfig,
    layout: LayoutConfig,
) -> Result<ResolvedConfig, ConfigError> {
    let vault_root = expand_path(&profile.vault_root)?;
    let root_text = vault_root.to_string_lossy().into_owned();
    let expand_in_vault = |raw: &str| expand_path(&raw.replace(VAULT_ROOT_VAR, &root_text));

    let cache_dir = match profile.cache_dir.as_deref() {
        Some(dir) => expand_in_vault(dir)?,
        None => vault_root.join(".notegraph"),
    };

    let file = match &logging.file {
        Some(file) => Some(expand_in_vault(&file.to_string_lossy())?),
        None => None,
    };

    Ok(ResolvedConfig {
        active_profile,
        cache_dir,
        excluded_folders: profile.excluded_folders.iter().map(PathBuf::from).collect(),
        logging: LoggingConfig { file, ..logging.clone() },
        layout,
        vault_root,
    })
}

/// `$XDG_CONFIG_HOME/notegraph/config.toml`, else `~/.config/notegraph/config.toml`.
pub fn default_config_path() -> PathBuf {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("notegraph").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = shellexpand::full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.into_owned()))
}
