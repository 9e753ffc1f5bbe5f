use bloom::node::Mode;
use bloom::WidgetConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where one node starts on the board and what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NodeConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub amount: i64,
}

impl NodeConfig {
    pub fn new(x: f64, y: f64, amount: i64) -> Self {
        Self { x, y, amount }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    /// Directory holding `<icon>.png` files; the data dir's `icons` when unset.
    pub icon_dir: Option<PathBuf>,
    pub widget: WidgetConfig,
    pub nodes: Vec<NodeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            icon_dir: None,
            widget: WidgetConfig::node(),
            nodes: vec![
                NodeConfig::new(200.0, 200.0, 2),
                NodeConfig::new(420.0, 200.0, -1),
                NodeConfig::new(310.0, 380.0, 0),
            ],
        }
    }
}

impl Config {
    pub fn icon_dir(&self) -> PathBuf {
        self.icon_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("icons"))
                .unwrap_or_else(|| PathBuf::from("icons"))
        })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "bloom", "bloomboard")
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = project_dirs().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Reads `path` (missing is fine) layered under `BLOOM_*` variables,
/// e.g. `BLOOM_MODE=expandable` or `BLOOM_WIDGET__BLUR_BACKGROUND=true`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("BLOOM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads from `path`, or the platform config file, falling back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match get_config_path() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("{e}, using built-in defaults");
                return Config::default();
            }
        },
    };

    match load_config(&path) {
        Ok(c) => {
            log::debug!("loaded config from {}", path.display());
            c
        }
        Err(e) => {
            log::warn!("Failed to load {}: {e}, using defaults", path.display());
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
