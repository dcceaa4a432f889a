use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Prefix the kernel pseudo-files are read under. Unset means the
    /// live filesystem; agents in a container point this at the host
    /// tree bind-mounted inside.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub per_core: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: "table".to_string(),
            per_core: true,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vitals").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
