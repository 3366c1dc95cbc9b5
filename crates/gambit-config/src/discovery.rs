//! Finding and stacking the relay's config files.
//!
//! Two files feed a [`GambitConfig`], each overriding the one before:
//! the operator's `config.toml` in the user config directory, then a
//! `gambit.toml` next to where the relay is started. `gambit start` flags
//! are applied on top by the binary.

use std::path::{Path, PathBuf};

use crate::{ConfigError, GambitConfig, Result};

const PROJECT_CONFIG_FILE: &str = "gambit.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "gambit";

/// Overrides the user config directory. Tests point it at a temp dir.
const CONFIG_DIR_ENV: &str = "GAMBIT_CONFIG_DIR";

/// One config file the loader looked at.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// False when the file was absent or could not be parsed.
    pub loaded: bool,
}

impl ConfigSource {
    fn new(path: &Path, loaded: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            loaded,
        }
    }
}

/// Merged config plus what went into it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GambitConfig,
    /// User file first, project file second.
    pub sources: Vec<ConfigSource>,
    /// One line per file that existed but was rejected.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the files that contributed settings.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Stack the user and project files.
///
/// `project_dir` defaults to the working directory. A broken file never
/// stops the relay from starting; it is skipped and reported in
/// [`LoadedConfig::warnings`].
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Like [`load_config`], with the user config directory given explicitly.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let user_file = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_path(),
    };
    let project_file = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    let mut loaded = LoadedConfig {
        config: GambitConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };
    for path in user_file.iter().chain(std::iter::once(&project_file)) {
        let source = load_layer(&mut loaded.config, path, &mut loaded.warnings);
        loaded.sources.push(source);
    }

    Ok(loaded)
}

/// Read one file given with `--config`. Errors are returned, not warned.
pub fn load_config_file(path: &Path) -> Result<GambitConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    GambitConfig::from_toml(&contents)
}

/// `config.toml` inside [`xdg_config_dir`].
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Directory holding the user config and the relay's log files.
///
/// `GAMBIT_CONFIG_DIR` when set and non-empty, else `gambit` under the
/// platform config directory.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn load_layer(config: &mut GambitConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource::new(path, false);
    }

    match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            ConfigSource::new(path, true)
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource::new(path, false)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
