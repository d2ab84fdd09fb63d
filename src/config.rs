//! Runtime configuration: where the catalog is read from, where artifacts go, and
//! which romanization overrides apply.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{error::ConfigError, romanize::RomanizationOverrides};

/// Directory the tool writes into when no override is set.
const DEFAULT_DATA_DIR: &str = "data";
/// Catalog document location relative to the data directory.
const DEFAULT_INPUT: &str = "../index.html";
/// Environment variable that overrides [`DEFAULT_DATA_DIR`].
const DATA_DIR_ENV: &str = "CHT_COLORS_DATA_DIR";
/// Environment variable naming the catalog document explicitly.
const INPUT_ENV: &str = "CHT_COLORS_INPUT";
/// Environment variable naming a JSON override table replacing the built-in one.
const OVERRIDES_PATH_ENV: &str = "CHT_COLORS_OVERRIDES_PATH";

#[derive(Debug, Clone)]
/// Immutable configuration for one extraction run.
pub struct ToolConfig {
    /// Catalog HTML document.
    pub input: PathBuf,
    /// Directory receiving the generated artifacts.
    pub out_dir: PathBuf,
    /// Curated romanization overrides.
    pub overrides: RomanizationOverrides,
}

impl ToolConfig {
    /// Load the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let out_dir = env_path(DATA_DIR_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let input = env_path(INPUT_ENV).unwrap_or_else(|| out_dir.join(DEFAULT_INPUT));
        let overrides = match env_path(OVERRIDES_PATH_ENV) {
            Some(path) => load_overrides(&path)?,
            None => RomanizationOverrides::default(),
        };
        Ok(Self {
            input,
            out_dir,
            overrides,
        })
    }

    /// Configuration rooted at `data_dir` with the built-in overrides.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let out_dir = data_dir.into();
        Self {
            input: out_dir.join(DEFAULT_INPUT),
            out_dir,
            overrides: RomanizationOverrides::default(),
        }
    }
}

/// Read an override table from `path`.
///
/// A missing file falls back to the built-in table. An unreadable or invalid
/// file is an error: silently using other keys would change the artifacts.
pub fn load_overrides(path: &Path) -> Result<RomanizationOverrides, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let overrides: RomanizationOverrides =
                serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!(
                path = %path.display(),
                count = overrides.len(),
                "loaded romanization overrides"
            );
            Ok(overrides)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                path = %path.display(),
                "override table not found; using built-in table"
            );
            Ok(RomanizationOverrides::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}
