//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File names searched, in order, when no explicit path is given
const CANDIDATES: [&str; 3] = [".fuelscope.toml", "fuelscope.toml", ".config/fuelscope.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults.
    ///
    /// An explicit path must exist. Without one, the first candidate file in
    /// the working directory is used, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Path::new("."))
    }

    /// Like [`load`](Self::load), searching candidates under `dir`.
    pub fn load_from(path: Option<&Path>, dir: &Path) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(dir),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|candidate| candidate.exists())
}

/// Load, parse and validate a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::from(e).with_path(path))?;
    let schema: ConfigSchema = toml::from_str(&content).map_err(|e| Error::from(e).with_path(path))?;
    schema.validate().map_err(|e| e.with_path(path))?;
    Ok(schema)
}
