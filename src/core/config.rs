//! Build configuration loaded from `specbuild.toml`.

use crate::core::error::SpecError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "specbuild.toml";

/// The `specbuild.toml` file structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Specification root scanned by the compiler
    pub root: PathBuf,
    /// Output directory; cleared and recreated on every build
    pub out: PathBuf,
    /// Relative path (under `root`) of the project metadata document
    pub project_doc: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("spec"),
            out: PathBuf::from("generated"),
            project_doc: "knowledge/project.toml".to_string(),
        }
    }
}

impl BuildConfig {
    /// Resolve relative `root`/`out` against `base`.
    pub fn resolved(mut self, base: &Path) -> Self {
        if self.root.is_relative() {
            self.root = base.join(&self.root);
        }
        if self.out.is_relative() {
            self.out = base.join(&self.out);
        }
        self
    }
}

/// Load `specbuild.toml` from `dir`, or from `explicit` when given.
/// No config file means defaults; an explicit path that does not exist is an error.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<BuildConfig, SpecError> {
    let config_path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(SpecError::ConfigError(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => dir.join(CONFIG_FILE),
    };

    if !config_path.exists() {
        return Ok(BuildConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(SpecError::IoError)?;
    let file: ConfigFile = toml::from_str(&content)
        .map_err(|e| SpecError::ConfigError(format!("{}: {}", config_path.display(), e)))?;
    Ok(file.build)
}
