use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::template::FILE_TEMPLATE_TEX;

/// Folder and template names used when scaffolding a module.
///
/// Stored as JSON. Missing keys fall back to the defaults, so a config file
/// only needs to list what it changes:
///
/// ```
/// use texkit_project::ScaffoldConfig;
///
/// let config: ScaffoldConfig = serde_json::from_str(r#"{ "output_dir": "build" }"#).unwrap();
/// assert_eq!(config.output_dir, "build");
/// assert_eq!(config.source_dir, "src");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub source_dir: String,
    pub source_prefix: String,
    /// More source roots, each registered with an empty prefix.
    pub extra_source_dirs: Vec<String>,
    pub output_dir: String,
    pub auxiliary_dir: String,
    pub main_file: String,
    pub template: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            source_dir: "src".to_string(),
            source_prefix: String::new(),
            extra_source_dirs: Vec::new(),
            output_dir: "out".to_string(),
            auxiliary_dir: "auxil".to_string(),
            main_file: "main.tex".to_string(),
            template: FILE_TEMPLATE_TEX.to_string(),
        }
    }
}

impl ScaffoldConfig {
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
