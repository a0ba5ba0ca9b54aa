//! Workspace configuration loaded from `demokit.toml`.
//!
//! ```toml
//! [scan]
//! include = ["**/demos/**/*.ts", "**/demos/**/*.tsx"]
//! exclude = ["**/node_modules/**"]
//!
//! [factories.createTypes]
//! metadata_only = true
//!
//! [factories.createDemo]
//! allow_external_variants = true
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::factory::ParseOptions;

/// The workspace configuration file name.
pub const CONFIG_FILE_NAME: &str = "demokit.toml";

/// Errors from loading the workspace configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemokitConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    /// Per-factory parse modes, keyed by function name.
    #[serde(default)]
    pub factories: HashMap<String, FactoryConfig>,
}

/// File selection for workspace scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["**/*.ts".to_string(), "**/*.tsx".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

/// Parse-mode toggles for one factory function.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FactoryConfig {
    #[serde(default)]
    pub metadata_only: bool,
    #[serde(default)]
    pub allow_external_variants: bool,
    #[serde(default)]
    pub allow_multiple: bool,
}

impl DemokitConfig {
    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load `demokit.toml` from a workspace directory.
    pub fn load_workspace(workspace: &str) -> Result<Self, ConfigError> {
        Self::load(&Path::new(workspace).join(CONFIG_FILE_NAME))
    }

    /// Find and load `demokit.toml` by walking up from a directory toward
    /// the filesystem root. Returns the defaults when no config file exists
    /// on the way up.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Parse options for a factory function, falling back to defaults for
    /// unconfigured names.
    pub fn parse_options_for(&self, function_name: &str) -> ParseOptions {
        let factory = self
            .factories
            .get(function_name)
            .copied()
            .unwrap_or_default();
        ParseOptions {
            metadata_only: factory.metadata_only,
            allow_external_variants: factory.allow_external_variants,
            allow_multiple_factories: factory.allow_multiple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
[scan]
include = ["docs/**/*.tsx"]

[factories.createTypes]
metadata_only = true

[factories.createDemo]
allow_external_variants = true
"#;
        let config: DemokitConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.scan.include, vec!["docs/**/*.tsx"]);
        assert!(config.factories.contains_key("createTypes"));
        assert!(config.parse_options_for("createTypes").metadata_only);
        assert!(config.parse_options_for("createDemo").allow_external_variants);
        assert!(!config.parse_options_for("createUnknown").metadata_only);
    }

    #[test]
    fn test_defaults() {
        let config = DemokitConfig::default();
        assert_eq!(config.scan.include, vec!["**/*.ts", "**/*.tsx"]);
        assert_eq!(config.scan.exclude, vec!["**/node_modules/**"]);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DemokitConfig::load_workspace(dir.path().to_str().unwrap()).unwrap();
        assert!(config.factories.is_empty());
    }

    #[test]
    fn test_discover_walks_up_to_workspace_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[factories.createTypes]\nmetadata_only = true\n",
        )
        .unwrap();
        let nested = dir.path().join("docs").join("demos");
        std::fs::create_dir_all(&nested).unwrap();

        let config = DemokitConfig::discover(&nested).unwrap();
        assert!(config.parse_options_for("createTypes").metadata_only);
    }

    #[test]
    fn test_discover_without_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DemokitConfig::discover(dir.path()).unwrap();
        assert!(config.factories.is_empty());
        assert_eq!(config.scan.include, vec!["**/*.ts", "**/*.tsx"]);
    }

    #[test]
    fn test_load_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[factories.createHook]\nmetadata_only = true\n",
        )
        .unwrap();
        let config = DemokitConfig::load_workspace(dir.path().to_str().unwrap()).unwrap();
        assert!(config.parse_options_for("createHook").metadata_only);
    }
}
