//! `monoset.toml` configuration
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use monoset_specialize::DEFAULT_BASE_MODULE;
use monoset_types::{SpecializationError, SpecializationResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the configuration file.
pub const CONFIG_FILE: &str = "monoset.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecializerConfig {
    pub paths: PathsConfig,
    pub toolchain: ToolchainConfig,
    pub factory: FactorySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the generic container sources
    pub corpus_root: PathBuf,
    /// Root of the generated-source tree
    pub generated_root: PathBuf,
    /// Where compiled units are written
    pub output_dir: PathBuf,
    /// Library search path the compiler resolves the runtime crate from
    pub overlay_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("crates/monoset-runtime/src/containers"),
            generated_root: PathBuf::from("target/monoset/generated"),
            output_dir: PathBuf::from("target/monoset/out"),
            overlay_dir: PathBuf::from("target/debug/deps"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub program: String,
    /// Argument template. `{overlay}`, `{out_dir}`, `{unit}`, `{crate_name}`
    /// and `{sources}` are replaced per compilation.
    pub args: Vec<String>,
    /// Kill the compiler after this many seconds; unset waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: "rustc".to_string(),
            args: default_toolchain_args(),
            timeout_secs: None,
        }
    }
}

/// Type-check the unit as a library against the runtime crate.
pub fn default_toolchain_args() -> Vec<String> {
    [
        "--crate-type=lib",
        "--edition=2021",
        "--emit=metadata",
        "--crate-name",
        "{crate_name}",
        "-L",
        "{overlay}",
        "--extern",
        "monoset_runtime",
        "--out-dir",
        "{out_dir}",
        "{unit}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorySettings {
    /// When false the generic factory is used and nothing is specialized
    pub enabled: bool,
    pub cache_capacity: usize,
    /// Crate generated sources import the runtime through
    pub base_module: String,
}

impl Default for FactorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_capacity: 64,
            base_module: DEFAULT_BASE_MODULE.to_string(),
        }
    }
}

impl SpecializerConfig {
    /// Parse and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SpecializationResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| SpecializationError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> SpecializationResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SpecializationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> SpecializationResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> SpecializationResult<String> {
        toml::to_string_pretty(self).map_err(|e| SpecializationError::Config(e.to_string()))
    }

    pub fn validate(&self) -> SpecializationResult<()> {
        if self.toolchain.program.trim().is_empty() {
            return Err(SpecializationError::Config("toolchain.program is empty".to_string()));
        }
        if self.factory.cache_capacity == 0 {
            return Err(SpecializationError::Config(
                "factory.cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.factory.base_module.trim().is_empty() {
            return Err(SpecializationError::Config("factory.base_module is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SpecializerConfig::from_toml_str("").unwrap(), SpecializerConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [paths]
            corpus_root = "corpus"

            [toolchain]
            program = "sh"
            args = ["-c", "exit 0"]
            timeout_secs = 30

            [factory]
            cache_capacity = 8
        "#;

        let config = SpecializerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.paths.corpus_root, PathBuf::from("corpus"));
        assert_eq!(config.paths.output_dir, PathBuf::from("target/monoset/out"));
        assert_eq!(config.toolchain.program, "sh");
        assert_eq!(config.toolchain.timeout_secs, Some(30));
        assert_eq!(config.factory.cache_capacity, 8);
        assert!(config.factory.enabled);
        assert_eq!(config.factory.base_module, "monoset_runtime");
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = SpecializerConfig::from_toml_str("[factory]\ncache_capacity = 0").unwrap_err();
        assert_eq!(err.code(), "M007");

        let err = SpecializerConfig::from_toml_str("[toolchain]\nprogram = 3").unwrap_err();
        assert!(matches!(err, SpecializationError::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = SpecializerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SpecializerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SpecializerConfig::load_or_default(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, SpecializerConfig::default());
    }
}
