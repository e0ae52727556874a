//! Arguments shared by the commands that specialize containers.

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use monoset_factory::{SpecializerConfig, CONFIG_FILE};
use monoset_types::{derive_class_name, ContainerKind, TypeToken};
use std::path::{Path, PathBuf};

/// Containers to specialize. Each flag may be repeated.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// List element type (e.g. Integer, geometry::Point)
    #[arg(long = "list", value_name = "TYPE")]
    pub lists: Vec<String>,

    /// Hash map key and value types
    #[arg(long = "map", value_name = "KEY=VALUE")]
    pub maps: Vec<String>,

    /// Insertion-ordered map key and value types
    #[arg(long = "ordered-map", value_name = "KEY=VALUE")]
    pub ordered_maps: Vec<String>,

    /// Concurrent map key and value types
    #[arg(long = "concurrent-map", value_name = "KEY=VALUE")]
    pub concurrent_maps: Vec<String>,
}

/// Overrides for the `[paths]` section of the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Directory holding the generic container sources
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Root of the generated-source tree
    #[arg(long)]
    pub generated: Option<PathBuf>,

    /// Output directory for compiled units
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Library directory the runtime crate is resolved from
    #[arg(long)]
    pub overlay: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: ContainerKind,
    pub tokens: Vec<TypeToken>,
}

impl Target {
    pub fn class_name(&self) -> Result<String> {
        Ok(derive_class_name(self.kind, &self.tokens)?)
    }

    /// `hash_map<String, Integer>`
    pub fn describe(&self) -> String {
        let tokens: Vec<&str> = self.tokens.iter().map(|t| t.path()).collect();
        format!("{}<{}>", self.kind, tokens.join(", "))
    }
}

impl TargetArgs {
    pub fn targets(&self) -> Result<Vec<Target>> {
        let mut targets = Vec::new();
        for element in &self.lists {
            targets.push(Target {
                kind: ContainerKind::List,
                tokens: vec![TypeToken::new(element.as_str())?],
            });
        }
        for (kind, pairs) in [
            (ContainerKind::HashMap, &self.maps),
            (ContainerKind::OrderedHashMap, &self.ordered_maps),
            (ContainerKind::ConcurrentHashMap, &self.concurrent_maps),
        ] {
            for pair in pairs {
                let (key, value) = parse_pair(pair)?;
                targets.push(Target {
                    kind,
                    tokens: vec![key, value],
                });
            }
        }
        if targets.is_empty() {
            bail!("nothing to do: pass --list, --map, --ordered-map or --concurrent-map");
        }
        Ok(targets)
    }
}

fn parse_pair(pair: &str) -> Result<(TypeToken, TypeToken)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", pair))?;
    Ok((TypeToken::new(key)?, TypeToken::new(value)?))
}

/// Load the configuration and apply command-line path overrides.
pub fn load_config(path: Option<&Path>, overrides: &PathArgs) -> Result<SpecializerConfig> {
    let mut config = match path {
        Some(path) => SpecializerConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SpecializerConfig::load_or_default(CONFIG_FILE)?,
    };

    if let Some(corpus) = &overrides.corpus {
        config.paths.corpus_root = corpus.clone();
    }
    if let Some(generated) = &overrides.generated {
        config.paths.generated_root = generated.clone();
    }
    if let Some(out_dir) = &overrides.out_dir {
        config.paths.output_dir = out_dir.clone();
    }
    if let Some(overlay) = &overrides.overlay {
        config.paths.overlay_dir = overlay.clone();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_in_flag_order() {
        let args = TargetArgs {
            lists: vec!["Integer".to_string()],
            maps: vec!["String=Integer".to_string()],
            ordered_maps: vec![],
            concurrent_maps: vec!["Long=geometry::Point".to_string()],
        };
        let targets = args.targets().unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].class_name().unwrap(), "ArrayListInteger");
        assert_eq!(targets[1].class_name().unwrap(), "HashMapStringInteger");
        assert_eq!(targets[2].kind, ContainerKind::ConcurrentHashMap);
        assert_eq!(targets[2].describe(), "concurrent_hash_map<Long, geometry::Point>");
    }

    #[test]
    fn test_no_targets_is_an_error() {
        assert!(TargetArgs::default().targets().is_err());
    }

    #[test]
    fn test_malformed_pairs_are_rejected() {
        assert!(parse_pair("String").is_err());
        assert!(parse_pair("String=").is_err());
        assert!(parse_pair("java.lang.String=Integer").is_err());
    }

    #[test]
    fn test_path_overrides_apply() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("monoset.toml");
        std::fs::write(&file, "[paths]\ncorpus_root = \"from-file\"\n").unwrap();

        let overrides = PathArgs {
            out_dir: Some(PathBuf::from("elsewhere")),
            ..PathArgs::default()
        };
        let config = load_config(Some(&file), &overrides).unwrap();
        assert_eq!(config.paths.corpus_root, PathBuf::from("from-file"));
        assert_eq!(config.paths.output_dir, PathBuf::from("elsewhere"));
    }
}
