//! Init command - write a default monoset.toml

use anyhow::Result;
use clap::Args;
use monoset_factory::{SpecializerConfig, CONFIG_FILE};
use std::fs;
use std::path::PathBuf;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

const CONFIG_HEADER: &str = "# monoset configuration\n\
# Paths are relative to the directory monoset runs in.\n\n";

/// Default configuration file contents.
pub fn default_config_text() -> Result<String> {
    let body = SpecializerConfig::default().to_toml_string()?;
    Ok(format!("{}{}", CONFIG_HEADER, body))
}

pub fn run(args: InitArgs, format: OutputFormat) -> Result<()> {
    fs::create_dir_all(&args.path)?;
    let config_path = args.path.join(CONFIG_FILE);

    let written = if config_path.exists() && !args.force {
        false
    } else {
        fs::write(&config_path, default_config_text()?)?;
        true
    };

    match format {
        OutputFormat::Text => {
            if written {
                println!("  Created {}", config_path.display());
            } else {
                println!("  Skipped {} (already exists, use --force to overwrite)", config_path.display());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": true,
                "path": config_path.display().to_string(),
                "written": written,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_back() {
        let text = default_config_text().unwrap();
        assert!(text.starts_with("# monoset configuration"));
        assert_eq!(SpecializerConfig::from_toml_str(&text).unwrap(), SpecializerConfig::default());
    }

    #[test]
    fn test_existing_config_is_kept() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[factory]\nenabled = false\n").unwrap();

        run(
            InitArgs {
                path: dir.path().to_path_buf(),
                force: false,
            },
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[factory]\nenabled = false\n");
    }
}
