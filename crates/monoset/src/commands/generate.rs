//! Generate command - write specialized sources and the registration module
//!
//! Meant to be run from a build script or by hand before a build: the
//! resulting module is `include!`d by the crate that wants the specialized
//! containers built in.

use anyhow::{anyhow, Result};
use clap::Args;
use console::style;
use log::info;
use monoset_factory::Pipeline;
use monoset_specialize::{emit_registration_module, write};
use std::path::{Path, PathBuf};

use super::targets::{load_config, PathArgs, TargetArgs};
use crate::OutputFormat;

/// File name of the registration module under the generated root.
const REGISTRATION_FILE: &str = "registry.rs";

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Where to write the registration module
    /// (default: <generated root>/registry.rs)
    #[arg(long)]
    pub registration: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, config_path: Option<&Path>, format: OutputFormat, use_color: bool) -> Result<()> {
    let config = load_config(config_path, &args.paths)?;
    let targets = args.targets.targets()?;
    let pipeline = Pipeline::new(&config);

    let mut artifacts = Vec::new();
    for target in &targets {
        let generated = pipeline
            .generate(target.kind, &target.tokens)
            .map_err(|failure| anyhow!("{}: {} [{}]", target.describe(), failure, failure.error.code()))?;
        artifacts.extend(generated);
    }

    let registration = args
        .registration
        .unwrap_or_else(|| config.paths.generated_root.join(REGISTRATION_FILE));
    let module = emit_registration_module(&artifacts, &config.factory.base_module)?;
    write(&module, &registration)?;
    info!("registration module written to {}", registration.display());

    match format {
        OutputFormat::Text => {
            for artifact in &artifacts {
                let name = if use_color {
                    style(&artifact.class_name).green().to_string()
                } else {
                    artifact.class_name.clone()
                };
                println!("  {} -> {}", name, artifact.source_path.display());
            }
            println!("\nRegistration module: {}", registration.display());
            println!("Include it with: include!(\"{}\");", registration.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": true,
                "artifacts": artifacts,
                "registration": registration.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
