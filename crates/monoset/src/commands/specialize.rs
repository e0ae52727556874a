//! Specialize command - run the full pipeline for each requested container

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use monoset_factory::Pipeline;
use std::path::Path;
use std::time::Duration;

use super::targets::{load_config, PathArgs, TargetArgs};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SpecializeArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Kill the compiler after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(template);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

pub fn run(args: SpecializeArgs, config_path: Option<&Path>, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut config = load_config(config_path, &args.paths)?;
    if args.timeout.is_some() {
        config.toolchain.timeout_secs = args.timeout;
    }
    let targets = args.targets.targets()?;
    let pipeline = Pipeline::new(&config);

    let mut results = Vec::new();
    let mut failures = 0;

    for target in &targets {
        let bar = if use_color && matches!(format, OutputFormat::Text) {
            Some(spinner(format!("specializing {}", target.describe())))
        } else {
            None
        };
        let outcome = pipeline.prepare(target.kind, &target.tokens);
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        match outcome {
            Ok(prepared) => {
                if let OutputFormat::Text = format {
                    let name = if use_color {
                        style(&prepared.class_name).green().bold().to_string()
                    } else {
                        prepared.class_name.clone()
                    };
                    println!(
                        "{} {} ({} source(s), {:.2}s)",
                        if use_color { "✓" } else { "[OK]" },
                        name,
                        prepared.artifacts.len(),
                        prepared.compile.duration.as_secs_f64()
                    );
                    for artifact in &prepared.artifacts {
                        println!("    {}", artifact.source_path.display());
                    }
                }
                results.push(serde_json::json!({
                    "target": target.describe(),
                    "class_name": prepared.class_name,
                    "success": true,
                    "sources": prepared.artifacts.iter().map(|a| a.source_path.display().to_string()).collect::<Vec<_>>(),
                    "unit": prepared.compile.unit_path.display().to_string(),
                    "duration_ms": prepared.compile.duration.as_millis() as u64,
                }));
            }
            Err(failure) => {
                failures += 1;
                if let OutputFormat::Text = format {
                    let label = if use_color {
                        style("error").red().bold().to_string()
                    } else {
                        "error".to_string()
                    };
                    eprintln!(
                        "{}[{}]: {}: {}",
                        label,
                        failure.error.code(),
                        target.describe(),
                        failure
                    );
                }
                results.push(serde_json::json!({
                    "target": target.describe(),
                    "success": false,
                    "stage": failure.stage,
                    "code": failure.error.code(),
                    "error": failure.error.to_string(),
                }));
            }
        }
    }

    if let OutputFormat::Json = format {
        let output = serde_json::json!({
            "success": failures == 0,
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if failures > 0 {
        bail!("{} of {} specialization(s) failed", failures, targets.len());
    }
    Ok(())
}
