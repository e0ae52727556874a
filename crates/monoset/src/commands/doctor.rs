//! Doctor command - check toolchain, corpus and directories

use anyhow::Result;
use clap::Args;
use console::{style, Emoji, StyledObject};
use monoset_factory::{SpecializerConfig, CONFIG_FILE};
use monoset_specialize::SourceLocator;
use monoset_types::ContainerKind;
use std::path::Path;
use std::process::Command;
use walkdir::WalkDir;

use super::targets::{load_config, PathArgs};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Only report checks that did not pass
    #[arg(long)]
    pub failures_only: bool,

    #[command(flatten)]
    pub paths: PathArgs,
}

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

struct CheckResult {
    name: String,
    status: CheckStatus,
    details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    /// Tag shown when colors are off.
    fn label(self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Warning => "WARN",
            CheckStatus::Error => "FAIL",
        }
    }

    /// Value of the `status` field in JSON output.
    fn key(self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warning => "warning",
            CheckStatus::Error => "error",
        }
    }

    fn emoji(self) -> Emoji<'static, 'static> {
        match self {
            CheckStatus::Ok => CHECK,
            CheckStatus::Warning => WARN,
            CheckStatus::Error => CROSS,
        }
    }

    fn paint<'a>(self, text: &'a str) -> StyledObject<&'a str> {
        match self {
            CheckStatus::Ok => style(text).green(),
            CheckStatus::Warning => style(text).yellow(),
            CheckStatus::Error => style(text).red(),
        }
    }
}

impl CheckResult {
    fn render(&self, use_color: bool) -> String {
        let details = self.details.as_deref();
        if use_color {
            format!(
                "  {}{}: {}",
                self.status.emoji(),
                self.name,
                self.status.paint(details.unwrap_or(self.status.label()))
            )
        } else {
            format!("  [{}] {}: {}", self.status.label(), self.name, details.unwrap_or(""))
        }
    }
}

fn check_version() -> CheckResult {
    CheckResult {
        name: "monoset version".to_string(),
        status: CheckStatus::Ok,
        details: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn check_toolchain(config: &SpecializerConfig) -> CheckResult {
    let program = &config.toolchain.program;
    let name = format!("toolchain ({})", program);
    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("unknown");
            CheckResult {
                name,
                status: CheckStatus::Ok,
                details: Some(first_line.to_string()),
            }
        }
        Ok(_) => CheckResult {
            name,
            status: CheckStatus::Warning,
            details: Some(format!("{} --version failed", program)),
        },
        Err(e) => CheckResult {
            name,
            status: CheckStatus::Error,
            details: Some(format!("{} not found: {} (specializations will fall back)", program, e)),
        },
    }
}

fn check_corpus(root: &Path) -> CheckResult {
    let name = "generic sources".to_string();
    if !root.is_dir() {
        return CheckResult {
            name,
            status: CheckStatus::Error,
            details: Some(format!("{} is not a directory", root.display())),
        };
    }

    let available = SourceLocator::new(root).available();
    let missing: Vec<&str> = ContainerKind::ALL
        .iter()
        .filter(|kind| !available.contains(kind))
        .map(|kind| kind.corpus_file())
        .collect();
    if missing.is_empty() {
        CheckResult {
            name,
            status: CheckStatus::Ok,
            details: Some(format!("{} kind(s) in {}", available.len(), root.display())),
        }
    } else {
        CheckResult {
            name,
            status: CheckStatus::Error,
            details: Some(format!("missing {} in {}", missing.join(", "), root.display())),
        }
    }
}

fn check_generated(root: &Path) -> CheckResult {
    let name = "generated sources".to_string();
    if !root.exists() {
        return CheckResult {
            name,
            status: CheckStatus::Ok,
            details: Some(format!("{} (created on first use)", root.display())),
        };
    }
    let count = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.path().extension().map(|x| x == "rs").unwrap_or(false))
        .count();
    CheckResult {
        name,
        status: CheckStatus::Ok,
        details: Some(format!("{} file(s) in {}", count, root.display())),
    }
}

fn check_overlay(dir: &Path) -> CheckResult {
    let name = "runtime library".to_string();
    let found = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| {
            let file = e.file_name().to_string_lossy();
            file.starts_with("libmonoset_runtime") && (file.ends_with(".rlib") || file.ends_with(".rmeta"))
        });
    if found {
        CheckResult {
            name,
            status: CheckStatus::Ok,
            details: Some(dir.display().to_string()),
        }
    } else {
        CheckResult {
            name,
            status: CheckStatus::Warning,
            details: Some(format!(
                "not found in {} - run: cargo build -p monoset-runtime",
                dir.display()
            )),
        }
    }
}

fn check_project_config(config_path: Option<&Path>) -> CheckResult {
    let path = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE));
    let name = format!("project config ({})", path.display());
    if path.exists() {
        CheckResult {
            name,
            status: CheckStatus::Ok,
            details: Some("found".to_string()),
        }
    } else {
        CheckResult {
            name,
            status: CheckStatus::Warning,
            details: Some("not found, using defaults - run: monoset init".to_string()),
        }
    }
}

pub fn run(args: DoctorArgs, config_path: Option<&Path>, format: OutputFormat, use_color: bool) -> Result<()> {
    let config = load_config(config_path, &args.paths)?;
    let checks = vec![
        check_version(),
        check_project_config(config_path),
        check_toolchain(&config),
        check_corpus(&config.paths.corpus_root),
        check_generated(&config.paths.generated_root),
        check_overlay(&config.paths.overlay_dir),
    ];

    let has_errors = checks.iter().any(|c| c.status == CheckStatus::Error);
    let has_warnings = checks.iter().any(|c| c.status == CheckStatus::Warning);

    match format {
        OutputFormat::Text => {
            if !args.failures_only {
                println!("monoset doctor\n");
                println!("Environment Checks");
                println!("──────────────────");
            }

            for check in checks
                .iter()
                .filter(|c| !args.failures_only || c.status != CheckStatus::Ok)
            {
                println!("{}", check.render(use_color));
            }

            if !args.failures_only {
                let failed = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
                println!();
                if has_errors {
                    println!("{} check(s) failed; specializations will fall back to generic containers.", failed);
                } else if has_warnings {
                    println!("Ready, with warnings.");
                } else {
                    println!("Ready to specialize.");
                }
            }
        }
        OutputFormat::Json => {
            let results: Vec<_> = checks
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "name": c.name,
                        "status": c.status.key(),
                        "details": c.details,
                    })
                })
                .collect();

            let output = serde_json::json!({
                "success": !has_errors,
                "checks": results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
