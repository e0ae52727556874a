//! monoset - generic container specializer
//!
//! CLI driver for generating, compiling and inspecting type-specialized
//! container sources.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generic container specializer
#[derive(Parser, Debug)]
#[command(name = "monoset")]
#[command(author, version, about = "Generate type-specialized containers from generic sources")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (default: ./monoset.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Specialize, materialize and compile containers
    Specialize(commands::specialize::SpecializeArgs),

    /// Write specialized sources and a registration module, without compiling
    Generate(commands::generate::GenerateArgs),

    /// Show how a generic source changes when specialized
    Diff(commands::diff::DiffArgs),

    /// Write a default monoset.toml
    Init(commands::init::InitArgs),

    /// Check toolchain, corpus and directories
    Doctor(commands::doctor::DoctorArgs),

    /// Explain an error code
    Explain(commands::explain::ExplainArgs),
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli.verbose, cli.quiet)))
        .init();

    // Determine if colors should be used
    let use_color = !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stdout);

    let command = match cli.command {
        Some(command) => command,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            return Ok(());
        }
    };

    let config = cli.config.as_deref();
    match command {
        Commands::Specialize(args) => commands::specialize::run(args, config, cli.format, use_color),
        Commands::Generate(args) => commands::generate::run(args, config, cli.format, use_color),
        Commands::Diff(args) => commands::diff::run(args, config, cli.format, use_color),
        Commands::Init(args) => commands::init::run(args, cli.format),
        Commands::Doctor(args) => commands::doctor::run(args, config, cli.format, use_color),
        Commands::Explain(args) => commands::explain::run(args, cli.format, use_color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_maps_to_log_level() {
        assert_eq!(log_level(0, false), "warn");
        assert_eq!(log_level(2, false), "debug");
        assert_eq!(log_level(5, false), "trace");
        assert_eq!(log_level(3, true), "error");
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "monoset",
            "specialize",
            "--list",
            "Integer",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Specialize(_))));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
