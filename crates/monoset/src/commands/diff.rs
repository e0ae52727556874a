//! Diff command - show the generic source next to its specialization

use anyhow::Result;
use clap::Args;
use console::style;
use monoset_specialize::{SourceLocator, Specializer};
use similar::{ChangeTag, TextDiff};
use std::path::Path;

use super::targets::{load_config, PathArgs, TargetArgs};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Lines of context around each change
    #[arg(long, default_value_t = 3)]
    pub context: usize,

    /// Also show the dependencies that are specialized along with the target
    #[arg(long)]
    pub all: bool,
}

/// Unified diff between `generic` and `specialized`.
pub fn unified(generic: &str, specialized: &str, context: usize, from: &str, to: &str) -> String {
    TextDiff::from_lines(generic, specialized)
        .unified_diff()
        .context_radius(context)
        .header(from, to)
        .to_string()
}

fn print_colored(generic: &str, specialized: &str, context: usize) {
    let diff = TextDiff::from_lines(generic, specialized);
    for (i, group) in diff.grouped_ops(context).iter().enumerate() {
        if i > 0 {
            println!("{}", style("...").dim());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let line = change.to_string_lossy();
                let line = line.trim_end_matches('\n');
                match change.tag() {
                    ChangeTag::Delete => println!("{}", style(format!("-{}", line)).red()),
                    ChangeTag::Insert => println!("{}", style(format!("+{}", line)).green()),
                    ChangeTag::Equal => println!(" {}", line),
                }
            }
        }
    }
}

pub fn run(args: DiffArgs, config_path: Option<&Path>, format: OutputFormat, use_color: bool) -> Result<()> {
    let config = load_config(config_path, &args.paths)?;
    let locator = SourceLocator::new(&config.paths.corpus_root);
    let specializer = Specializer::new(&config.factory.base_module);

    let mut diffs = Vec::new();
    for target in args.targets.targets()? {
        let unit = specializer.specialize_unit(&locator, target.kind, &target.tokens)?;
        let shown = if args.all { &unit[..] } else { &unit[unit.len() - 1..] };

        for specialized in shown {
            let generic = locator.load(specialized.kind)?;
            let from = generic.path.display().to_string();
            let to = format!("{}.rs", specialized.class_name);

            match format {
                OutputFormat::Text if use_color => {
                    println!(
                        "{} {} {}",
                        style(&from).bold(),
                        style("->").dim(),
                        style(&to).bold().green()
                    );
                    print_colored(&generic.text, &specialized.text, args.context);
                    println!();
                }
                OutputFormat::Text => {
                    print!("{}", unified(&generic.text, &specialized.text, args.context, &from, &to));
                }
                OutputFormat::Json => diffs.push(serde_json::json!({
                    "kind": specialized.kind,
                    "class_name": specialized.class_name,
                    "generic": from,
                    "diff": unified(&generic.text, &specialized.text, args.context, &from, &to),
                })),
            }
        }
    }

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&diffs)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_marks_renamed_lines() {
        let generic = "pub struct ArrayList<E> {\n    elements: Vec<E>,\n}\n";
        let specialized = "pub struct ArrayListInteger {\n    elements: Vec<Integer>,\n}\n";
        let diff = unified(generic, specialized, 1, "array_list.rs", "ArrayListInteger.rs");

        assert!(diff.starts_with("--- array_list.rs\n+++ ArrayListInteger.rs\n"));
        assert!(diff.contains("-pub struct ArrayList<E> {"));
        assert!(diff.contains("+    elements: Vec<Integer>,"));
        assert!(diff.contains(" }"));
    }

    #[test]
    fn test_identical_sources_have_empty_diff() {
        assert_eq!(unified("a\n", "a\n", 3, "x", "y"), "");
    }
}
