//! Explain command - explain error codes

use anyhow::{anyhow, Result};
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Error code to explain (e.g., M001, M004)
    pub code: String,
}

struct ErrorExplanation {
    code: &'static str,
    title: &'static str,
    description: &'static str,
    example: Option<&'static str>,
    suggestion: Option<&'static str>,
    related: &'static [&'static str],
}

const ERROR_EXPLANATIONS: &[ErrorExplanation] = &[
    ErrorExplanation {
        code: "M001",
        title: "Generic Source Not Found",
        description: "The corpus root has no generic source for the requested container kind, or the root itself does not exist.",
        example: Some("monoset specialize --map String=Integer --corpus ./missing"),
        suggestion: Some("Point paths.corpus_root (or --corpus) at a directory containing array_list.rs, hash_map.rs, linked_hash_map.rs and concurrent_hash_map.rs."),
        related: &["M003"],
    },
    ErrorExplanation {
        code: "M002",
        title: "Malformed Generic Source",
        description: r#"The generic source does not have the structure the specializer rewrites.

Every generic source declares its type with exactly the kind's parameters
(`ArrayList<E>`, `HashMap<K, V>`), and every generic argument list naming the
type repeats those parameters in order."#,
        example: Some("impl<K: Hash, V, S> HashMap<K, V> { ... }  // extra parameter S"),
        suggestion: Some("Keep the declaration and impl headers over the declared parameters only, or run `monoset diff` to see where the rewrite stops."),
        related: &["M001"],
    },
    ErrorExplanation {
        code: "M003",
        title: "I/O Failure",
        description: "Reading a generic source or writing a specialized source, compilation unit or registration module failed.",
        example: None,
        suggestion: Some("Check permissions and free space for paths.generated_root and paths.output_dir."),
        related: &["M001"],
    },
    ErrorExplanation {
        code: "M004",
        title: "Compilation Failed",
        description: r#"The toolchain exited unsuccessfully, timed out or could not be started.

The tail of the compiler's error output is included in the message. A specialized
factory recovers from this by handing out the generic container instead."#,
        example: Some("error[E0277]: the trait bound `Point: Hash` is not satisfied"),
        suggestion: Some(r#"Make sure:
1. the element and key types implement the traits the container needs
2. toolchain.program is on PATH (run `monoset doctor`)
3. paths.overlay_dir holds a built monoset-runtime"#),
        related: &["M003", "M007"],
    },
    ErrorExplanation {
        code: "M005",
        title: "Specialization Not Loadable",
        description: "No constructor with the requested shape is registered under the derived name, or the registered type does not match the requested element types.",
        example: Some("factory.new_map_with_capacity(...)  // HashMapStringInteger was not generated"),
        suggestion: Some("Run `monoset generate` for the target and include the registration module in the build."),
        related: &["M004"],
    },
    ErrorExplanation {
        code: "M006",
        title: "Invalid Type Token",
        description: "A type token must be a Rust type path: identifiers separated by `::`, without generic arguments.",
        example: Some("--list Vec<u8>"),
        suggestion: Some("Use a named type, e.g. define `type Bytes = Vec<u8>;` and pass `--list my_crate::Bytes`."),
        related: &[],
    },
    ErrorExplanation {
        code: "M007",
        title: "Configuration Error",
        description: "monoset.toml could not be read or parsed, or holds invalid values such as a zero cache capacity.",
        example: Some("[factory]\ncache_capacity = 0"),
        suggestion: Some("Run `monoset init --force` to write a fresh default configuration."),
        related: &[],
    },
];

pub fn run(args: ExplainArgs, format: OutputFormat, use_color: bool) -> Result<()> {
    let code = args.code.to_uppercase();

    let explanation = ERROR_EXPLANATIONS
        .iter()
        .find(|e| e.code == code)
        .ok_or_else(|| anyhow!("Unknown error code: {}", code))?;

    match format {
        OutputFormat::Text => {
            if use_color {
                println!(
                    "\n{}: {}\n{}",
                    console::style(&code).bold().cyan(),
                    console::style(explanation.title).bold(),
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            } else {
                println!(
                    "\n{}: {}\n{}",
                    code,
                    explanation.title,
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            }

            println!("\n{}\n", explanation.description);

            if let Some(example) = explanation.example {
                if use_color {
                    println!("{}:", console::style("Example").bold());
                } else {
                    println!("Example:");
                }
                for line in example.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if let Some(suggestion) = explanation.suggestion {
                if use_color {
                    println!("{}:", console::style("Suggestion").bold().green());
                } else {
                    println!("Suggestion:");
                }
                for line in suggestion.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if !explanation.related.is_empty() {
                if use_color {
                    println!(
                        "{}: {}",
                        console::style("Related").dim(),
                        explanation.related.join(", ")
                    );
                } else {
                    println!("Related: {}", explanation.related.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "code": explanation.code,
                "title": explanation.title,
                "description": explanation.description,
                "example": explanation.example,
                "suggestion": explanation.suggestion,
                "related": explanation.related,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoset_types::{ContainerKind, SpecializationError};

    #[test]
    fn test_every_error_code_is_explained() {
        let errors = [
            SpecializationError::NotFound {
                kind: ContainerKind::List,
                path: "array_list.rs".into(),
            },
            SpecializationError::malformed(ContainerKind::List, "x"),
            SpecializationError::io("x", std::io::Error::other("x")),
            SpecializationError::CompilationFailed {
                exit_code: Some(1),
                reason: "x".to_string(),
            },
            SpecializationError::ResolutionFailed {
                class_name: "x".to_string(),
                reason: "x".to_string(),
            },
            SpecializationError::InvalidToken {
                token: "x".to_string(),
                reason: "x".to_string(),
            },
            SpecializationError::Config("x".to_string()),
            SpecializationError::Recalled {
                code: "M004",
                message: "x".to_string(),
            },
        ];
        for error in &errors {
            assert!(
                ERROR_EXPLANATIONS.iter().any(|e| e.code == error.code()),
                "{} has no explanation",
                error.code()
            );
        }
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let args = ExplainArgs { code: "Z999".to_string() };
        assert!(run(args, OutputFormat::Json, false).is_err());
    }
}
