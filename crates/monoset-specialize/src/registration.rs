//! Build-time registration of specialized containers.
//!
//! Generated sources cannot be linked into a running program, so they are
//! wired in at build time instead: a consumer's `build.rs` specializes and
//! materializes the variants it wants, writes the module produced here to
//! `OUT_DIR`, and the crate `include!`s it and calls `register` on the
//! registry it hands to its factory.

use monoset_types::{ContainerKind, GeneratedArtifact, SpecializationError, SpecializationResult};
use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Module name for a derived class name (`ArrayListInteger` -> `array_list_integer`).
pub fn module_name(class_name: &str) -> String {
    let mut name = String::with_capacity(class_name.len() + 4);
    for (i, c) in class_name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !name.ends_with('_') {
                name.push('_');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// A private module that includes one generated source and re-exports its
/// items. Each source gets its own module so their imports do not clash.
pub fn include_item(module: &str, path: &Path) -> String {
    format!(
        "#[allow(unused_imports, dead_code)]\nmod {} {{\n    use super::*;\n    include!({:?});\n}}\npub use {}::*;\n",
        module,
        path.display().to_string(),
        module
    )
}

/// `path` resolved against the current directory. `include!` reads relative
/// paths from the directory of the including file, which is never the one
/// the generated tree was written from.
pub fn absolute_path(path: &Path) -> SpecializationResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| SpecializationError::io(path, e))?;
    Ok(cwd.join(path))
}

/// Render the registration module for `artifacts`.
///
/// Artifacts are included in the given order (dependencies must precede the
/// types built on them); a class name seen twice is emitted once.
pub fn emit_registration_module(artifacts: &[GeneratedArtifact], base_module: &str) -> SpecializationResult<String> {
    let mut seen = HashSet::new();
    let unique: Vec<&GeneratedArtifact> = artifacts
        .iter()
        .filter(|a| seen.insert(a.class_name.as_str()))
        .collect();

    let mut out = String::new();
    out.push_str("// @generated by monoset. Do not edit.\n");
    let _ = writeln!(out, "#[allow(unused_imports)]\nuse {}::wrappers::*;\n", base_module);

    for artifact in &unique {
        let path = absolute_path(&artifact.source_path)?;
        out.push_str(&include_item(&module_name(&artifact.class_name), &path));
        out.push('\n');
    }

    let _ = writeln!(out, "/// Register every specialized container built into this crate.");
    let _ = writeln!(out, "pub fn register(registry: &mut {}::Registry) {{", base_module);
    for artifact in &unique {
        out.push_str(&register_call(artifact, base_module));
    }
    out.push_str("}\n");
    Ok(out)
}

fn register_call(artifact: &GeneratedArtifact, base: &str) -> String {
    let name = &artifact.class_name;
    let types = artifact
        .tokens
        .iter()
        .map(|t| t.path())
        .collect::<Vec<_>>()
        .join(", ");

    match artifact.kind {
        ContainerKind::List => format!(
            "    registry.register_list::<{types}>(\n        \"{name}\",\n        {base}::ListConstructors::new()\n            .empty(|| Box::new({name}::new()))\n            .sized(|capacity| Box::new({name}::with_capacity(capacity)))\n            .from_collection(|elements| Box::new({name}::from_vec(elements))),\n    );\n"
        ),
        kind => {
            let mut ctors = format!(
                "{base}::MapConstructors::new()\n            .empty(|| Box::new({name}::new()))\n            .sized(|capacity| Box::new({name}::with_capacity(capacity)))\n            .with_load_factor(|capacity, load_factor| Box::new({name}::with_capacity_and_load_factor(capacity, load_factor)))"
            );
            if kind == ContainerKind::ConcurrentHashMap {
                let _ = write!(
                    ctors,
                    "\n            .with_concurrency_level(|capacity, load_factor, level| Box::new({name}::with_concurrency_level(capacity, load_factor, level)))"
                );
            }
            let _ = write!(ctors, "\n            .from_map(|entries| Box::new({name}::from_entries(entries)))");
            format!(
                "    registry.register_map::<{types}>(\n        {base}::ContainerKind::{kind:?},\n        \"{name}\",\n        {ctors},\n    );\n"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoset_types::TypeToken;
    use std::path::PathBuf;

    fn artifact(kind: ContainerKind, class_name: &str, tokens: &[&str]) -> GeneratedArtifact {
        GeneratedArtifact {
            class_name: class_name.to_string(),
            source_path: PathBuf::from(format!("/gen/{}/{}.rs", kind.slug(), class_name)),
            kind,
            tokens: tokens.iter().map(|t| TypeToken::new(*t).unwrap()).collect(),
        }
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("ArrayListInteger"), "array_list_integer");
        assert_eq!(
            module_name("ArrayListPoint_0a1b2c3d4e5f6a7b"),
            "array_list_point_0a1b2c3d4e5f6a7b"
        );
    }

    #[test]
    fn test_list_registration() {
        let module = emit_registration_module(
            &[artifact(ContainerKind::List, "ArrayListInteger", &["Integer"])],
            "monoset_runtime",
        )
        .unwrap();
        assert!(module.contains("mod array_list_integer {"));
        assert!(module.contains("include!(\"/gen/list/ArrayListInteger.rs\");"));
        assert!(module.contains("pub use array_list_integer::*;"));
        assert!(module.contains("pub fn register(registry: &mut monoset_runtime::Registry) {"));
        assert!(module.contains("registry.register_list::<Integer>("));
        assert!(module.contains(".from_collection(|elements| Box::new(ArrayListInteger::from_vec(elements)))"));
    }

    #[test]
    fn test_concurrent_map_registers_concurrency_level() {
        let module = emit_registration_module(
            &[artifact(ContainerKind::ConcurrentHashMap, "ConcurrentHashMapStringLong", &["String", "Long"])],
            "monoset_runtime",
        )
        .unwrap();
        assert!(module.contains("registry.register_map::<String, Long>("));
        assert!(module.contains("monoset_runtime::ContainerKind::ConcurrentHashMap,"));
        assert!(module.contains(".with_concurrency_level("));
    }

    #[test]
    fn test_duplicates_are_emitted_once_in_order() {
        let base = artifact(ContainerKind::HashMap, "HashMapStringInteger", &["String", "Integer"]);
        let ordered = artifact(ContainerKind::OrderedHashMap, "LinkedHashMapStringInteger", &["String", "Integer"]);
        let module = emit_registration_module(&[base.clone(), ordered, base], "monoset_runtime").unwrap();

        assert_eq!(module.matches("mod hash_map_string_integer {").count(), 1);
        let base_at = module.find("mod hash_map_string_integer").unwrap();
        let ordered_at = module.find("mod linked_hash_map_string_integer").unwrap();
        assert!(base_at < ordered_at);
        assert!(!module.contains(".with_concurrency_level("));
    }

    #[test]
    fn test_relative_sources_are_included_by_absolute_path() {
        let mut relative = artifact(ContainerKind::List, "ArrayListInteger", &["Integer"]);
        relative.source_path = PathBuf::from("target/monoset/generated/list/ArrayListInteger.rs");
        let module = emit_registration_module(&[relative], "monoset_runtime").unwrap();

        let expected = std::env::current_dir()
            .unwrap()
            .join("target/monoset/generated/list/ArrayListInteger.rs");
        assert!(module.contains(&format!("include!({:?});", expected.display().to_string())));
        assert!(!module.contains("include!(\"target/"));
    }

    #[test]
    fn test_absolute_path_keeps_absolute_input() {
        let path = std::env::temp_dir().join("x.rs");
        assert_eq!(absolute_path(&path).unwrap(), path);
    }
}
