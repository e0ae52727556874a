//! Specialize the prebuilt containers into `OUT_DIR` and emit the module that
//! registers them.

use monoset_factory::{Pipeline, SpecializerConfig};
use monoset_specialize::{emit_registration_module, write};
use monoset_types::{ContainerKind, TypeToken};
use std::env;
use std::error::Error;
use std::path::PathBuf;

const TARGETS: &[(ContainerKind, &[&str])] = &[
    (ContainerKind::List, &["Integer"]),
    (ContainerKind::List, &["Long"]),
    (ContainerKind::List, &["String"]),
    (ContainerKind::HashMap, &["String", "Integer"]),
    (ContainerKind::OrderedHashMap, &["String", "Integer"]),
    (ContainerKind::ConcurrentHashMap, &["String", "Long"]),
];

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let corpus_root = manifest_dir.join("../monoset-runtime/src/containers");
    println!("cargo:rerun-if-changed={}", corpus_root.display());
    println!("cargo:rerun-if-changed=build.rs");

    let mut config = SpecializerConfig::default();
    config.paths.corpus_root = corpus_root;
    config.paths.generated_root = out_dir.join("generated");
    let pipeline = Pipeline::new(&config);

    let mut artifacts = Vec::new();
    for (kind, paths) in TARGETS {
        let tokens = paths.iter().map(|p| TypeToken::new(*p)).collect::<Result<Vec<_>, _>>()?;
        artifacts.extend(pipeline.generate(*kind, &tokens)?);
    }

    let module = emit_registration_module(&artifacts, &config.factory.base_module)?;
    write(&module, &out_dir.join("registry.rs"))?;
    Ok(())
}
