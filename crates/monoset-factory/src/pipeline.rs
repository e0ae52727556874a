//! Specialization pipeline
//!
//! Drives one request through the file-producing stages:
//!
//!   Requested -> Located -> Specialized -> Materialized -> Compiled
//!
//! and reports the stage that failed otherwise. Resolving the compiled type
//! (Compiled -> Loaded -> Done) is typed by the caller's element types and
//! happens in the factory.

use crate::config::{PathsConfig, SpecializerConfig};
use crate::driver::{CompilationDriver, CompileOutcome};
use log::debug;
use monoset_specialize::{materialize, GenericSource, SourceLocator, SpecializedSource, Specializer};
use monoset_types::{derive_class_name, ContainerKind, GeneratedArtifact, SpecializationError, Stage, TypeToken};
use std::fmt;

/// States a request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Requested,
    Located,
    Specialized,
    Materialized,
    Compiled,
    Loaded,
    Done,
    Fallback,
}

impl PipelineState {
    /// State reached when `stage` succeeds.
    pub fn after(stage: Stage) -> Self {
        match stage {
            Stage::Locate => PipelineState::Located,
            Stage::Specialize => PipelineState::Specialized,
            Stage::Materialize => PipelineState::Materialized,
            Stage::Compile => PipelineState::Compiled,
            Stage::Load => PipelineState::Loaded,
        }
    }
}

/// A failed stage and its cause.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: SpecializationError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for StageFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageFailure>;
}

impl<T> AtStage<T> for Result<T, SpecializationError> {
    fn at(self, stage: Stage) -> Result<T, StageFailure> {
        self.map_err(|error| StageFailure { stage, error })
    }
}

/// Output of a compiled request.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub class_name: String,
    /// Generated files, dependencies first
    pub artifacts: Vec<GeneratedArtifact>,
    pub compile: CompileOutcome,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    locator: SourceLocator,
    specializer: Specializer,
    driver: CompilationDriver,
    paths: PathsConfig,
}

impl Pipeline {
    pub fn new(config: &SpecializerConfig) -> Self {
        Self {
            locator: SourceLocator::new(&config.paths.corpus_root),
            specializer: Specializer::new(&config.factory.base_module),
            driver: CompilationDriver::from_config(&config.toolchain),
            paths: config.paths.clone(),
        }
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    pub fn specializer(&self) -> &Specializer {
        &self.specializer
    }

    pub fn driver(&self) -> &CompilationDriver {
        &self.driver
    }

    /// Locate and specialize `kind` (with its dependencies) for `tokens`.
    pub fn specialize(&self, kind: ContainerKind, tokens: &[TypeToken]) -> Result<Vec<SpecializedSource>, StageFailure> {
        let class_name = derive_class_name(kind, tokens).at(Stage::Specialize)?;
        debug!("{}: {:?}", class_name, PipelineState::Requested);

        let sources: Vec<GenericSource> = kind
            .dependencies()
            .iter()
            .chain(std::iter::once(&kind))
            .map(|part| self.locator.load(*part))
            .collect::<Result<Vec<_>, _>>()
            .at(Stage::Locate)?;
        debug!("{}: {:?}", class_name, PipelineState::Located);

        let specialized = sources
            .iter()
            .map(|source| self.specializer.specialize(source.kind, &source.text, tokens))
            .collect::<Result<Vec<_>, _>>()
            .at(Stage::Specialize)?;
        debug!("{}: {:?}", class_name, PipelineState::Specialized);
        Ok(specialized)
    }

    /// Specialize and write the generated sources, without compiling them.
    pub fn generate(&self, kind: ContainerKind, tokens: &[TypeToken]) -> Result<Vec<GeneratedArtifact>, StageFailure> {
        let specialized = self.specialize(kind, tokens)?;
        let artifacts = specialized
            .iter()
            .map(|source| materialize(&self.paths.generated_root, source))
            .collect::<Result<Vec<_>, _>>()
            .at(Stage::Materialize)?;
        if let Some(last) = artifacts.last() {
            debug!("{}: {:?}", last.class_name, PipelineState::Materialized);
        }
        Ok(artifacts)
    }

    /// Run every file-producing stage for `kind` and `tokens`.
    pub fn prepare(&self, kind: ContainerKind, tokens: &[TypeToken]) -> Result<Prepared, StageFailure> {
        let artifacts = self.generate(kind, tokens)?;
        let class_name = derive_class_name(kind, tokens).at(Stage::Specialize)?;

        let paths: Vec<_> = artifacts.iter().map(|a| a.source_path.clone()).collect();
        let compile = self
            .driver
            .compile(&paths, &self.paths.overlay_dir, &self.paths.output_dir)
            .at(Stage::Compile)?;
        debug!("{}: {:?}", class_name, PipelineState::Compiled);

        Ok(Prepared {
            class_name,
            artifacts,
            compile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn corpus_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../monoset-runtime/src/containers")
    }

    fn config(dir: &Path, program: &str) -> SpecializerConfig {
        let mut config = SpecializerConfig::default();
        config.paths.corpus_root = corpus_root();
        config.paths.generated_root = dir.join("generated");
        config.paths.output_dir = dir.join("out");
        config.paths.overlay_dir = dir.to_path_buf();
        config.toolchain.program = program.to_string();
        config.toolchain.args = vec![];
        config
    }

    fn tokens(paths: &[&str]) -> Vec<TypeToken> {
        paths.iter().map(|p| TypeToken::new(*p).unwrap()).collect()
    }

    #[test]
    fn test_prepare_runs_every_stage() {
        let dir = TempDir::new().unwrap();
        let pipeline = Pipeline::new(&config(dir.path(), "true"));

        let prepared = pipeline
            .prepare(ContainerKind::OrderedHashMap, &tokens(&["String", "Integer"]))
            .unwrap();
        assert_eq!(prepared.class_name, "LinkedHashMapStringInteger");
        let names: Vec<&str> = prepared.artifacts.iter().map(|a| a.class_name.as_str()).collect();
        assert_eq!(names, vec!["HashMapStringInteger", "LinkedHashMapStringInteger"]);
        assert!(dir
            .path()
            .join("generated/ordered_hash_map/LinkedHashMapStringInteger.rs")
            .is_file());
        assert!(prepared.compile.unit_path.is_file());
    }

    #[test]
    fn test_missing_corpus_fails_at_locate() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path(), "true");
        config.paths.corpus_root = dir.path().join("missing");

        let failure = Pipeline::new(&config)
            .prepare(ContainerKind::List, &tokens(&["Integer"]))
            .unwrap_err();
        assert_eq!(failure.stage, Stage::Locate);
        assert!(matches!(failure.error, SpecializationError::NotFound { .. }));
    }

    #[test]
    fn test_compiler_failure_keeps_generated_files() {
        let dir = TempDir::new().unwrap();
        let failure = Pipeline::new(&config(dir.path(), "false"))
            .prepare(ContainerKind::List, &tokens(&["Integer"]))
            .unwrap_err();
        assert_eq!(failure.stage, Stage::Compile);
        assert!(dir.path().join("generated/list/ArrayListInteger.rs").is_file());
    }

    #[test]
    fn test_wrong_token_count_fails_before_locating() {
        let dir = TempDir::new().unwrap();
        let failure = Pipeline::new(&config(dir.path(), "true"))
            .generate(ContainerKind::HashMap, &tokens(&["String"]))
            .unwrap_err();
        assert_eq!(failure.stage, Stage::Specialize);
        assert_eq!(failure.error.code(), "M006");
    }

    #[test]
    fn test_state_after_stage() {
        assert_eq!(PipelineState::after(Stage::Compile), PipelineState::Compiled);
        assert_eq!(PipelineState::after(Stage::Load), PipelineState::Loaded);
    }
}
