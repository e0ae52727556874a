//! Writes specialized sources into the generated-source tree.

use crate::specializer::SpecializedSource;
use log::{debug, info};
use monoset_types::{ContainerKind, GeneratedArtifact, SpecializationError, SpecializationResult};
use std::fs;
use std::path::{Path, PathBuf};

/// `<root>/<kind slug>/<class name>.rs`
pub fn target_path(root: &Path, kind: ContainerKind, class_name: &str) -> PathBuf {
    root.join(kind.slug()).join(format!("{}.rs", class_name))
}

/// Write `text` to `target`, creating parent directories.
///
/// A file that already holds exactly `text` is left alone, so repeating a
/// write does not touch modification times. Any other content is replaced.
pub fn write(text: &str, target: &Path) -> SpecializationResult<PathBuf> {
    if let Ok(existing) = fs::read(target) {
        if existing == text.as_bytes() {
            debug!("{} is up to date", target.display());
            return Ok(target.to_path_buf());
        }
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SpecializationError::io(parent, e))?;
    }
    fs::write(target, text).map_err(|e| SpecializationError::io(target, e))?;
    info!("wrote {}", target.display());
    Ok(target.to_path_buf())
}

/// Materialize a specialized source under `root`.
pub fn materialize(root: &Path, source: &SpecializedSource) -> SpecializationResult<GeneratedArtifact> {
    let target = target_path(root, source.kind, &source.class_name);
    let source_path = write(&source.text, &target)?;
    Ok(GeneratedArtifact {
        class_name: source.class_name.clone(),
        source_path,
        kind: source.kind,
        tokens: source.tokens.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoset_types::TypeToken;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn sample() -> SpecializedSource {
        SpecializedSource {
            kind: ContainerKind::List,
            class_name: "ArrayListInteger".to_string(),
            tokens: vec![TypeToken::new("Integer").unwrap()],
            text: "pub struct ArrayListInteger;\n".to_string(),
        }
    }

    #[test]
    fn test_target_path_layout() {
        let path = target_path(Path::new("gen"), ContainerKind::OrderedHashMap, "LinkedHashMapStringInteger");
        assert_eq!(path, Path::new("gen/ordered_hash_map/LinkedHashMapStringInteger.rs"));
    }

    #[test]
    fn test_materialize_creates_directories() {
        let dir = TempDir::new().unwrap();
        let artifact = materialize(dir.path(), &sample()).unwrap();

        assert_eq!(artifact.source_path, dir.path().join("list/ArrayListInteger.rs"));
        assert_eq!(artifact.class_name, "ArrayListInteger");
        assert_eq!(
            fs::read_to_string(&artifact.source_path).unwrap(),
            "pub struct ArrayListInteger;\n"
        );
    }

    #[test]
    fn test_identical_write_is_skipped() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("list/ArrayListInteger.rs");
        write("same", &target).unwrap();

        let old = SystemTime::now() - Duration::from_secs(3600);
        let file = fs::File::options().write(true).open(&target).unwrap();
        file.set_modified(old).unwrap();
        drop(file);

        write("same", &target).unwrap();
        let modified = fs::metadata(&target).unwrap().modified().unwrap();
        assert!(modified < SystemTime::now() - Duration::from_secs(1800));
    }

    #[test]
    fn test_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.rs");
        write("first", &target).unwrap();
        write("second", &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    }

    #[test]
    fn test_unwritable_target_is_io_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let err = write("x", &blocker.join("nested.rs")).unwrap_err();
        assert!(matches!(err, SpecializationError::IoFailure { .. }));
    }
}
