//! Finds the generic source of a container kind under the corpus root.

use log::debug;
use monoset_types::{ContainerKind, SpecializationError, SpecializationResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Generic source text of one kind, as read from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSource {
    pub kind: ContainerKind,
    pub path: PathBuf,
    pub text: String,
}

/// Path of the generic source for `kind` under `root`.
///
/// The corpus is a precondition of every specialization: a missing root or
/// file is reported as NotFound and never retried.
pub fn locate(root: &Path, kind: ContainerKind) -> SpecializationResult<PathBuf> {
    let path = root.join(kind.corpus_file());
    if !root.is_dir() || !path.is_file() {
        return Err(SpecializationError::NotFound { kind, path });
    }
    debug!("located {} source at {}", kind, path.display());
    Ok(path)
}

/// Locate and read the generic source for `kind`.
pub fn load(root: &Path, kind: ContainerKind) -> SpecializationResult<GenericSource> {
    let path = locate(root, kind)?;
    let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SpecializationError::NotFound {
            kind,
            path: path.clone(),
        },
        _ => SpecializationError::io(&path, e),
    })?;
    Ok(GenericSource { kind, path, text })
}

/// A corpus root together with the operations on it.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    root: PathBuf,
}

impl SourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn locate(&self, kind: ContainerKind) -> SpecializationResult<PathBuf> {
        locate(&self.root, kind)
    }

    pub fn load(&self, kind: ContainerKind) -> SpecializationResult<GenericSource> {
        load(&self.root, kind)
    }

    /// Kinds whose generic source is present.
    pub fn available(&self) -> Vec<ContainerKind> {
        ContainerKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.locate(*kind).is_ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_existing_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("array_list.rs"), "pub struct ArrayList<E> { e: Vec<E> }").unwrap();

        let path = locate(dir.path(), ContainerKind::List).unwrap();
        assert_eq!(path, dir.path().join("array_list.rs"));

        let source = load(dir.path(), ContainerKind::List).unwrap();
        assert!(source.text.contains("ArrayList<E>"));
        assert_eq!(source.kind, ContainerKind::List);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = locate(dir.path(), ContainerKind::HashMap).unwrap_err();
        assert!(matches!(err, SpecializationError::NotFound { kind: ContainerKind::HashMap, .. }));
        assert_eq!(err.code(), "M001");
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nowhere");
        assert!(matches!(
            load(&root, ContainerKind::List),
            Err(SpecializationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_available_lists_present_kinds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hash_map.rs"), "").unwrap();
        fs::write(dir.path().join("concurrent_hash_map.rs"), "").unwrap();

        let locator = SourceLocator::new(dir.path());
        assert_eq!(
            locator.available(),
            vec![ContainerKind::HashMap, ContainerKind::ConcurrentHashMap]
        );
    }
}
