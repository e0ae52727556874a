//! Error taxonomy shared by every specialization stage.

use crate::kind::ContainerKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type SpecializationResult<T> = Result<T, SpecializationError>;

/// Errors surfaced by the specialization pipeline.
///
/// Each stage returns these upward; only the specialized factory recovers
/// from them, by falling back to the generic container.
#[derive(Debug, Error)]
pub enum SpecializationError {
    /// The corpus root does not contain the generic source of a kind
    #[error("generic source for {kind} not found at {}", .path.display())]
    NotFound { kind: ContainerKind, path: PathBuf },

    /// The generic source does not have the expected structure
    #[error("malformed {kind} source: {reason}")]
    MalformedSource { kind: ContainerKind, reason: String },

    /// Reading or writing a file failed
    #[error("I/O failure on {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The toolchain exited unsuccessfully or could not be run
    #[error("compilation failed{}: {reason}", .exit_code.map(|c| format!(" (exit code {})", c)).unwrap_or_default())]
    CompilationFailed {
        exit_code: Option<i32>,
        reason: String,
    },

    /// No constructor is registered for the name and shape
    #[error("cannot resolve {class_name}: {reason}")]
    ResolutionFailed { class_name: String, reason: String },

    /// A type token is not a valid type path
    #[error("invalid type token '{token}': {reason}")]
    InvalidToken { token: String, reason: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// An earlier failure recalled from a cache; keeps the original code
    #[error("earlier attempt failed: {message}")]
    Recalled { code: &'static str, message: String },
}

impl SpecializationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpecializationError::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(kind: ContainerKind, reason: impl Into<String>) -> Self {
        SpecializationError::MalformedSource {
            kind,
            reason: reason.into(),
        }
    }

    /// Short error code (e.g. "M004"), explained by `monoset explain`.
    pub fn code(&self) -> &'static str {
        match self {
            SpecializationError::NotFound { .. } => "M001",
            SpecializationError::MalformedSource { .. } => "M002",
            SpecializationError::IoFailure { .. } => "M003",
            SpecializationError::CompilationFailed { .. } => "M004",
            SpecializationError::ResolutionFailed { .. } => "M005",
            SpecializationError::InvalidToken { .. } => "M006",
            SpecializationError::Config(_) => "M007",
            SpecializationError::Recalled { code, .. } => *code,
        }
    }
}

/// Pipeline stage a request was in when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Locate,
    Specialize,
    Materialize,
    Compile,
    Load,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Locate => "locate",
            Stage::Specialize => "specialize",
            Stage::Materialize => "materialize",
            Stage::Compile => "compile",
            Stage::Load => "load",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            SpecializationError::NotFound {
                kind: ContainerKind::List,
                path: PathBuf::from("corpus/array_list.rs"),
            },
            SpecializationError::malformed(ContainerKind::List, "no declaration"),
            SpecializationError::io("out", std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
            SpecializationError::CompilationFailed {
                exit_code: Some(1),
                reason: "rustc failed".to_string(),
            },
            SpecializationError::ResolutionFailed {
                class_name: "ArrayListInteger".to_string(),
                reason: "not registered".to_string(),
            },
            SpecializationError::InvalidToken {
                token: "".to_string(),
                reason: "empty".to_string(),
            },
            SpecializationError::Config("bad".to_string()),
        ];
        let codes: HashSet<&str> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_compilation_failed_message_includes_exit_code() {
        let err = SpecializationError::CompilationFailed {
            exit_code: Some(101),
            reason: "toolchain reported errors".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "compilation failed (exit code 101): toolchain reported errors"
        );
    }

    #[test]
    fn test_recalled_error_keeps_original_code() {
        let original = SpecializationError::CompilationFailed {
            exit_code: Some(1),
            reason: "rustc failed".to_string(),
        };
        let recalled = SpecializationError::Recalled {
            code: original.code(),
            message: original.to_string(),
        };
        assert_eq!(recalled.code(), "M004");
        assert_eq!(
            recalled.to_string(),
            "earlier attempt failed: compilation failed (exit code 1): rustc failed"
        );
    }
}
