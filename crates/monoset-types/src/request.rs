//! Specialization requests and the artifacts they produce.

use crate::error::SpecializationResult;
use crate::kind::ContainerKind;
use crate::naming::{check_arity, derive_class_name};
use crate::token::TypeToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Constructor signature requested by a caller, without its argument values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorShape {
    /// `new()`
    Empty,
    /// `with_capacity(capacity)`
    Sized,
    /// Copy of a list's elements
    FromCollection,
    /// Copy of a map's entries
    FromMap,
    /// `with_capacity_and_load_factor(capacity, load_factor)`
    WithLoadFactor,
    /// `with_concurrency_level(capacity, load_factor, concurrency_level)`
    WithConcurrencyLevel,
}

impl ConstructorShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructorShape::Empty => "empty",
            ConstructorShape::Sized => "sized",
            ConstructorShape::FromCollection => "from_collection",
            ConstructorShape::FromMap => "from_map",
            ConstructorShape::WithLoadFactor => "with_load_factor",
            ConstructorShape::WithConcurrencyLevel => "with_concurrency_level",
        }
    }
}

impl fmt::Display for ConstructorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One factory call: which container, for which types, built how.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecializationRequest {
    pub kind: ContainerKind,
    /// Element type for lists; key then value for maps
    pub tokens: Vec<TypeToken>,
    pub shape: ConstructorShape,
}

impl SpecializationRequest {
    pub fn new(
        kind: ContainerKind,
        tokens: Vec<TypeToken>,
        shape: ConstructorShape,
    ) -> SpecializationResult<Self> {
        check_arity(kind, &tokens)?;
        Ok(Self { kind, tokens, shape })
    }

    pub fn list(element: TypeToken, shape: ConstructorShape) -> Self {
        Self {
            kind: ContainerKind::List,
            tokens: vec![element],
            shape,
        }
    }

    /// Map request; `kind` must be one of the map kinds.
    pub fn map(
        kind: ContainerKind,
        key: TypeToken,
        value: TypeToken,
        shape: ConstructorShape,
    ) -> SpecializationResult<Self> {
        Self::new(kind, vec![key, value], shape)
    }

    /// Derived name of the specialized type this request resolves to.
    pub fn class_name(&self) -> SpecializationResult<String> {
        derive_class_name(self.kind, &self.tokens)
    }
}

/// A generated source file for one specialized type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub class_name: String,
    pub source_path: PathBuf,
    pub kind: ContainerKind,
    pub tokens: Vec<TypeToken>,
}
