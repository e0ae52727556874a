//! Data model for monoset
//!
//! Defines the container kinds, type tokens, requests and artifacts shared by
//! the specializer, the factory and the command-line driver, together with
//! the error taxonomy every pipeline stage reports through.

pub mod error;
pub mod kind;
pub mod naming;
pub mod request;
pub mod token;

pub use error::{SpecializationError, SpecializationResult, Stage};
pub use kind::ContainerKind;
pub use naming::derive_class_name;
pub use request::{ConstructorShape, GeneratedArtifact, SpecializationRequest};
pub use token::TypeToken;
