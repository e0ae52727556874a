//! Source specialization for monoset
//!
//! Turns the generic container sources of the runtime crate into
//! type-concrete sources:
//! - `locator` finds the generic source of a container kind
//! - `specializer` rewrites it for concrete type tokens
//! - `materializer` writes the result into the generated-source tree
//! - `registration` renders the build-time module that registers
//!   specialized containers with a runtime registry

pub mod lexer;
pub mod locator;
pub mod materializer;
pub mod registration;
pub mod specializer;

pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use locator::{load, locate, GenericSource, SourceLocator};
pub use materializer::{materialize, target_path, write};
pub use registration::{absolute_path, emit_registration_module, include_item, module_name};
pub use specializer::{SpecializedSource, Specializer, DEFAULT_BASE_MODULE};
