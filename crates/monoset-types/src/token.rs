//! Type tokens: the concrete types a container is specialized for.

use crate::error::SpecializationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fully qualified type path such as `i32`, `String` or
/// `geometry::shapes::Point`.
///
/// The path is substituted verbatim into generated source, so it must name a
/// type that is in scope for the compiled unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeToken {
    path: String,
}

impl TypeToken {
    /// Parse and validate a type path.
    pub fn new(path: impl Into<String>) -> Result<Self, SpecializationError> {
        let path = path.into();
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(SpecializationError::InvalidToken {
                token: path,
                reason: "type token is empty".to_string(),
            });
        }

        let body = trimmed.strip_prefix("::").unwrap_or(trimmed);
        for segment in body.split("::") {
            if !is_identifier(segment) {
                return Err(SpecializationError::InvalidToken {
                    token: path.clone(),
                    reason: format!("'{}' is not a valid path segment", segment),
                });
            }
        }

        Ok(Self {
            path: trimmed.to_string(),
        })
    }

    /// The full path as written.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment (`Point` for `geometry::Point`).
    pub fn simple_name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// Whether the token carries a module path in front of its simple name.
    pub fn is_qualified(&self) -> bool {
        self.path.contains("::")
    }

    /// Simple name with its first character upper-cased, as it appears in
    /// derived names (`i32` renders as `I32`).
    pub fn rendered_name(&self) -> String {
        let simple = self.simple_name();
        let mut chars = simple.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    segment != "_" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl FromStr for TypeToken {
    type Err = SpecializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeToken::new(s)
    }
}

impl TryFrom<String> for TypeToken {
    type Error = SpecializationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeToken::new(value)
    }
}

impl From<TypeToken> for String {
    fn from(token: TypeToken) -> Self {
        token.path
    }
}
