//! Derived names for specialized containers.
//!
//! A derived name is the generic type name followed by the rendered simple
//! name of every type token, key first:
//!
//!   ArrayList + [Integer]          -> ArrayListInteger
//!   HashMap + [String, Integer]    -> HashMapStringInteger
//!
//! Plain concatenation is only unambiguous when every rendered name starts
//! with the sole upper-case letter it contains, so the boundaries can be read
//! back. Anything else (qualified paths, `I32`, `MyPoint`, underscores) gets a
//! `_<hash>` suffix computed from the full token paths.

use crate::error::{SpecializationError, SpecializationResult};
use crate::kind::ContainerKind;
use crate::token::TypeToken;
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a disambiguating suffix.
const SUFFIX_BYTES: usize = 8;

/// Compute the derived name of `kind` specialized for `tokens`.
pub fn derive_class_name(kind: ContainerKind, tokens: &[TypeToken]) -> SpecializationResult<String> {
    check_arity(kind, tokens)?;

    let mut name = kind.generic_name().to_string();
    for token in tokens {
        name.push_str(&token.rendered_name());
    }

    if !tokens.iter().all(is_plain) {
        name.push('_');
        name.push_str(&token_digest(tokens));
    }

    Ok(name)
}

/// Verify that the number of tokens matches the kind's type parameters.
pub fn check_arity(kind: ContainerKind, tokens: &[TypeToken]) -> SpecializationResult<()> {
    if tokens.len() != kind.arity() {
        return Err(SpecializationError::InvalidToken {
            token: tokens
                .iter()
                .map(|t| t.path())
                .collect::<Vec<_>>()
                .join(", "),
            reason: format!(
                "{} takes {} type token(s), got {}",
                kind,
                kind.arity(),
                tokens.len()
            ),
        });
    }
    Ok(())
}

fn is_plain(token: &TypeToken) -> bool {
    if token.is_qualified() {
        return false;
    }
    let rendered = token.rendered_name();
    let mut chars = rendered.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && token.simple_name() == rendered
}

fn token_digest(tokens: &[TypeToken]) -> String {
    let mut hasher = Sha256::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            hasher.update([0u8]);
        }
        hasher.update(token.path().as_bytes());
    }
    hex::encode(&hasher.finalize()[..SUFFIX_BYTES])
}
