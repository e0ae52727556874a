//! Source-to-source specialization of generic container sources.
//!
//! The generic source of a kind declares `struct <Name><P1, ..>`. Specializing
//! it for concrete type tokens:
//! - substitutes every use of a declared parameter with its token
//! - drops the parameter list of `impl<..>` blocks over exactly those parameters
//! - renames the type (and its declared dependency) to the derived name,
//!   consuming the `<P1, ..>` / `::<P1, ..>` argument list after it
//! - points `crate::` paths at the runtime crate
//! - turns inner doc comments into plain comments, so the result can be
//!   pulled into any module with `include!`
//!
//! Everything else is copied through byte for byte.

use crate::lexer::{tokenize, Token, TokenKind};
use crate::locator::SourceLocator;
use log::debug;
use monoset_types::{derive_class_name, ContainerKind, SpecializationError, SpecializationResult, TypeToken};
use std::collections::HashMap;

/// Crate the generated sources refer to for traits, wrappers and re-exported
/// dependencies.
pub const DEFAULT_BASE_MODULE: &str = "monoset_runtime";

/// Output of one specialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecializedSource {
    pub kind: ContainerKind,
    pub class_name: String,
    pub tokens: Vec<TypeToken>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Specializer {
    base_module: String,
}

impl Default for Specializer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_MODULE)
    }
}

impl Specializer {
    pub fn new(base_module: impl Into<String>) -> Self {
        Self {
            base_module: base_module.into(),
        }
    }

    pub fn base_module(&self) -> &str {
        &self.base_module
    }

    /// Specialize the generic source of `kind` for `tokens`.
    ///
    /// For a kind with dependencies, references to the dependency are renamed
    /// to the dependency's derived name for the same tokens; the dependency
    /// itself has to be specialized separately (see [`Specializer::specialize_unit`]).
    pub fn specialize(
        &self,
        kind: ContainerKind,
        text: &str,
        tokens: &[TypeToken],
    ) -> SpecializationResult<SpecializedSource> {
        let class_name = derive_class_name(kind, tokens)?;

        let mut renames = HashMap::new();
        renames.insert(kind.generic_name(), class_name.clone());
        for dependency in kind.dependencies() {
            renames.insert(dependency.generic_name(), derive_class_name(*dependency, tokens)?);
        }
        let dropped_imports: Vec<&str> = kind.dependencies().iter().map(|d| d.generic_name()).collect();

        let rewrite = Rewrite {
            kind,
            source: text,
            tokens: tokenize(text).map_err(|e| SpecializationError::malformed(kind, e.to_string()))?,
            substitutions: HashMap::new(),
            renames,
            dropped_imports,
            base_module: &self.base_module,
        };
        let body = rewrite.run(tokens)?;

        let mut output = header(kind, tokens, &self.base_module);
        output.push_str(&body);

        debug!("specialized {} for [{}] as {}", kind, join_paths(tokens), class_name);
        Ok(SpecializedSource {
            kind,
            class_name,
            tokens: tokens.to_vec(),
            text: output,
        })
    }

    pub fn specialize_list(&self, text: &str, element: &TypeToken) -> SpecializationResult<SpecializedSource> {
        self.specialize(ContainerKind::List, text, std::slice::from_ref(element))
    }

    pub fn specialize_hash_map(
        &self,
        text: &str,
        key: &TypeToken,
        value: &TypeToken,
    ) -> SpecializationResult<SpecializedSource> {
        self.specialize(ContainerKind::HashMap, text, &[key.clone(), value.clone()])
    }

    /// Specialize the ordered map together with the hash map it is built on.
    /// The hash map comes first in the returned pair.
    pub fn specialize_ordered_hash_map(
        &self,
        ordered_text: &str,
        hash_map_text: &str,
        key: &TypeToken,
        value: &TypeToken,
    ) -> SpecializationResult<(SpecializedSource, SpecializedSource)> {
        let tokens = [key.clone(), value.clone()];
        let base = self.specialize(ContainerKind::HashMap, hash_map_text, &tokens)?;
        let ordered = self.specialize(ContainerKind::OrderedHashMap, ordered_text, &tokens)?;
        Ok((base, ordered))
    }

    pub fn specialize_concurrent_hash_map(
        &self,
        text: &str,
        key: &TypeToken,
        value: &TypeToken,
    ) -> SpecializationResult<SpecializedSource> {
        self.specialize(ContainerKind::ConcurrentHashMap, text, &[key.clone(), value.clone()])
    }

    /// Load and specialize `kind` and everything it depends on, dependencies
    /// first. This is the set of sources that has to be compiled together.
    pub fn specialize_unit(
        &self,
        locator: &SourceLocator,
        kind: ContainerKind,
        tokens: &[TypeToken],
    ) -> SpecializationResult<Vec<SpecializedSource>> {
        let mut unit = Vec::new();
        for part in kind.dependencies().iter().chain(std::iter::once(&kind)) {
            let source = locator.load(*part)?;
            unit.push(self.specialize(*part, &source.text, tokens)?);
        }
        Ok(unit)
    }
}

fn join_paths(tokens: &[TypeToken]) -> String {
    tokens.iter().map(|t| t.path()).collect::<Vec<_>>().join(", ")
}

fn header(kind: ContainerKind, tokens: &[TypeToken], base_module: &str) -> String {
    format!(
        "// @generated by monoset from {} for <{}>. Do not edit.\n\
         #[allow(unused_imports)]\n\
         use {}::wrappers::*;\n\n",
        kind.corpus_file(),
        join_paths(tokens),
        base_module
    )
}

struct Rewrite<'a> {
    kind: ContainerKind,
    source: &'a str,
    tokens: Vec<Token>,
    /// Declared parameter -> concrete type path
    substitutions: HashMap<String, String>,
    /// Generic type name -> derived name
    renames: HashMap<&'static str, String>,
    /// Names whose `use` import is removed from the output
    dropped_imports: Vec<&'static str>,
    base_module: &'a str,
}

/// A `<...>` list: the index of its closing `>` and the significant token
/// indices of each comma-separated entry.
struct AngleList {
    close: usize,
    entries: Vec<Vec<usize>>,
}

impl<'a> Rewrite<'a> {
    fn run(mut self, concrete: &[TypeToken]) -> SpecializationResult<String> {
        let params = self.declared_params()?;
        if params.len() != self.kind.arity() {
            return Err(self.malformed(format!(
                "`{}` declares {} type parameter(s), expected {}",
                self.kind.generic_name(),
                params.len(),
                self.kind.arity()
            )));
        }
        for (param, token) in params.iter().zip(concrete) {
            self.substitutions.insert(param.clone(), token.path().to_string());
        }

        let mut out = String::with_capacity(self.source.len());
        let mut i = 0;
        while i < self.tokens.len() {
            let tok = self.tokens[i];
            let text = tok.text(self.source);

            match tok.kind {
                TokenKind::LineComment if text.starts_with("//!") => {
                    out.push_str("//");
                    out.push_str(&text[3..]);
                }
                TokenKind::BlockComment if text.starts_with("/*!") => {
                    out.push_str("/*");
                    out.push_str(&text[3..]);
                }
                TokenKind::Ident => {
                    i = self.rewrite_ident(i, &params, &mut out)?;
                    continue;
                }
                _ => out.push_str(text),
            }
            i += 1;
        }
        Ok(out)
    }

    /// Emit the rewrite of the identifier at `i`; returns the next index.
    fn rewrite_ident(&self, i: usize, params: &[String], out: &mut String) -> SpecializationResult<usize> {
        let text = self.text(i);
        let prev = self.prev_significant(i).map(|p| self.text(p));
        let after_path_sep = prev == Some("::");

        if text == "use" {
            if let Some(end) = self.dropped_import_end(i) {
                return Ok(self.skip_line_break(end + 1));
            }
        }

        if text == "impl" {
            if let Some(open) = self.next_significant(i).filter(|n| self.text(*n) == "<") {
                let list = self.angle_list(open)?;
                let declared: Vec<&str> = list
                    .entries
                    .iter()
                    .filter_map(|entry| entry.first())
                    .map(|first| self.text(*first))
                    .collect();
                let overlap = declared.iter().filter(|p| params.iter().any(|d| d == *p)).count();
                if overlap == params.len() && declared.len() == params.len() {
                    out.push_str(text);
                    return Ok(list.close + 1);
                }
                if overlap > 0 {
                    return Err(self.malformed(format!(
                        "impl block over <{}> only partially matches the declared parameters",
                        declared.join(", ")
                    )));
                }
            }
        }

        if text == "crate" && !after_path_sep {
            if let Some(sep) = self.next_significant(i).filter(|n| self.text(*n) == "::") {
                out.push_str(self.base_module);
                return Ok(sep);
            }
        }

        if let Some(derived) = self.renames.get(text).filter(|_| !after_path_sep) {
            out.push_str(derived);
            return self.skip_type_arguments(i, params);
        }

        if let Some(concrete) = self.substitutions.get(text) {
            if prev != Some(".") && !after_path_sep {
                out.push_str(concrete);
                return Ok(i + 1);
            }
        }

        out.push_str(text);
        Ok(i + 1)
    }

    /// After a renamed type at `i`, consume `<P1, ..>` or `::<P1, ..>`.
    /// Arguments other than the declared parameters cannot be expressed by a
    /// single specialized name.
    fn skip_type_arguments(&self, i: usize, params: &[String]) -> SpecializationResult<usize> {
        let open = match self.next_significant(i) {
            Some(n) if self.text(n) == "<" => n,
            Some(n) if self.text(n) == "::" => match self.next_significant(n) {
                Some(m) if self.text(m) == "<" => m,
                _ => return Ok(i + 1),
            },
            _ => return Ok(i + 1),
        };

        let list = self.angle_list(open)?;
        let args: Vec<String> = list
            .entries
            .iter()
            .map(|entry| entry.iter().map(|t| self.text(*t)).collect::<String>())
            .collect();
        if args != params {
            return Err(self.malformed(format!(
                "`{}` is used with arguments <{}>, expected <{}>",
                self.text(i),
                args.join(", "),
                params.join(", ")
            )));
        }
        Ok(list.close + 1)
    }

    /// Parameters of the generic declaration `struct <Name><..>`.
    fn declared_params(&self) -> SpecializationResult<Vec<String>> {
        let name = self.kind.generic_name();
        let significant: Vec<usize> = (0..self.tokens.len()).filter(|i| !self.tokens[*i].is_trivia()).collect();

        for window in significant.windows(3) {
            if self.text(window[0]) == "struct" && self.text(window[1]) == name && self.text(window[2]) == "<" {
                let list = self.angle_list(window[2])?;
                let mut params = Vec::new();
                for entry in &list.entries {
                    let first = entry[0];
                    if self.tokens[first].kind != TokenKind::Ident {
                        return Err(self.malformed(format!(
                            "`{}` has a non-type parameter `{}`",
                            name,
                            self.text(first)
                        )));
                    }
                    params.push(self.text(first).to_string());
                }
                return Ok(params);
            }
        }
        Err(self.malformed(format!("no generic declaration `struct {}<..>` found", name)))
    }

    /// Parse the angle-bracket list opening at significant token `open`.
    fn angle_list(&self, open: usize) -> SpecializationResult<AngleList> {
        let mut depth = 0usize;
        let mut parens = 0usize;
        let mut entries: Vec<Vec<usize>> = Vec::new();
        let mut current = Vec::new();
        let mut prev: Option<&str> = None;

        for i in open..self.tokens.len() {
            if self.tokens[i].is_trivia() {
                continue;
            }
            let text = self.text(i);
            match text {
                "<" => {
                    depth += 1;
                    if depth == 1 {
                        prev = Some(text);
                        continue;
                    }
                }
                ">" if prev != Some("-") => {
                    depth -= 1;
                    if depth == 0 {
                        if !current.is_empty() {
                            entries.push(current);
                        }
                        return Ok(AngleList { close: i, entries });
                    }
                }
                "(" | "[" => parens += 1,
                ")" | "]" => parens = parens.saturating_sub(1),
                "," if depth == 1 && parens == 0 => {
                    if !current.is_empty() {
                        entries.push(std::mem::take(&mut current));
                    }
                    prev = Some(text);
                    continue;
                }
                _ => {}
            }
            current.push(i);
            prev = Some(text);
        }
        Err(self.malformed("unterminated `<` list"))
    }

    /// If the `use` at `i` imports exactly one dropped name
    /// (`use a::b::Name;`), the index of its `;`.
    fn dropped_import_end(&self, i: usize) -> Option<usize> {
        let mut last_ident = None;
        let mut next = self.next_significant(i)?;
        loop {
            let text = self.text(next);
            match self.tokens[next].kind {
                TokenKind::Ident => last_ident = Some(text),
                TokenKind::Punct if text == "::" => {}
                TokenKind::Punct if text == ";" => {
                    return last_ident.filter(|name| self.dropped_imports.contains(name)).map(|_| next);
                }
                _ => return None,
            }
            next = self.next_significant(next)?;
        }
    }

    /// Skip one line break following a removed item.
    fn skip_line_break(&self, i: usize) -> usize {
        match self.tokens.get(i) {
            Some(tok) if tok.kind == TokenKind::Whitespace && tok.text(self.source) == "\n" => i + 1,
            _ => i,
        }
    }

    fn text(&self, i: usize) -> &'a str {
        self.tokens[i].text(self.source)
    }

    fn next_significant(&self, i: usize) -> Option<usize> {
        (i + 1..self.tokens.len()).find(|j| !self.tokens[*j].is_trivia())
    }

    fn prev_significant(&self, i: usize) -> Option<usize> {
        (0..i).rev().find(|j| !self.tokens[*j].is_trivia())
    }

    fn malformed(&self, reason: impl Into<String>) -> SpecializationError {
        SpecializationError::malformed(self.kind, reason)
    }
}
