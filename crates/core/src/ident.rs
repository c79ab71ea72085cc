//! Identifier classification.
//!
//! ```text
//! lc-ident      ::= lc-letter { ident-char }
//! lc-ident-ns   ::= [ namespace-ident . ] lc-ident
//! lc-ident-full ::= lc-ident-ns [ # hex-digit *8 ]
//! uc-ident-ns   ::= [ namespace-ident . ] uc-ident
//! ```

use crate::token::{Token, TokenKind};
use serde::Serialize;

/// True iff the token is a lower identifier carrying a non-empty signature
/// after `#`.
pub fn is_full_id(tok: &Token) -> bool {
    tok.kind == TokenKind::LowerIdent && split_signature(&tok.literal).1.is_some()
}

/// True iff the token is an identifier whose literal has a `.` separating
/// two non-empty segments.
pub fn has_namespace(tok: &Token) -> bool {
    tok.kind.is_ident() && split_namespace(split_signature(&tok.literal).0).0.is_some()
}

fn split_signature(literal: &str) -> (&str, Option<&str>) {
    match literal.split_once('#') {
        Some((name, sig)) if !sig.is_empty() => (name, Some(sig)),
        Some((name, _)) => (name, None),
        None => (literal, None),
    }
}

fn split_namespace(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((ns, rest)) if !ns.is_empty() && !rest.is_empty() => (Some(ns), rest),
        _ => (None, name),
    }
}

/// A classified identifier literal as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ident {
    literal: String,
}

impl Ident {
    pub fn new(literal: impl Into<String>) -> Self {
        Ident {
            literal: literal.into(),
        }
    }

    /// Full source literal, e.g. `users.user#decafbad`.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Literal without its signature, e.g. `users.user`.
    pub fn name(&self) -> &str {
        split_signature(&self.literal).0
    }

    /// Namespace before the dot, e.g. `users`.
    pub fn namespace(&self) -> Option<&str> {
        split_namespace(self.name()).0
    }

    /// The hex digits after `#`, if any.
    pub fn signature(&self) -> Option<&str> {
        split_signature(&self.literal).1
    }

    /// The signature as a number. `None` when absent or not valid hex.
    pub fn signature_value(&self) -> Option<u32> {
        self.signature()
            .and_then(|s| u32::from_str_radix(s, 16).ok())
    }

    /// `_`
    pub fn is_placeholder(&self) -> bool {
        self.literal == "_"
    }

    /// var-ident: a plain lc-ident or uc-ident, no namespace, no signature.
    pub fn is_var_ident(&self) -> bool {
        let mut chars = self.literal.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl From<&Token> for Ident {
    fn from(tok: &Token) -> Self {
        Ident::new(tok.literal.clone())
    }
}
