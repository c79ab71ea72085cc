#![allow(clippy::result_large_err)]
//! tl-core: lexer, parser and combinator identities for the TL
//! (Type Language) schema notation.
//!
//! # Public API
//!
//! - [`parse()`] -- parse a document, first error sticky
//! - [`parse_with()`] -- parse with explicit [`ParseOptions`]
//! - [`parse_recovering()`] -- parse collecting several errors
//! - [`identity_of()`] -- CRC-32 identity of a single declaration
//! - [`Scanner`] -- raw token stream; [`scan()`] -- the same as a finite iterator
//! - [`TlError`] -- lexical, structural and identity-mismatch errors
//! - AST types: [`Program`], [`Declaration`], [`CombinatorDecl`], [`Arg`],
//!   [`TypeExpr`], ...

pub mod ast;
pub mod error;
pub mod ident;
pub mod identity;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod token;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    Arg, BoxedTypeIdent, BuiltinCombinatorDecl, CombinatorDecl, Condition, Declaration,
    FinalDecl, FinalKind, FullCombinatorId, OptionalArg, PartialTypeAppDecl, Program, ResultType,
    Section, TypeExpr, TypeIdent,
};
pub use error::TlError;
pub use ident::Ident;
pub use lexer::Scanner;
pub use options::{IdentityCheck, ParseOptions, DEFAULT_MAX_ERRORS};
pub use token::{Spanned, Token, TokenKind};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use identity::{canonical_text, compute_identity, format_identity, identity_of};
pub use lexer::{scan, Tokens};
pub use parser::{parse, parse_recovering, parse_with, ParseOutcome};
