//! Recursive-descent TL parser.
//!
//! ```text
//! TL-program ::= constr-declarations
//!                { --- functions --- fun-declarations | --- types --- constr-declarations }
//! ```
//!
//! The parser pulls tokens from the scanner one at a time and keeps exactly
//! one token of look-ahead. By default the first error is sticky: it is
//! recorded, the rest of the input is drained, and no further declarations
//! are built. With [`ParseOptions::recover`] the parser instead skips to the
//! next `;` and keeps going, up to [`ParseOptions::max_errors`] errors.
use crate::ast::{Declaration, Program, Section};
use crate::error::TlError;
use crate::identity;
use crate::lexer::Scanner;
use crate::options::{IdentityCheck, ParseOptions};
use crate::token::{Spanned, Token, TokenKind};

mod args;
mod declarations;
mod expressions;

// ──────────────────────────────────────────────
// Entry points
// ──────────────────────────────────────────────

/// Everything a parse produces. A non-empty `errors` means `program` is
/// partial and must not be used for code generation.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub program: Program,
    pub errors: Vec<TlError>,
    /// Identity mismatches downgraded by [`IdentityCheck::Warn`].
    pub warnings: Vec<TlError>,
}

impl ParseOutcome {
    pub fn error(&self) -> Option<&TlError> {
        self.errors.first()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse with default options: strict identity checking, first error sticky.
pub fn parse(src: &str) -> (Program, Option<TlError>) {
    let outcome = parse_with(src, &ParseOptions::default());
    (outcome.program, outcome.errors.into_iter().next())
}

pub fn parse_with(src: &str, options: &ParseOptions) -> ParseOutcome {
    let mut p = Parser::new(src, options.clone());
    let program = p.parse_program();
    ParseOutcome {
        program,
        errors: p.errors,
        warnings: p.warnings,
    }
}

/// Parse in multi-error recovery mode.
///
/// Returns the declarations that parsed cleanly plus up to `max_errors`
/// accumulated errors.
pub fn parse_recovering(src: &str, max_errors: usize) -> (Program, Vec<TlError>) {
    let options = ParseOptions {
        recover: true,
        max_errors,
        ..ParseOptions::default()
    };
    let outcome = parse_with(src, &options);
    (outcome.program, outcome.errors)
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Constructors,
    Functions,
    Types,
    Done,
}

impl Phase {
    fn section(self) -> Option<Section> {
        match self {
            Phase::Constructors => Some(Section::Constructors),
            Phase::Functions => Some(Section::Functions),
            Phase::Types => Some(Section::Types),
            Phase::Done => None,
        }
    }
}

struct Parser {
    scanner: Scanner,
    tok: Spanned, // one token look-ahead
    phase: Phase,
    options: ParseOptions,
    /// Field names declared so far in the current combinator.
    scope: Vec<String>,
    errors: Vec<TlError>,
    warnings: Vec<TlError>,
}

impl Parser {
    fn new(src: &str, options: ParseOptions) -> Self {
        let mut p = Parser {
            scanner: Scanner::new(src),
            tok: Spanned {
                token: Token::eof(),
                line: 1,
            },
            phase: Phase::Constructors,
            options,
            scope: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        p.next();
        p
    }

    fn kind(&self) -> TokenKind {
        self.tok.token.kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn line(&self) -> u32 {
        self.tok.line
    }

    /// Advance to the next non-whitespace token.
    fn next(&mut self) {
        loop {
            let s = self.scanner.next_spanned();
            if s.token.kind != TokenKind::Whitespace {
                self.tok = s;
                break;
            }
        }
    }

    /// Consume the current token and return it.
    fn bump(&mut self) -> Spanned {
        let prev = self.tok.clone();
        self.next();
        prev
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Spanned, TlError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&[kind]))
        }
    }

    /// Error for the current token. Illegal tokens become lexical errors
    /// carrying the scanner's diagnostic.
    fn unexpected(&self, expected: &[TokenKind]) -> TlError {
        if self.at(TokenKind::Illegal) {
            let message = self
                .scanner
                .diagnostic()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("illegal token '{}'", self.tok.token.literal));
            return TlError::lexical(self.line(), message);
        }
        let want = match expected {
            [one] => one.to_string(),
            many => format!(
                "one of {}",
                many.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        TlError::structural(
            self.line(),
            format!("unexpected {}, expected {}", self.tok.token, want),
        )
    }

    // -- Program ------------------------------------------------

    fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::TripleMinus) {
                let line = self.line();
                // A complete marker leaves nothing to skip.
                let entered = match self.parse_section_marker() {
                    Ok(name) => self.enter_section(line, &name).map_err(|e| (e, false)),
                    Err(e) => Err((e, true)),
                };
                if let Err((e, resync)) = entered {
                    if self.fail(e, resync) {
                        break;
                    }
                }
                continue;
            }

            match self.parse_declaration() {
                Ok(mut decl) => {
                    let checked = self.resolve_identity(&mut decl);
                    if let Some(section) = self.phase.section() {
                        program.push(section, decl);
                    }
                    if let Err(e) = checked {
                        if self.fail(e, false) {
                            break;
                        }
                    }
                }
                Err(e) => {
                    if self.fail(e, true) {
                        break;
                    }
                }
            }
        }

        self.phase = Phase::Done;
        program
    }

    /// `--- name ---`; returns the section name.
    fn parse_section_marker(&mut self) -> Result<String, TlError> {
        self.expect(TokenKind::TripleMinus)?;
        let name = self.expect(TokenKind::LowerIdent)?.token.literal;
        self.expect(TokenKind::TripleMinus)?;
        Ok(name)
    }

    /// Move to the named section: `functions`, then `types`, in that order
    /// only.
    fn enter_section(&mut self, line: u32, name: &str) -> Result<(), TlError> {
        let next = match (self.phase, name) {
            (Phase::Constructors, "functions") => Phase::Functions,
            (Phase::Functions, "types") => Phase::Types,
            (Phase::Constructors, _) => {
                return Err(TlError::structural(
                    line,
                    format!("expected '--- functions ---' separator, got '--- {} ---'", name),
                ))
            }
            (Phase::Functions, _) => {
                return Err(TlError::structural(
                    line,
                    format!("expected '--- types ---' separator, got '--- {} ---'", name),
                ))
            }
            (Phase::Types, _) | (Phase::Done, _) => {
                return Err(TlError::structural(
                    line,
                    format!("unexpected separator '--- {} ---' after the types section", name),
                ))
            }
        };
        self.phase = next;
        Ok(())
    }

    /// Fill in the declaration's identity and compare it with any declared
    /// signature.
    fn resolve_identity(&mut self, decl: &mut Declaration) -> Result<(), TlError> {
        let text = match identity::canonical_text(decl) {
            Some(text) => text,
            None => return Ok(()),
        };
        let computed = identity::compute_identity(&text);
        let line = decl.line();
        let id = match decl {
            Declaration::Combinator(d) => &mut d.id,
            Declaration::Builtin(d) => &mut d.id,
            Declaration::PartialTypeApp(_) | Declaration::Final(_) => return Ok(()),
        };

        let declared = match id.declared() {
            Some(declared) => declared,
            None => {
                id.identity = Some(computed);
                return Ok(());
            }
        };
        id.identity = Some(declared);
        if declared == computed {
            return Ok(());
        }

        let mismatch = TlError::IdentityMismatch {
            line,
            combinator: id.name().to_owned(),
            declared,
            computed,
        };
        match self.options.identity_check {
            IdentityCheck::Strict => Err(mismatch),
            IdentityCheck::Warn => {
                self.warnings.push(mismatch);
                Ok(())
            }
            IdentityCheck::Off => Ok(()),
        }
    }

    // -- Error policy -------------------------------------------

    /// Record an error. Returns true when parsing stops; the scanner has
    /// then been drained to end of input.
    ///
    /// In recovering mode `resync` skips the rest of the failed declaration.
    fn fail(&mut self, err: TlError, resync: bool) -> bool {
        self.errors.push(err);

        if !self.options.recover || self.errors.len() >= self.options.max_errors.max(1) {
            self.drain();
            return true;
        }
        if resync {
            self.synchronize();
        }
        false
    }

    fn drain(&mut self) {
        while !self.at(TokenKind::Eof) {
            self.next();
        }
    }

    /// Skip past the next `;`, or up to a section marker or end of input.
    fn synchronize(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::TripleMinus => break,
                TokenKind::Semicolon => {
                    self.next();
                    break;
                }
                _ => self.next(),
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
