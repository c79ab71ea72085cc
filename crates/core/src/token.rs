//! Token types produced by the scanner.
//!
//! Token list follows the TL formal grammar: fixed punctuation, natural
//! constants, lower/upper identifiers and the three reserved words.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Eof,
    Whitespace,
    Illegal,

    // Punctuation
    Underscore,   // _
    Colon,        // :
    Semicolon,    // ;
    OpenPar,      // (
    ClosePar,     // )
    OpenBracket,  // [
    CloseBracket, // ]
    OpenBrace,    // {
    CloseBrace,   // }
    LeftAngle,    // <
    RightAngle,   // >
    TripleMinus,  // ---
    Equals,       // =
    Hash,         // #
    ExclMark,     // !
    QuestionMark, // ?
    Percent,      // %
    Plus,         // +
    Comma,        // ,
    Dot,          // .
    Asterisk,     // *

    /// 4, 42, 421
    NatConst,
    /// lc-ident, lc-ident-ns and lc-ident-full:
    /// `user`, `users.user`, `user#decafbad`, `users.user#decafbad`
    LowerIdent,
    /// uc-ident and uc-ident-ns: `User`, `users.User`
    UpperIdent,

    New,
    Final,
    Empty,
}

impl TokenKind {
    /// Map a single punctuation character to its kind.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        let kind = match c {
            '_' => TokenKind::Underscore,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::OpenPar,
            ')' => TokenKind::ClosePar,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '<' => TokenKind::LeftAngle,
            '>' => TokenKind::RightAngle,
            '=' => TokenKind::Equals,
            '#' => TokenKind::Hash,
            '!' => TokenKind::ExclMark,
            '?' => TokenKind::QuestionMark,
            '%' => TokenKind::Percent,
            '+' => TokenKind::Plus,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '*' => TokenKind::Asterisk,
            _ => return None,
        };
        Some(kind)
    }

    /// Reserved words are exact, case-sensitive matches.
    pub fn reserved(word: &str) -> Option<TokenKind> {
        match word {
            "New" => Some(TokenKind::New),
            "Final" => Some(TokenKind::Final),
            "Empty" => Some(TokenKind::Empty),
            _ => None,
        }
    }

    pub fn is_ident(self) -> bool {
        matches!(self, TokenKind::LowerIdent | TokenKind::UpperIdent)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Illegal => "illegal token",
            TokenKind::Underscore => "'_'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::OpenPar => "'('",
            TokenKind::ClosePar => "')'",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::LeftAngle => "'<'",
            TokenKind::RightAngle => "'>'",
            TokenKind::TripleMinus => "'---'",
            TokenKind::Equals => "'='",
            TokenKind::Hash => "'#'",
            TokenKind::ExclMark => "'!'",
            TokenKind::QuestionMark => "'?'",
            TokenKind::Percent => "'%'",
            TokenKind::Plus => "'+'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Asterisk => "'*'",
            TokenKind::NatConst => "natural constant",
            TokenKind::LowerIdent => "lower-case identifier",
            TokenKind::UpperIdent => "upper-case identifier",
            TokenKind::New => "'New'",
            TokenKind::Final => "'Final'",
            TokenKind::Empty => "'Empty'",
        };
        f.write_str(s)
    }
}

/// A lexical token: its kind plus the literal text copied out of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::Eof, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Whitespace => f.write_str("whitespace"),
            _ => write!(f, "'{}'", self.literal),
        }
    }
}

/// A token together with the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
}
