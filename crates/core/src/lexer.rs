//! TL scanner.
//!
//! Produces tokens lazily, one per call. Whitespace runs are returned as a
//! single token; `//` comments are skipped. Malformed input never stops the
//! scanner: it yields an [`TokenKind::Illegal`] token and records a
//! diagnostic that the parser turns into a lexical error.

use crate::token::{Spanned, Token, TokenKind};

pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    diagnostic: Option<String>,
}

/// Finite token stream over a [`Scanner`]: every token up to and including
/// the first end-of-input token, then `None`.
pub struct Tokens {
    scanner: Scanner,
    finished: bool,
}

/// Start scanning `src` as an iterator of tokens.
pub fn scan(src: &str) -> Tokens {
    Tokens {
        scanner: Scanner::new(src),
        finished: false,
    }
}

impl Scanner {
    pub fn new(src: &str) -> Self {
        Scanner {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            diagnostic: None,
        }
    }

    /// Return the next token. After end of input every call returns
    /// [`TokenKind::Eof`] again.
    pub fn scan(&mut self) -> Token {
        self.next_spanned().token
    }

    /// Diagnostic attached to the most recent illegal token, if the last
    /// call produced one.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Current line (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn next_spanned(&mut self) -> Spanned {
        self.diagnostic = None;

        loop {
            let line = self.line;
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    return Spanned {
                        token: Token::eof(),
                        line,
                    }
                }
            };

            let token = if is_whitespace(c) {
                self.scan_whitespace()
            } else if c == '/' {
                self.bump();
                if self.peek() == Some('/') {
                    self.skip_line_comment();
                    continue;
                }
                self.illegal("/", "unexpected character '/'")
            } else if c == '-' {
                self.scan_triple_minus()
            } else if c.is_ascii_digit() {
                self.scan_number()
            } else if c.is_ascii_uppercase() {
                self.scan_upper_ident()
            } else if c.is_ascii_lowercase() {
                self.scan_lower_ident()
            } else if let Some(kind) = TokenKind::punctuation(c) {
                self.bump();
                Token::new(kind, c.to_string())
            } else {
                self.bump();
                self.illegal(c.to_string(), format!("unexpected character '{}'", c))
            };

            return Spanned { token, line };
        }
    }

    // -- Character cursor ---------------------------------------

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn illegal(&mut self, literal: impl Into<String>, message: impl Into<String>) -> Token {
        self.diagnostic = Some(message.into());
        Token::new(TokenKind::Illegal, literal)
    }

    // -- Token scanners -----------------------------------------

    fn scan_whitespace(&mut self) -> Token {
        let mut buf = String::new();
        while let Some(c) = self.peek().filter(|c| is_whitespace(*c)) {
            buf.push(c);
            self.bump();
        }
        Token::new(TokenKind::Whitespace, buf)
    }

    /// Discard everything up to (not including) the next newline.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// `---`, or an illegal token holding the three characters consumed.
    fn scan_triple_minus(&mut self) -> Token {
        let mut buf = String::new();
        for _ in 0..3 {
            match self.bump() {
                Some(c) => buf.push(c),
                None => break,
            }
        }
        if buf == "---" {
            return Token::new(TokenKind::TripleMinus, buf);
        }
        let message = format!("expected '---', got '{}'", buf);
        self.illegal(buf, message)
    }

    fn scan_number(&mut self) -> Token {
        let mut buf = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            buf.push(c);
            self.bump();
        }
        Token::new(TokenKind::NatConst, buf)
    }

    fn take_ident_chars(&mut self, buf: &mut String) {
        while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
            buf.push(c);
            self.bump();
        }
    }

    fn scan_upper_ident(&mut self) -> Token {
        let mut buf = String::new();
        self.take_ident_chars(&mut buf);
        let kind = TokenKind::reserved(&buf).unwrap_or(TokenKind::UpperIdent);
        Token::new(kind, buf)
    }

    /// lc-ident, lc-ident-ns, uc-ident-ns and lc-ident-full.
    fn scan_lower_ident(&mut self) -> Token {
        let mut buf = String::new();
        self.take_ident_chars(&mut buf);

        // The dot belongs to the identifier only when a letter follows;
        // `flags.0` is `flags` `.` `0`.
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
            buf.push('.');
            let upper = self.peek().is_some_and(|c| c.is_ascii_uppercase());
            self.take_ident_chars(&mut buf);
            if upper {
                return Token::new(TokenKind::UpperIdent, buf);
            }
        }

        if self.peek() == Some('#') {
            self.bump();
            buf.push('#');
            return self.scan_signature(buf);
        }

        Token::new(TokenKind::LowerIdent, buf)
    }

    /// Exactly eight lowercase hex digits after `#`.
    fn scan_signature(&mut self, mut buf: String) -> Token {
        for _ in 0..8 {
            match self.peek() {
                Some(c) if is_hex_digit(c) => {
                    buf.push(c);
                    self.bump();
                }
                Some(c) if !is_whitespace(c) => {
                    let message = format!(
                        "invalid signature in '{}': expected hex digit, got '{}'",
                        buf, c
                    );
                    return self.illegal(buf, message);
                }
                _ => {
                    let message =
                        format!("invalid signature in '{}': expected 8 hex digits", buf);
                    return self.illegal(buf, message);
                }
            }
        }

        if self.peek().is_some_and(is_ident_char) {
            self.take_ident_chars(&mut buf);
            let message = format!(
                "invalid signature in '{}': expected exactly 8 hex digits",
                buf
            );
            return self.illegal(buf, message);
        }

        Token::new(TokenKind::LowerIdent, buf)
    }
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scanner.scan();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

// hex-digit ::= digit | a | b | c | d | e | f
fn is_hex_digit(c: char) -> bool {
    c.is_ascii_digit() || ('a'..='f').contains(&c)
}

// ident-char ::= letter | digit | _
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal)
    }

    #[test]
    fn single_tokens() {
        let cases = [
            ("", tok(TokenKind::Eof, "")),
            (" ", tok(TokenKind::Whitespace, " ")),
            ("  ", tok(TokenKind::Whitespace, "  ")),
            ("\t", tok(TokenKind::Whitespace, "\t")),
            (" \n\t", tok(TokenKind::Whitespace, " \n\t")),
            (":", tok(TokenKind::Colon, ":")),
            (";", tok(TokenKind::Semicolon, ";")),
            ("(", tok(TokenKind::OpenPar, "(")),
            (")", tok(TokenKind::ClosePar, ")")),
            ("[", tok(TokenKind::OpenBracket, "[")),
            ("]", tok(TokenKind::CloseBracket, "]")),
            ("{", tok(TokenKind::OpenBrace, "{")),
            ("}", tok(TokenKind::CloseBrace, "}")),
            ("<", tok(TokenKind::LeftAngle, "<")),
            (">", tok(TokenKind::RightAngle, ">")),
            ("%", tok(TokenKind::Percent, "%")),
            ("?", tok(TokenKind::QuestionMark, "?")),
            ("!", tok(TokenKind::ExclMark, "!")),
            ("*", tok(TokenKind::Asterisk, "*")),
            ("+", tok(TokenKind::Plus, "+")),
            ("=", tok(TokenKind::Equals, "=")),
            ("_", tok(TokenKind::Underscore, "_")),
            (".", tok(TokenKind::Dot, ".")),
            (",", tok(TokenKind::Comma, ",")),
            ("@", tok(TokenKind::Illegal, "@")),
            ("#", tok(TokenKind::Hash, "#")),
            ("---", tok(TokenKind::TripleMinus, "---")),
            ("---functions---", tok(TokenKind::TripleMinus, "---")),
            ("#decafbad", tok(TokenKind::Hash, "#")),
            ("0", tok(TokenKind::NatConst, "0")),
            ("12", tok(TokenKind::NatConst, "12")),
            ("90123", tok(TokenKind::NatConst, "90123")),
            ("New", tok(TokenKind::New, "New")),
            ("Empty", tok(TokenKind::Empty, "Empty")),
            ("Final", tok(TokenKind::Final, "Final")),
            ("Newly", tok(TokenKind::UpperIdent, "Newly")),
            ("Final_countdown", tok(TokenKind::UpperIdent, "Final_countdown")),
            ("EmptyHands", tok(TokenKind::UpperIdent, "EmptyHands")),
            ("functions---", tok(TokenKind::LowerIdent, "functions")),
            ("getUser", tok(TokenKind::LowerIdent, "getUser")),
            ("GetUser", tok(TokenKind::UpperIdent, "GetUser")),
            ("int128", tok(TokenKind::LowerIdent, "int128")),
            ("Int128", tok(TokenKind::UpperIdent, "Int128")),
            ("user#decafbad", tok(TokenKind::LowerIdent, "user#decafbad")),
            ("users.user", tok(TokenKind::LowerIdent, "users.user")),
            (
                "users.user#decafbad",
                tok(TokenKind::LowerIdent, "users.user#decafbad"),
            ),
            ("users.User", tok(TokenKind::UpperIdent, "users.User")),
            ("--a", tok(TokenKind::Illegal, "--a")),
            ("-aa", tok(TokenKind::Illegal, "-aa")),
        ];

        for (src, expected) in cases {
            let mut s = Scanner::new(src);
            let got = s.scan();
            assert_eq!(got, expected, "scanning {:?}", src);
            if got.literal == src {
                assert_eq!(s.scan().kind, TokenKind::Eof, "second token of {:?}", src);
            }
        }
    }

    #[test]
    fn eof_repeats() {
        let mut s = Scanner::new("int");
        assert_eq!(s.scan(), tok(TokenKind::LowerIdent, "int"));
        assert_eq!(s.scan().kind, TokenKind::Eof);
        assert_eq!(s.scan().kind, TokenKind::Eof);
        assert_eq!(s.scan().kind, TokenKind::Eof);
    }

    #[test]
    fn builtin_declaration_tokens() {
        let tokens: Vec<Token> = scan("int ? = Int;").collect();
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::LowerIdent, "int"),
                tok(TokenKind::Whitespace, " "),
                tok(TokenKind::QuestionMark, "?"),
                tok(TokenKind::Whitespace, " "),
                tok(TokenKind::Equals, "="),
                tok(TokenKind::Whitespace, " "),
                tok(TokenKind::UpperIdent, "Int"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn iterator_stops_after_eof() {
        let mut it = scan("users.user#decafbad;");
        assert_eq!(
            it.next(),
            Some(tok(TokenKind::LowerIdent, "users.user#decafbad"))
        );
        assert_eq!(it.next(), Some(tok(TokenKind::Semicolon, ";")));
        assert_eq!(it.next(), Some(Token::eof()));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn line_comment_is_skipped() {
        let kinds: Vec<TokenKind> = scan("// boxed ints\nint").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Whitespace, TokenKind::LowerIdent, TokenKind::Eof]
        );
    }

    #[test]
    fn comment_running_to_end_of_input() {
        let kinds: Vec<TokenKind> = scan("int; // trailing").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LowerIdent,
                TokenKind::Semicolon,
                TokenKind::Whitespace,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lone_slash_is_illegal() {
        let mut s = Scanner::new("/x");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "/"));
        assert!(s.diagnostic().is_some());
    }

    #[test]
    fn short_signature_is_illegal() {
        let mut s = Scanner::new("user#decafba;");
        let t = s.scan();
        assert_eq!(t, tok(TokenKind::Illegal, "user#decafba"));
        assert!(s.diagnostic().unwrap().contains("expected hex digit"));
        // the offending character is left for the next token
        assert_eq!(s.scan(), tok(TokenKind::Semicolon, ";"));
        assert!(s.diagnostic().is_none());
    }

    #[test]
    fn long_signature_is_illegal() {
        let mut s = Scanner::new("user#decafbad0 ");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "user#decafbad0"));
        assert!(s.diagnostic().unwrap().contains("exactly 8"));
    }

    #[test]
    fn non_hex_signature_is_illegal() {
        let mut s = Scanner::new("user#DECAFBAD");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "user#"));
        let mut s = Scanner::new("user#decafbag");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "user#decafba"));
    }

    #[test]
    fn signature_at_end_of_input() {
        let mut s = Scanner::new("user#dec");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "user#dec"));
        assert!(s.diagnostic().unwrap().contains("8 hex digits"));
    }

    #[test]
    fn conditional_bit_selector() {
        let tokens: Vec<Token> = scan("flags.0?string").collect();
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::LowerIdent, "flags"),
                tok(TokenKind::Dot, "."),
                tok(TokenKind::NatConst, "0"),
                tok(TokenKind::QuestionMark, "?"),
                tok(TokenKind::LowerIdent, "string"),
                tok(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn triple_minus_at_end_of_input() {
        let mut s = Scanner::new("--");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "--"));
        assert_eq!(s.scan().kind, TokenKind::Eof);
    }

    #[test]
    fn lines_are_tracked() {
        let mut s = Scanner::new("a\n\nb");
        assert_eq!(s.next_spanned().line, 1);
        assert_eq!(s.next_spanned().token.kind, TokenKind::Whitespace);
        let b = s.next_spanned();
        assert_eq!(b.token.literal, "b");
        assert_eq!(b.line, 3);
    }

    #[test]
    fn non_ascii_is_illegal() {
        let mut s = Scanner::new("é");
        assert_eq!(s.scan(), tok(TokenKind::Illegal, "é"));
    }
}
