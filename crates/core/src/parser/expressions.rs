use super::Parser;
use crate::ast::{ResultType, TypeExpr, TypeIdent};
use crate::error::TlError;
use crate::ident;
use crate::token::{Spanned, TokenKind};

const TERM_START: [TokenKind; 6] = [
    TokenKind::OpenPar,
    TokenKind::Percent,
    TokenKind::NatConst,
    TokenKind::UpperIdent,
    TokenKind::LowerIdent,
    TokenKind::Hash,
];

impl Parser {
    fn starts_term(&self) -> bool {
        TERM_START.contains(&self.kind())
    }

    // -- Terms --------------------------------------------------

    /// ```text
    /// term ::= ( expr ) | type-ident | var-ident | nat-const | % term
    ///        | type-ident < expr { , expr } >
    /// ```
    pub(super) fn parse_term(&mut self) -> Result<TypeExpr, TlError> {
        match self.kind() {
            TokenKind::OpenPar => {
                let line = self.line();
                self.next();
                let items = self.parse_expr_items()?;
                self.expect(TokenKind::ClosePar)?;
                group(items, line)
            }
            TokenKind::Percent => {
                self.next();
                let term = self.parse_term()?;
                Ok(TypeExpr::Bare {
                    term: Box::new(term),
                })
            }
            TokenKind::NatConst => {
                let tok = self.bump();
                nat_value(&tok)
            }
            TokenKind::UpperIdent | TokenKind::LowerIdent | TokenKind::Hash => {
                let tok = self.bump();
                self.finish_term(tok)
            }
            _ => Err(self.unexpected(&TERM_START)),
        }
    }

    /// Continue a term whose leading identifier is already consumed.
    pub(super) fn finish_term(&mut self, tok: Spanned) -> Result<TypeExpr, TlError> {
        let head = type_ident(&tok)?;
        if !self.eat(TokenKind::LeftAngle) {
            return Ok(TypeExpr::Ident { ident: head });
        }
        let args = self.parse_angle_exprs()?;
        Ok(TypeExpr::Apply { head, args })
    }

    /// A consumed identifier that cannot take `<...>` arguments.
    pub(super) fn plain_term(&self, tok: &Spanned) -> Result<TypeExpr, TlError> {
        Ok(TypeExpr::Ident {
            ident: type_ident(tok)?,
        })
    }

    // -- Expressions --------------------------------------------

    /// `subexpr ::= term | nat-const + subexpr | subexpr + nat-const`
    pub(super) fn parse_subexpr(&mut self) -> Result<TypeExpr, TlError> {
        let term = self.parse_term()?;
        self.finish_subexpr(term)
    }

    pub(super) fn finish_subexpr(&mut self, mut left: TypeExpr) -> Result<TypeExpr, TlError> {
        while self.at(TokenKind::Plus) {
            let line = self.line();
            self.next();
            let right = self.parse_term()?;
            if !left.is_nat_const() && !right.is_nat_const() {
                return Err(TlError::structural(
                    line,
                    "'+' needs a natural constant on one side",
                ));
            }
            left = TypeExpr::Sum {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `expr ::= { subexpr }`, possibly empty.
    pub(super) fn parse_expr_items(&mut self) -> Result<Vec<TypeExpr>, TlError> {
        let mut items = Vec::new();
        while self.starts_term() {
            items.push(self.parse_subexpr()?);
        }
        Ok(items)
    }

    /// A non-empty expr collapsed into one type expression.
    pub(super) fn parse_expr(&mut self) -> Result<TypeExpr, TlError> {
        if !self.starts_term() {
            return Err(self.unexpected(&TERM_START));
        }
        let line = self.line();
        let items = self.parse_expr_items()?;
        group(items, line)
    }

    /// `expr { , expr } >`, after the opening `<`.
    pub(super) fn parse_angle_exprs(&mut self) -> Result<Vec<TypeExpr>, TlError> {
        let mut args = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RightAngle)?;
        Ok(args)
    }

    /// `result-type ::= boxed-type-ident { subexpr }
    ///                | boxed-type-ident < subexpr { , subexpr } >`
    pub(super) fn parse_result_type(&mut self) -> Result<ResultType, TlError> {
        let ty = self.parse_boxed_type_ident()?;
        let args = if self.eat(TokenKind::LeftAngle) {
            let mut args = vec![self.parse_subexpr()?];
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_subexpr()?);
            }
            self.expect(TokenKind::RightAngle)?;
            args
        } else {
            self.parse_expr_items()?
        };
        Ok(ResultType { ty, args })
    }
}

fn type_ident(tok: &Spanned) -> Result<TypeIdent, TlError> {
    let lit = &tok.token.literal;
    match tok.token.kind {
        TokenKind::LowerIdent if ident::is_full_id(&tok.token) => Err(TlError::structural(
            tok.line,
            format!("got lc-ident-full '{}', expected lc-ident-ns", lit),
        )),
        TokenKind::UpperIdent | TokenKind::LowerIdent | TokenKind::Hash => {
            Ok(TypeIdent::new(lit.as_str()))
        }
        _ => Err(TlError::structural(
            tok.line,
            format!("unexpected {}, expected a type identifier", tok.token),
        )),
    }
}

fn nat_value(tok: &Spanned) -> Result<TypeExpr, TlError> {
    tok.token
        .literal
        .parse::<u32>()
        .map(|value| TypeExpr::Nat { value })
        .map_err(|_| {
            TlError::structural(
                tok.line,
                format!("natural constant {} does not fit in 32 bits", tok.token.literal),
            )
        })
}

/// One item stands alone; several form an application headed by the first.
pub(super) fn group(items: Vec<TypeExpr>, line: u32) -> Result<TypeExpr, TlError> {
    let mut items = items.into_iter();
    let first = match items.next() {
        Some(first) => first,
        None => return Err(TlError::structural(line, "empty type expression")),
    };
    let rest: Vec<TypeExpr> = items.collect();
    if rest.is_empty() {
        return Ok(first);
    }
    match first {
        TypeExpr::Ident { ident } => Ok(TypeExpr::Apply {
            head: ident,
            args: rest,
        }),
        TypeExpr::Apply { head, mut args } => {
            args.extend(rest);
            Ok(TypeExpr::Apply { head, args })
        }
        _ => Err(TlError::structural(
            line,
            "type application must start with a type identifier",
        )),
    }
}
