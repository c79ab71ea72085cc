use super::Parser;
use crate::ast::{Arg, Condition, OptionalArg, TypeExpr};
use crate::error::TlError;
use crate::ident::Ident;
use crate::token::{Spanned, TokenKind};

/// Largest bit index a conditional field may select.
const MAX_BIT: u32 = 31;

impl Parser {
    pub(super) fn starts_arg(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::LowerIdent
                | TokenKind::UpperIdent
                | TokenKind::Underscore
                | TokenKind::OpenPar
                | TokenKind::OpenBracket
                | TokenKind::ExclMark
                | TokenKind::Hash
                | TokenKind::NatConst
                | TokenKind::Percent
        )
    }

    /// `{ var-ident { var-ident } : [!] type-expr }`
    pub(super) fn parse_optional_args(
        &mut self,
        out: &mut Vec<OptionalArg>,
    ) -> Result<(), TlError> {
        self.expect(TokenKind::OpenBrace)?;
        let mut names = Vec::new();
        while matches!(
            self.kind(),
            TokenKind::LowerIdent | TokenKind::UpperIdent | TokenKind::Underscore
        ) {
            let tok = self.bump();
            names.push(self.var_ident(&tok, false)?);
        }
        if names.is_empty() {
            return Err(self.unexpected(&[TokenKind::LowerIdent, TokenKind::UpperIdent]));
        }
        self.expect(TokenKind::Colon)?;
        let excl_mark = self.eat(TokenKind::ExclMark);
        let ty = self.parse_expr()?;
        self.expect(TokenKind::CloseBrace)?;

        for name in names {
            self.declare(&name);
            out.push(OptionalArg {
                name,
                excl_mark,
                ty: ty.clone(),
            });
        }
        Ok(())
    }

    /// One `args` production. Grouped names push several arguments.
    pub(super) fn parse_arg(&mut self, out: &mut Vec<Arg>) -> Result<(), TlError> {
        match self.kind() {
            TokenKind::LowerIdent | TokenKind::UpperIdent | TokenKind::Underscore => {
                let tok = self.bump();
                if self.eat(TokenKind::Colon) {
                    let name = self.var_ident(&tok, true)?;
                    let arg = self.parse_arg_after_colon(name.clone())?;
                    self.declare(&name);
                    out.push(arg);
                } else {
                    let term = self.finish_term(tok)?;
                    out.push(self.finish_anonymous(term)?);
                }
            }
            TokenKind::OpenPar => self.parse_paren_arg(out)?,
            TokenKind::OpenBracket => {
                let args = self.parse_bracket_args()?;
                out.push(Arg::Repeated {
                    name: None,
                    multiplicity: None,
                    args,
                });
            }
            TokenKind::ExclMark => {
                self.next();
                let ty = self.parse_term()?;
                out.push(Arg::BareMarked { ty });
            }
            TokenKind::Hash | TokenKind::NatConst | TokenKind::Percent => {
                let term = self.parse_term()?;
                out.push(self.finish_anonymous(term)?);
            }
            _ => {
                return Err(self.unexpected(&[
                    TokenKind::LowerIdent,
                    TokenKind::OpenPar,
                    TokenKind::OpenBracket,
                    TokenKind::ExclMark,
                    TokenKind::Equals,
                ]))
            }
        }
        Ok(())
    }

    /// Everything after `name:`. A conditional, a `!`-marked type, a
    /// repetition or a plain type-term.
    fn parse_arg_after_colon(&mut self, name: String) -> Result<Arg, TlError> {
        if self.at(TokenKind::OpenBracket) {
            let args = self.parse_bracket_args()?;
            return Ok(Arg::Repeated {
                name: Some(name),
                multiplicity: None,
                args,
            });
        }
        if self.eat(TokenKind::ExclMark) {
            let ty = self.parse_term()?;
            return Ok(Arg::Named {
                name,
                excl_mark: true,
                ty,
            });
        }

        let line = self.line();
        let term = self.parse_term()?;
        match self.kind() {
            TokenKind::Dot | TokenKind::QuestionMark => {
                let field = self.condition_field(&term, line)?;
                let bit = if self.eat(TokenKind::Dot) {
                    Some(self.parse_bit_index()?)
                } else {
                    None
                };
                self.expect(TokenKind::QuestionMark)?;
                let excl_mark = self.eat(TokenKind::ExclMark);
                let ty = self.parse_term()?;
                Ok(Arg::Conditional {
                    name,
                    condition: Condition { field, bit },
                    excl_mark,
                    ty,
                })
            }
            TokenKind::Asterisk => {
                self.next();
                let args = self.parse_bracket_args()?;
                Ok(Arg::Repeated {
                    name: Some(name),
                    multiplicity: Some(term),
                    args,
                })
            }
            _ => Ok(Arg::Named {
                name,
                excl_mark: false,
                ty: term,
            }),
        }
    }

    /// `( var-ident-opt { var-ident-opt } : [!] type-term )`, or a
    /// parenthesized anonymous type such as `(Vector int)`.
    fn parse_paren_arg(&mut self, out: &mut Vec<Arg>) -> Result<(), TlError> {
        let line = self.line();
        self.expect(TokenKind::OpenPar)?;
        let mut leading = Vec::new();
        while matches!(
            self.kind(),
            TokenKind::LowerIdent | TokenKind::UpperIdent | TokenKind::Underscore
        ) {
            leading.push(self.bump());
        }

        if !leading.is_empty() && self.eat(TokenKind::Colon) {
            let names = leading
                .iter()
                .map(|tok| self.var_ident(tok, true))
                .collect::<Result<Vec<_>, _>>()?;
            let excl_mark = self.eat(TokenKind::ExclMark);
            let ty = self.parse_term()?;
            self.expect(TokenKind::ClosePar)?;
            for name in names {
                self.declare(&name);
                out.push(Arg::Named {
                    name,
                    excl_mark,
                    ty: ty.clone(),
                });
            }
            return Ok(());
        }

        let mut items = Vec::new();
        if let Some(last) = leading.pop() {
            for tok in leading {
                items.push(self.plain_term(&tok)?);
            }
            let term = self.finish_term(last)?;
            items.push(self.finish_subexpr(term)?);
        }
        items.extend(self.parse_expr_items()?);
        self.expect(TokenKind::ClosePar)?;
        let term = super::expressions::group(items, line)?;
        out.push(self.finish_anonymous(term)?);
        Ok(())
    }

    /// `[ { args } ]`
    fn parse_bracket_args(&mut self) -> Result<Vec<Arg>, TlError> {
        self.expect(TokenKind::OpenBracket)?;
        // Fields inside the brackets are local to one repetition.
        let outer = self.scope.len();
        let mut args = Vec::new();
        while self.starts_arg() {
            self.parse_arg(&mut args)?;
        }
        self.scope.truncate(outer);
        self.expect(TokenKind::CloseBracket)?;
        Ok(args)
    }

    /// An anonymous term is a type, or the multiplicity of `n*[ args ]`.
    fn finish_anonymous(&mut self, term: TypeExpr) -> Result<Arg, TlError> {
        if self.eat(TokenKind::Asterisk) {
            let args = self.parse_bracket_args()?;
            return Ok(Arg::Repeated {
                name: None,
                multiplicity: Some(term),
                args,
            });
        }
        Ok(Arg::Anonymous { ty: term })
    }

    // -- Names --------------------------------------------------

    /// Check that an already-consumed token is a field name. `_` is only
    /// allowed where `var-ident-opt` is.
    fn var_ident(&self, tok: &Spanned, allow_placeholder: bool) -> Result<String, TlError> {
        let ident = Ident::from(&tok.token);
        if ident.is_placeholder() {
            return if allow_placeholder {
                Ok(ident.literal().to_owned())
            } else {
                Err(TlError::structural(
                    tok.line,
                    "optional argument names must be explicit, got '_'",
                ))
            };
        }
        if !ident.is_var_ident() {
            return Err(TlError::structural(
                tok.line,
                format!(
                    "field name must not carry a namespace or signature, got '{}'",
                    ident.literal()
                ),
            ));
        }
        Ok(ident.literal().to_owned())
    }

    fn declare(&mut self, name: &str) {
        if name != "_" {
            self.scope.push(name.to_owned());
        }
    }

    /// The `field` of `field?` / `field.N?` must name an earlier argument.
    fn condition_field(&self, term: &TypeExpr, line: u32) -> Result<String, TlError> {
        let name = match term {
            TypeExpr::Ident { ident } if Ident::new(ident.name.as_str()).is_var_ident() => {
                ident.name.clone()
            }
            _ => {
                return Err(TlError::structural(
                    line,
                    "conditional field must be a plain field name",
                ))
            }
        };
        if !self.scope.iter().any(|n| *n == name) {
            return Err(TlError::structural(
                line,
                format!("conditional field '{}' does not name an earlier argument", name),
            ));
        }
        Ok(name)
    }

    fn parse_bit_index(&mut self) -> Result<u32, TlError> {
        let tok = self.expect(TokenKind::NatConst)?;
        match tok.token.literal.parse::<u32>() {
            Ok(bit) if bit <= MAX_BIT => Ok(bit),
            _ => Err(TlError::structural(
                tok.line,
                format!(
                    "bit index {} out of range 0..={}",
                    tok.token.literal, MAX_BIT
                ),
            )),
        }
    }
}
