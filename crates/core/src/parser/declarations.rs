use super::Parser;
use crate::ast::{
    BoxedTypeIdent, BuiltinCombinatorDecl, CombinatorDecl, Declaration, FinalDecl, FinalKind,
    FullCombinatorId, PartialTypeAppDecl,
};
use crate::error::TlError;
use crate::ident::Ident;
use crate::token::TokenKind;

impl Parser {
    /// One declaration including its terminating `;`.
    pub(super) fn parse_declaration(&mut self) -> Result<Declaration, TlError> {
        let decl = match self.kind() {
            TokenKind::LowerIdent | TokenKind::Underscore => self.parse_combinator_decl()?,
            TokenKind::UpperIdent => self.parse_partial_app_decl()?,
            TokenKind::New | TokenKind::Final | TokenKind::Empty => self.parse_final_decl()?,
            _ => {
                return Err(self.unexpected(&[
                    TokenKind::LowerIdent,
                    TokenKind::Underscore,
                    TokenKind::UpperIdent,
                    TokenKind::New,
                    TokenKind::Final,
                    TokenKind::Empty,
                ]))
            }
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(decl)
    }

    /// `full-combinator-id ::= lc-ident-full | _`
    pub(super) fn parse_full_combinator_id(&mut self) -> Result<FullCombinatorId, TlError> {
        match self.kind() {
            TokenKind::LowerIdent | TokenKind::Underscore => {
                let tok = self.bump();
                Ok(FullCombinatorId::new(Ident::from(&tok.token)))
            }
            _ => Err(self.unexpected(&[TokenKind::LowerIdent, TokenKind::Underscore])),
        }
    }

    pub(super) fn parse_boxed_type_ident(&mut self) -> Result<BoxedTypeIdent, TlError> {
        let tok = self.expect(TokenKind::UpperIdent)?;
        Ok(BoxedTypeIdent::new(tok.token.literal))
    }

    // -- Combinators --------------------------------------------

    /// Either `id ? = Type` (builtin) or
    /// `id { opt-args } { args } = result-type`.
    fn parse_combinator_decl(&mut self) -> Result<Declaration, TlError> {
        let line = self.line();
        let id = self.parse_full_combinator_id()?;

        if self.eat(TokenKind::QuestionMark) {
            self.expect(TokenKind::Equals)?;
            let result = self.parse_boxed_type_ident()?;
            return Ok(Declaration::Builtin(BuiltinCombinatorDecl { id, result, line }));
        }

        self.scope.clear();
        let mut optional_args = Vec::new();
        while self.at(TokenKind::OpenBrace) {
            self.parse_optional_args(&mut optional_args)?;
        }
        let mut args = Vec::new();
        while self.starts_arg() {
            self.parse_arg(&mut args)?;
        }
        self.expect(TokenKind::Equals)?;
        let result = self.parse_result_type()?;

        Ok(Declaration::Combinator(CombinatorDecl {
            id,
            optional_args,
            args,
            result,
            line,
        }))
    }

    // -- Type-level declarations --------------------------------

    /// `Type subexpr { subexpr }` or `Type < expr { , expr } >`
    fn parse_partial_app_decl(&mut self) -> Result<Declaration, TlError> {
        let line = self.line();
        let ty = self.parse_boxed_type_ident()?;
        let args = if self.eat(TokenKind::LeftAngle) {
            self.parse_angle_exprs()?
        } else {
            self.parse_expr_items()?
        };
        if args.is_empty() {
            return Err(TlError::structural(
                self.line(),
                format!(
                    "partial application of '{}' needs at least one argument, got {}",
                    ty.name, self.tok.token
                ),
            ));
        }
        Ok(Declaration::PartialTypeApp(PartialTypeAppDecl { ty, args, line }))
    }

    fn parse_final_decl(&mut self) -> Result<Declaration, TlError> {
        let line = self.line();
        let kind = match self.kind() {
            TokenKind::New => FinalKind::New,
            TokenKind::Final => FinalKind::Final,
            TokenKind::Empty => FinalKind::Empty,
            _ => {
                return Err(self.unexpected(&[
                    TokenKind::New,
                    TokenKind::Final,
                    TokenKind::Empty,
                ]))
            }
        };
        self.next();
        let ty = self.parse_boxed_type_ident()?;
        Ok(Declaration::Final(FinalDecl { kind, ty, line }))
    }
}
