//! Cross-reference resolution.
//!
//! Every type named in a combinator's arguments or result arguments must
//! resolve to something: a declared boxed type, a declared constructor used
//! as a bare type, a type variable bound by an optional argument, a field of
//! the same combinator, `#` or `Type`. Function results and type-level
//! declarations must name a declared boxed type.

use crate::symbols::{flatten_args, SymbolTable};
use serde::Serialize;
use std::collections::BTreeSet;
use tl_core::{Arg, CombinatorDecl, Declaration, Program, Section, TypeExpr, TypeIdent};

/// The sort of types, usable in optional arguments such as `{t:Type}`.
const TYPE_SORT: &str = "Type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSite {
    Argument,
    ResultArgument,
    FunctionResult,
    TypeDeclaration,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedReference {
    pub name: String,
    pub declaration: String,
    pub section: Section,
    pub line: u32,
    pub site: ReferenceSite,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferencesResult {
    pub checked: usize,
    pub unresolved: Vec<UnresolvedReference>,
}

pub fn analyze_references(program: &Program, symbols: &SymbolTable) -> ReferencesResult {
    let mut result = ReferencesResult::default();

    for (section, decl) in program.declarations() {
        let mut report = |name: &str, site: ReferenceSite| {
            result.unresolved.push(UnresolvedReference {
                name: name.to_owned(),
                declaration: decl.name().to_owned(),
                section,
                line: decl.line(),
                site,
            });
        };

        match decl {
            Declaration::Combinator(c) => {
                check_combinator(c, section, symbols, &mut report);
            }
            Declaration::Builtin(_) => {}
            Declaration::PartialTypeApp(p) => {
                if !symbols.has_boxed_type(&p.ty.name) {
                    report(&p.ty.name, ReferenceSite::TypeDeclaration);
                }
                let scope = Scope::default();
                for arg in &p.args {
                    check_expr(arg, &scope, symbols, ReferenceSite::TypeDeclaration, &mut report);
                }
            }
            Declaration::Final(f) => {
                if !symbols.has_boxed_type(&f.ty.name) {
                    report(&f.ty.name, ReferenceSite::TypeDeclaration);
                }
            }
        }
        result.checked += 1;
    }

    result
}

/// Names bound inside one combinator.
#[derive(Default)]
struct Scope<'a> {
    type_vars: BTreeSet<&'a str>,
    fields: BTreeSet<&'a str>,
}

fn check_combinator(
    c: &CombinatorDecl,
    section: Section,
    symbols: &SymbolTable,
    report: &mut impl FnMut(&str, ReferenceSite),
) {
    let args = flatten_args(&c.args);
    let scope = Scope {
        type_vars: c.optional_args.iter().map(|o| o.name.as_str()).collect(),
        fields: args
            .iter()
            .copied()
            .map(Arg::name)
            .filter(|n| *n != "_")
            .collect(),
    };

    for arg in args {
        match arg {
            Arg::Named { ty, .. }
            | Arg::Conditional { ty, .. }
            | Arg::BareMarked { ty }
            | Arg::Anonymous { ty } => {
                check_expr(ty, &scope, symbols, ReferenceSite::Argument, report);
            }
            Arg::Repeated { multiplicity, .. } => {
                if let Some(m) = multiplicity {
                    check_expr(m, &scope, symbols, ReferenceSite::Argument, report);
                }
            }
        }
    }

    if section == Section::Functions {
        let name = &c.result.ty.name;
        if !symbols.has_boxed_type(name) && !scope.type_vars.contains(name.as_str()) {
            report(name, ReferenceSite::FunctionResult);
        }
    }
    for arg in &c.result.args {
        check_expr(arg, &scope, symbols, ReferenceSite::ResultArgument, report);
    }
}

fn check_expr(
    expr: &TypeExpr,
    scope: &Scope<'_>,
    symbols: &SymbolTable,
    site: ReferenceSite,
    report: &mut impl FnMut(&str, ReferenceSite),
) {
    expr.walk_idents(&mut |ident: &TypeIdent| {
        if !resolves(ident, scope, symbols) {
            report(&ident.name, site);
        }
    });
}

fn resolves(ident: &TypeIdent, scope: &Scope<'_>, symbols: &SymbolTable) -> bool {
    let name = ident.name.as_str();
    if ident.is_nat() || name == TYPE_SORT || scope.type_vars.contains(name) {
        return true;
    }
    if ident.is_boxed() {
        symbols.has_boxed_type(name)
    } else {
        symbols.has_constructor(name) || scope.fields.contains(name)
    }
}
