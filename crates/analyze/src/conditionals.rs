//! Conditional-field checks.
//!
//! `name:flags.N?Type` reads bit N of `flags`, so `flags` should be a `#`.

use crate::symbols::flatten_args;
use serde::Serialize;
use tl_core::{Arg, CombinatorDecl, Declaration, Program, TypeExpr};

#[derive(Debug, Clone, Serialize)]
pub struct FlagFieldIssue {
    pub combinator: String,
    pub line: u32,
    /// The conditional argument.
    pub argument: String,
    /// The flag field it reads.
    pub field: String,
    pub field_type: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConditionalsResult {
    /// Number of conditional arguments inspected.
    pub checked: usize,
    pub issues: Vec<FlagFieldIssue>,
}

pub fn analyze_conditionals(program: &Program) -> ConditionalsResult {
    let mut result = ConditionalsResult::default();
    for (_, decl) in program.declarations() {
        if let Declaration::Combinator(c) = decl {
            check_combinator(c, &mut result);
        }
    }
    result
}

fn check_combinator(c: &CombinatorDecl, result: &mut ConditionalsResult) {
    let args = flatten_args(&c.args);

    for arg in &args {
        let Arg::Conditional {
            name, condition, ..
        } = arg
        else {
            continue;
        };
        result.checked += 1;

        let Some(field_type) = field_type(c, &args, &condition.field) else {
            continue;
        };
        if is_nat(field_type) {
            continue;
        }
        result.issues.push(FlagFieldIssue {
            combinator: c.id.name().to_owned(),
            line: c.line,
            argument: name.clone(),
            field: condition.field.clone(),
            field_type: field_type.to_string(),
        });
    }
}

fn field_type<'a>(c: &'a CombinatorDecl, args: &[&'a Arg], field: &str) -> Option<&'a TypeExpr> {
    if let Some(opt) = c.optional_args.iter().find(|o| o.name == field) {
        return Some(&opt.ty);
    }
    args.iter().copied().find_map(|arg| match arg {
        Arg::Named { name, ty, .. } | Arg::Conditional { name, ty, .. } if name == field => Some(ty),
        _ => None,
    })
}

fn is_nat(expr: &TypeExpr) -> bool {
    matches!(expr, TypeExpr::Ident { ident } if ident.is_nat())
}
