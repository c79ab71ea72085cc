//! Combinator identities.
//!
//! A combinator's identity is the CRC-32 (IEEE) of its canonical text: the
//! declaration re-rendered with single spaces between tokens, without the
//! combinator's own signature and without the trailing `;`.
//!
//! ```text
//! user#decafbad id:int  name:string = User;   ->  "user id:int name:string = User"
//! int ?= Int;                                 ->  "int ? = Int"
//! ```

use crate::ast::{Arg, Declaration, OptionalArg, ResultType, TypeExpr};
use crate::error::TlError;
use crate::options::{IdentityCheck, ParseOptions};
use crate::parser;
use std::fmt;

/// CRC-32 of already-normalized declaration text.
pub fn compute_identity(normalized: &str) -> u32 {
    crc32fast::hash(normalized.as_bytes())
}

/// Lowercase, zero-padded, 8 hex digits.
pub fn format_identity(identity: u32) -> String {
    format!("{:08x}", identity)
}

/// Parse a single declaration and return its identity as 8 hex digits.
/// The trailing `;` is optional; an explicit signature is ignored.
pub fn identity_of(decl_text: &str) -> Result<String, TlError> {
    let mut src = decl_text.trim().to_owned();
    if !src.ends_with(';') {
        src.push(';');
    }

    let options = ParseOptions {
        identity_check: IdentityCheck::Off,
        ..ParseOptions::default()
    };
    let outcome = parser::parse_with(&src, &options);
    if let Some(e) = outcome.errors.into_iter().next() {
        return Err(e);
    }

    let program = outcome.program;
    let decl = match program.constructors.as_slice() {
        [decl] if program.functions.is_empty() && program.types.is_empty() => decl,
        _ => {
            return Err(TlError::structural(
                1,
                format!("expected exactly one declaration, found {}", program.len()),
            ))
        }
    };

    let text = canonical_text(decl).ok_or_else(|| {
        TlError::structural(
            decl.line(),
            format!("'{}' is not a combinator and has no identity", decl.name()),
        )
    })?;
    Ok(format_identity(compute_identity(&text)))
}

/// Canonical text of a combinator or builtin declaration. Type-level
/// declarations have none.
pub fn canonical_text(decl: &Declaration) -> Option<String> {
    match decl {
        Declaration::Combinator(d) => {
            let mut parts = vec![d.id.name().to_owned()];
            parts.extend(d.optional_args.iter().map(render_optional_arg));
            parts.extend(d.args.iter().map(render_arg));
            parts.push("=".to_owned());
            parts.push(render_result(&d.result));
            Some(parts.join(" "))
        }
        Declaration::Builtin(d) => Some(format!("{} ? = {}", d.id.name(), d.result.name)),
        Declaration::PartialTypeApp(_) | Declaration::Final(_) => None,
    }
}

fn render_optional_arg(arg: &OptionalArg) -> String {
    format!(
        "{{{}:{}{}}}",
        arg.name,
        excl(arg.excl_mark),
        render_type(&arg.ty, false)
    )
}

pub(crate) fn render_arg(arg: &Arg) -> String {
    match arg {
        Arg::Named {
            name,
            excl_mark,
            ty,
        } => format!("{}:{}{}", name, excl(*excl_mark), render_type(ty, false)),
        Arg::Conditional {
            name,
            condition,
            excl_mark,
            ty,
        } => {
            let bit = condition
                .bit
                .map(|b| format!(".{}", b))
                .unwrap_or_default();
            format!(
                "{}:{}{}?{}{}",
                name,
                condition.field,
                bit,
                excl(*excl_mark),
                render_type(ty, false)
            )
        }
        Arg::BareMarked { ty } => format!("!{}", render_type(ty, false)),
        Arg::Anonymous { ty } => render_type(ty, false),
        Arg::Repeated {
            name,
            multiplicity,
            args,
        } => {
            let mut out = String::new();
            if let Some(name) = name {
                out.push_str(name);
                out.push(':');
            }
            if let Some(m) = multiplicity {
                out.push_str(&render_type(m, true));
                out.push('*');
            }
            out.push_str("[ ");
            for a in args {
                out.push_str(&render_arg(a));
                out.push(' ');
            }
            out.push(']');
            out
        }
    }
}

fn render_result(result: &ResultType) -> String {
    let mut out = result.ty.name.clone();
    for a in &result.args {
        out.push(' ');
        out.push_str(&render_type(a, true));
    }
    out
}

/// Applications render by juxtaposition; `nested` wraps them in parens.
pub(crate) fn render_type(expr: &TypeExpr, nested: bool) -> String {
    match expr {
        TypeExpr::Ident { ident } => ident.name.clone(),
        TypeExpr::Nat { value } => value.to_string(),
        TypeExpr::Bare { term } => format!("%{}", render_type(term, true)),
        TypeExpr::Sum { left, right } => {
            format!("{}+{}", render_type(left, true), render_type(right, true))
        }
        TypeExpr::Apply { head, args } => {
            let mut out = head.name.clone();
            for a in args {
                out.push(' ');
                out.push_str(&render_type(a, true));
            }
            if nested {
                format!("({})", out)
            } else {
                out
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_type(self, false))
    }
}

fn excl(mark: bool) -> &'static str {
    if mark {
        "!"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(src: &str) -> String {
        let (program, err) = parser::parse(src);
        assert!(err.is_none() || err.as_ref().is_some_and(TlError::is_identity_mismatch));
        canonical_text(&program.constructors[0]).unwrap()
    }

    #[test]
    fn known_identities() {
        assert_eq!(identity_of("int ? = Int;").unwrap(), "a8509bda");
        assert_eq!(identity_of("boolTrue = Bool").unwrap(), "997275b5");
        assert_eq!(identity_of("boolFalse = Bool;").unwrap(), "bc799737");
        assert_eq!(identity_of("int128 4*[ int ] = Int128;").unwrap(), "84ccf7b7");
        assert_eq!(
            identity_of("user id:int name:string = User").unwrap(),
            "c2d8c818"
        );
    }

    #[test]
    fn explicit_signature_is_ignored() {
        assert_eq!(
            identity_of("user#decafbad id:int name:string = User;").unwrap(),
            "c2d8c818"
        );
    }

    #[test]
    fn whitespace_does_not_matter() {
        let a = identity_of("getUser id:int = User;").unwrap();
        let b = identity_of("  getUser\tid : int\n=   User ;").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "fa7de60f");
    }

    #[test]
    fn order_and_names_matter() {
        let a = identity_of("pair a:int b:string = Pair;").unwrap();
        let b = identity_of("pair b:string a:int = Pair;").unwrap();
        let c = identity_of("pair x:int b:string = Pair;").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn identity_is_deterministic() {
        let first = identity_of("msg flags:# text:flags.0?string = Msg;").unwrap();
        for _ in 0..3 {
            assert_eq!(
                identity_of("msg flags:# text:flags.0?string = Msg;").unwrap(),
                first
            );
        }
        assert_eq!(first, "37f285c6");
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(
            canonical("vector {t:Type} # [ t ] = Vector t;"),
            "vector {t:Type} # [ t ] = Vector t"
        );
        assert_eq!(
            canonical("users.getUsers id:Vector<InputUser> = Vector<User>;"),
            "users.getUsers id:Vector InputUser = Vector User"
        );
        assert_eq!(
            canonical("wrap x:Vector<Vector<int>> = Wrap;"),
            "wrap x:Vector (Vector int) = Wrap"
        );
        assert_eq!(canonical("int ?= Int;"), "int ? = Int");
    }

    #[test]
    fn angle_and_space_forms_agree() {
        assert_eq!(
            identity_of("list x:Vector<int> = List;").unwrap(),
            identity_of("list x:(Vector int) = List;").unwrap()
        );
    }

    #[test]
    fn canonical_text_reparses_to_same_identity() {
        let src = "msg#00000000 {X:Type} flags:# (a b:int) c:flags.3?X d:flags*[ e:int ] = Msg X;";
        let (program, _) = parser::parse(src);
        let text = canonical_text(&program.constructors[0]).unwrap();
        assert_eq!(
            identity_of(&text).unwrap(),
            format_identity(compute_identity(&text))
        );
    }

    #[test]
    fn type_level_declarations_have_no_identity() {
        let err = identity_of("New Int128;").unwrap_err();
        assert!(matches!(err, TlError::Structural { .. }));
    }

    #[test]
    fn type_expressions_display_canonically() {
        let expr = TypeExpr::apply(
            "Vector",
            vec![TypeExpr::apply("Vector", vec![TypeExpr::ident("int")])],
        );
        assert_eq!(expr.to_string(), "Vector (Vector int)");
    }

    #[test]
    fn format_pads() {
        assert_eq!(format_identity(0xbeef), "0000beef");
    }
}
