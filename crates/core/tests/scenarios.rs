//! End-to-end parsing scenarios over the public API.

use tl_core::{
    identity_of, parse, parse_recovering, parse_with, scan, Arg, BoxedTypeIdent,
    BuiltinCombinatorDecl, Declaration, FinalDecl, FinalKind, IdentityCheck, ParseOptions,
    ResultType, TlError, TokenKind, TypeExpr,
};

fn named(name: &str, ty: &str) -> Arg {
    Arg::Named {
        name: name.into(),
        excl_mark: false,
        ty: TypeExpr::ident(ty),
    }
}

#[test]
fn builtin_declaration() {
    let (program, err) = parse("int ? = Int;");
    assert_eq!(err, None);
    assert_eq!(program.constructors.len(), 1);
    match &program.constructors[0] {
        Declaration::Builtin(BuiltinCombinatorDecl { id, result, line }) => {
            assert_eq!(id.ident.literal(), "int");
            assert_eq!(result, &BoxedTypeIdent::new("Int"));
            assert_eq!(*line, 1);
            assert_eq!(id.identity, Some(0xa8509bda));
        }
        other => panic!("expected builtin, got {:?}", other),
    }
}

#[test]
fn signed_combinator_with_wrong_signature() {
    let (program, err) = parse("user#decafbad id:int name:string = User;");
    match &program.constructors[0] {
        Declaration::Combinator(c) => {
            assert_eq!(c.id.ident.literal(), "user#decafbad");
            assert_eq!(c.args, vec![named("id", "int"), named("name", "string")]);
            assert_eq!(c.result, ResultType::new("User", vec![]));
        }
        other => panic!("expected combinator, got {:?}", other),
    }
    assert_eq!(
        err,
        Some(TlError::IdentityMismatch {
            line: 1,
            combinator: "user".into(),
            declared: 0xdecafbad,
            computed: 0xc2d8c818,
        })
    );
}

#[test]
fn signed_combinator_with_right_signature() {
    let (program, err) = parse("user#c2d8c818 id:int name:string = User;");
    assert_eq!(err, None);
    assert_eq!(program.constructors[0].identity(), Some(0xc2d8c818));
}

#[test]
fn namespaced_id_without_result() {
    let (program, err) = parse("users.user;");
    assert!(program.is_empty());
    match err {
        Some(TlError::Structural { line, message }) => {
            assert_eq!(line, 1);
            assert_eq!(message, "unexpected ';', expected '='");
        }
        other => panic!("expected structural error, got {:?}", other),
    }
}

#[test]
fn functions_section() {
    let (program, err) = parse("--- functions ---\ngetUser id:int = User;");
    assert_eq!(err, None);
    assert!(program.constructors.is_empty());
    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.functions[0].name(), "getUser");
    assert_eq!(program.functions[0].line(), 2);
}

#[test]
fn final_declaration() {
    let (program, err) = parse("New Int128;");
    assert_eq!(err, None);
    assert_eq!(
        program.constructors,
        vec![Declaration::Final(FinalDecl {
            kind: FinalKind::New,
            ty: BoxedTypeIdent::new("Int128"),
            line: 1,
        })]
    );
}

#[test]
fn types_marker_before_functions() {
    let (_, err) = parse("--- types ---\nNew Int;\n--- functions ---\n");
    assert!(matches!(err, Some(TlError::Structural { line: 1, .. })));
}

#[test]
fn signature_length_boundaries() {
    for src in [
        "user#decafba = User;",
        "user#decafbadd = User;",
        "user#decafbxd = User;",
        "user#DECAFBAD = User;",
    ] {
        let (_, err) = parse(src);
        assert!(
            matches!(err, Some(TlError::Lexical { line: 1, .. })),
            "{}: {:?}",
            src,
            err
        );
    }
}

#[test]
fn scanner_is_finite() {
    let kinds: Vec<TokenKind> = scan("int ?= Int;").map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::LowerIdent,
            TokenKind::Whitespace,
            TokenKind::QuestionMark,
            TokenKind::Equals,
            TokenKind::Whitespace,
            TokenKind::UpperIdent,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identity_ignores_whitespace() {
    let a = identity_of("user id:int name:string = User;").unwrap();
    let b = identity_of("user   id:int\n\tname:string=User").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, "c2d8c818");
}

#[test]
fn warn_mode_keeps_declared_signature() {
    let options = ParseOptions {
        identity_check: IdentityCheck::Warn,
        ..ParseOptions::default()
    };
    let outcome = parse_with("boolTrue#00000001 = Bool;\nboolFalse = Bool;", &options);
    assert!(outcome.is_ok());
    assert_eq!(outcome.program.constructors.len(), 2);
    assert_eq!(outcome.program.constructors[0].identity(), Some(1));
    assert_eq!(outcome.warnings[0].kind(), "identity_mismatch");
}

#[test]
fn placeholder_combinator() {
    let (program, err) = parse("_ = Empty;");
    // `Empty` is a reserved word, not an upper identifier
    assert!(err.is_some());
    assert!(program.is_empty());

    let (program, err) = parse("_ {X:Type} = X;");
    assert_eq!(err, None);
    assert_eq!(program.constructors[0].name(), "_");
}

#[test]
fn flags_and_repetition() {
    let src = "\
message flags:# out:flags.1?true media:flags.9?MessageMedia = Message;
table n:# rows:n*[ id:int name:string ] = Table;
";
    let (program, err) = parse(src);
    assert_eq!(err, None);
    assert_eq!(program.constructors.len(), 2);
    assert_eq!(program.constructors[1].line(), 2);
}

#[test]
fn recovering_parse_reports_every_bad_line() {
    let src = "\
int ?= Int;
user id:int = ;
boolTrue = Bool;
--- types ---
";
    let (program, errors) = parse_recovering(src, 10);
    let lines: Vec<u32> = errors.iter().map(TlError::line).collect();
    assert_eq!(lines, [2, 4]);
    let names: Vec<&str> = program.constructors.iter().map(|d| d.name()).collect();
    assert_eq!(names, ["int", "boolTrue"]);
}

#[test]
fn errors_serialize_with_kind() {
    let (_, err) = parse("user#decafbad id:int name:string = User;");
    let value = err.unwrap().to_json_value();
    assert_eq!(value["kind"], "identity_mismatch");
    assert_eq!(value["declared"], "decafbad");
    assert_eq!(value["computed"], "c2d8c818");
}

#[test]
fn program_serializes_identities_as_hex() {
    let (program, _) = parse("boolTrue = Bool;");
    let value = serde_json::to_value(&program).unwrap();
    assert_eq!(value["constructors"][0]["id"]["identity"], "997275b5");
    assert_eq!(value["constructors"][0]["decl"], "combinator");
}
