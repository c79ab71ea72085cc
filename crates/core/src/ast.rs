//! TL abstract syntax tree.
//!
//! Built once by the parser and never mutated afterwards. Every node
//! serializes with serde; combinator identities render as 8-hex-digit
//! strings.

use crate::ident::Ident;
use serde::{Serialize, Serializer};

// ──────────────────────────────────────────────
// Program
// ──────────────────────────────────────────────

/// The three sections of a TL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Constructors,
    Functions,
    Types,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Constructors => "constructors",
            Section::Functions => "functions",
            Section::Types => "types",
        }
    }
}

/// A parsed TL program. Declarations appear in source order within each
/// section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program {
    pub constructors: Vec<Declaration>,
    pub functions: Vec<Declaration>,
    pub types: Vec<Declaration>,
}

impl Program {
    pub fn section(&self, section: Section) -> &[Declaration] {
        match section {
            Section::Constructors => &self.constructors,
            Section::Functions => &self.functions,
            Section::Types => &self.types,
        }
    }

    pub(crate) fn push(&mut self, section: Section, decl: Declaration) {
        match section {
            Section::Constructors => self.constructors.push(decl),
            Section::Functions => self.functions.push(decl),
            Section::Types => self.types.push(decl),
        }
    }

    /// All declarations with the section they belong to.
    pub fn declarations(&self) -> impl Iterator<Item = (Section, &Declaration)> {
        [Section::Constructors, Section::Functions, Section::Types]
            .into_iter()
            .flat_map(move |s| self.section(s).iter().map(move |d| (s, d)))
    }

    pub fn len(&self) -> usize {
        self.constructors.len() + self.functions.len() + self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ──────────────────────────────────────────────
// Declarations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Declaration {
    Combinator(CombinatorDecl),
    Builtin(BuiltinCombinatorDecl),
    PartialTypeApp(PartialTypeAppDecl),
    Final(FinalDecl),
}

impl Declaration {
    /// Combinator name (without signature) or, for type-level
    /// declarations, the boxed type name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Combinator(d) => d.id.name(),
            Declaration::Builtin(d) => d.id.name(),
            Declaration::PartialTypeApp(d) => &d.ty.name,
            Declaration::Final(d) => &d.ty.name,
        }
    }

    /// Resolved 32-bit identity. Only combinators have one.
    pub fn identity(&self) -> Option<u32> {
        self.combinator_id().and_then(|id| id.identity)
    }

    pub fn combinator_id(&self) -> Option<&FullCombinatorId> {
        match self {
            Declaration::Combinator(d) => Some(&d.id),
            Declaration::Builtin(d) => Some(&d.id),
            Declaration::PartialTypeApp(_) | Declaration::Final(_) => None,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Declaration::Combinator(d) => d.line,
            Declaration::Builtin(d) => d.line,
            Declaration::PartialTypeApp(d) => d.line,
            Declaration::Final(d) => d.line,
        }
    }
}

/// `full-combinator-id { opt-args } { args } = result-type ;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinatorDecl {
    pub id: FullCombinatorId,
    pub optional_args: Vec<OptionalArg>,
    pub args: Vec<Arg>,
    pub result: ResultType,
    pub line: u32,
}

/// `full-combinator-id ? = boxed-type-ident ;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltinCombinatorDecl {
    pub id: FullCombinatorId,
    pub result: BoxedTypeIdent,
    pub line: u32,
}

/// `boxed-type-ident subexpr { subexpr } ;` or
/// `boxed-type-ident < expr { , expr } > ;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialTypeAppDecl {
    pub ty: BoxedTypeIdent,
    pub args: Vec<TypeExpr>,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FinalKind {
    New,
    Final,
    Empty,
}

/// `New|Final|Empty boxed-type-ident ;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalDecl {
    pub kind: FinalKind,
    pub ty: BoxedTypeIdent,
    pub line: u32,
}

// ──────────────────────────────────────────────
// Identifiers
// ──────────────────────────────────────────────

/// `lc-ident-full | _`, plus the identity resolved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullCombinatorId {
    pub ident: Ident,
    #[serde(serialize_with = "serialize_identity")]
    pub identity: Option<u32>,
}

impl FullCombinatorId {
    pub fn new(ident: Ident) -> Self {
        FullCombinatorId {
            ident,
            identity: None,
        }
    }

    pub fn name(&self) -> &str {
        self.ident.name()
    }

    /// Signature written in the source, if any.
    pub fn declared(&self) -> Option<u32> {
        self.ident.signature_value()
    }
}

fn serialize_identity<S: Serializer>(identity: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
    match identity {
        Some(id) => s.serialize_str(&format!("{:08x}", id)),
        None => s.serialize_none(),
    }
}

/// `type-ident ::= boxed-type-ident | lc-ident-ns | #`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeIdent {
    pub name: String,
}

impl TypeIdent {
    pub fn new(name: impl Into<String>) -> Self {
        TypeIdent { name: name.into() }
    }

    /// The built-in natural-number type `#`.
    pub fn is_nat(&self) -> bool {
        self.name == "#"
    }

    /// Boxed types start with an upper-case letter after any namespace.
    pub fn is_boxed(&self) -> bool {
        let last = self.name.rsplit('.').next().unwrap_or(&self.name);
        last.starts_with(|c: char| c.is_ascii_uppercase())
    }
}

/// `boxed-type-ident ::= uc-ident-ns`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoxedTypeIdent {
    pub name: String,
}

impl BoxedTypeIdent {
    pub fn new(name: impl Into<String>) -> Self {
        BoxedTypeIdent { name: name.into() }
    }
}

// ──────────────────────────────────────────────
// Arguments
// ──────────────────────────────────────────────

/// `{ name : [!] type-expr }`. Optional arguments are always named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionalArg {
    pub name: String,
    pub excl_mark: bool,
    pub ty: TypeExpr,
}

/// Bit selector of a conditional argument: `field?` or `field.N?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub field: String,
    pub bit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "arg", rename_all = "snake_case")]
pub enum Arg {
    /// `name:Type`, `name:!Type`, `_:Type`
    Named {
        name: String,
        excl_mark: bool,
        ty: TypeExpr,
    },
    /// `name:flags?Type`, `name:flags.N?Type`
    Conditional {
        name: String,
        condition: Condition,
        excl_mark: bool,
        ty: TypeExpr,
    },
    /// `!Type`
    BareMarked { ty: TypeExpr },
    /// `Type`, implicitly named `_`
    Anonymous { ty: TypeExpr },
    /// `[ args ]`, `n*[ args ]`, `name:n*[ args ]`
    Repeated {
        name: Option<String>,
        multiplicity: Option<TypeExpr>,
        args: Vec<Arg>,
    },
}

impl Arg {
    /// Field name; `_` for anonymous fields.
    pub fn name(&self) -> &str {
        match self {
            Arg::Named { name, .. } | Arg::Conditional { name, .. } => name,
            Arg::Repeated {
                name: Some(name), ..
            } => name,
            _ => "_",
        }
    }
}

// ──────────────────────────────────────────────
// Type expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum TypeExpr {
    /// Type name, variable reference or `#`.
    Ident { ident: TypeIdent },
    /// `Vector<int>`, `Vector int`, `(Vector int)`
    Apply {
        head: TypeIdent,
        args: Vec<TypeExpr>,
    },
    /// Natural-number constant used at the type level.
    Nat { value: u32 },
    /// `nat-const + subexpr` or `subexpr + nat-const`
    Sum {
        left: Box<TypeExpr>,
        right: Box<TypeExpr>,
    },
    /// `%term`
    Bare { term: Box<TypeExpr> },
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident {
            ident: TypeIdent::new(name),
        }
    }

    pub fn apply(head: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Apply {
            head: TypeIdent::new(head),
            args,
        }
    }

    pub fn is_nat_const(&self) -> bool {
        matches!(self, TypeExpr::Nat { .. })
    }

    /// Visit every type identifier in the expression, heads included.
    pub fn walk_idents<'a>(&'a self, f: &mut impl FnMut(&'a TypeIdent)) {
        match self {
            TypeExpr::Ident { ident } => f(ident),
            TypeExpr::Apply { head, args } => {
                f(head);
                for a in args {
                    a.walk_idents(f);
                }
            }
            TypeExpr::Nat { .. } => {}
            TypeExpr::Sum { left, right } => {
                left.walk_idents(f);
                right.walk_idents(f);
            }
            TypeExpr::Bare { term } => term.walk_idents(f),
        }
    }
}

/// `result-type ::= boxed-type-ident { subexpr }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultType {
    pub ty: BoxedTypeIdent,
    pub args: Vec<TypeExpr>,
}

impl ResultType {
    pub fn new(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        ResultType {
            ty: BoxedTypeIdent::new(name),
            args,
        }
    }
}
